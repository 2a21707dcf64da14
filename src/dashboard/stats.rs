//! Summary statistics for the cards at the top of the dashboard.

use crate::transaction::Transaction;

/// Totals over a set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TransactionStats {
    /// The sum of all amounts.
    pub total_volume: f64,
    /// The sum of the amounts of fraudulent transactions.
    pub fraud_amount: f64,
    pub total_count: usize,
    pub fraud_count: usize,
    /// The share of transactions that are fraudulent, from 0 to 100.
    ///
    /// Zero when there are no transactions.
    pub fraud_percentage: f64,
}

impl TransactionStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (total_volume, fraud_amount, fraud_count) = transactions.iter().fold(
            (0.0, 0.0, 0),
            |(total, fraud_total, fraud_count), transaction| {
                if transaction.is_fraud {
                    (
                        total + transaction.amt,
                        fraud_total + transaction.amt,
                        fraud_count + 1,
                    )
                } else {
                    (total + transaction.amt, fraud_total, fraud_count)
                }
            },
        );

        let total_count = transactions.len();
        let fraud_percentage = if total_count == 0 {
            0.0
        } else {
            fraud_count as f64 / total_count as f64 * 100.0
        };

        Self {
            total_volume,
            fraud_amount,
            total_count,
            fraud_count,
            fraud_percentage,
        }
    }

    /// The fraud percentage with one decimal place, e.g. "33.3".
    pub fn fraud_percentage_label(&self) -> String {
        format!("{:.1}", self.fraud_percentage)
    }
}
