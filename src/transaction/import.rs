//! Loads transactions from a CSV export into the database.
//!
//! The header must name the transaction columns; their order does not matter
//! and unknown columns are ignored. `reason` may be left out entirely.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::Deserialize;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{NewTransaction, core::DATE_TIME_FORMAT, create_transaction},
};

/// Some exports separate the date and time with a 'T'.
const ISO_DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    trans_date_trans_time: String,
    cc_num: String,
    merchant: String,
    category: String,
    amt: f64,
    city: String,
    state: String,
    unix_time: i64,
    merch_lat: f64,
    merch_long: f64,
    #[serde(default)]
    reason: String,
    is_fraud: String,
}

fn parse_date_time(text: &str) -> Result<PrimitiveDateTime, Error> {
    let text = text.trim();

    PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, ISO_DATE_TIME_FORMAT))
        .map_err(|_| Error::InvalidDateTime(text.to_owned()))
}

fn parse_fraud_flag(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl TransactionRecord {
    fn into_new_transaction(self, line: usize) -> Result<NewTransaction, Error> {
        let trans_date_trans_time = parse_date_time(&self.trans_date_trans_time)
            .map_err(|error| Error::InvalidCSV(format!("line {line}: {error}")))?;
        let is_fraud = parse_fraud_flag(&self.is_fraud).ok_or_else(|| {
            Error::InvalidCSV(format!(
                "line {line}: is_fraud must be 1, 0, true or false, got \"{}\"",
                self.is_fraud
            ))
        })?;

        Ok(NewTransaction {
            trans_date_trans_time,
            cc_num: self.cc_num,
            merchant: self.merchant,
            category: self.category,
            amt: self.amt,
            city: self.city,
            state: self.state,
            unix_time: self.unix_time,
            merch_lat: self.merch_lat,
            merch_long: self.merch_long,
            reason: self.reason,
            is_fraud,
        })
    }
}

/// Parse CSV `text` into transactions ready to be stored.
///
/// # Errors
///
/// Returns [Error::InvalidCSV] naming the 1-based data line (not counting the
/// header) of the first row that is missing a column or has a malformed value.
pub fn parse_transactions_csv(text: &str) -> Result<Vec<NewTransaction>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<TransactionRecord>()
        .enumerate()
        .map(|(index, record)| {
            let line = index + 1;
            record
                .map_err(|error| Error::InvalidCSV(format!("line {line}: {error}")))?
                .into_new_transaction(line)
        })
        .collect()
}

/// Store `transactions` in one SQL transaction and return how many were stored.
///
/// Either every transaction is stored or none are.
///
/// # Errors
///
/// Returns [Error::SqlError] if any insert fails.
pub fn import_transactions(
    transactions: Vec<NewTransaction>,
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;
    let count = transactions.len();

    for transaction in transactions {
        create_transaction(transaction, &sql_transaction)?;
    }

    sql_transaction.commit()?;
    tracing::info!("Imported {count} transactions");

    Ok(count)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{count_transactions, get_all_transactions},
    };

    use super::{import_transactions, parse_transactions_csv};

    const HEADER: &str = "trans_date_trans_time,cc_num,merchant,category,amt,city,state,\
        unix_time,merch_lat,merch_long,is_fraud";

    #[test]
    fn parses_rows() {
        let text = format!(
            "{HEADER}\n\
            2019-01-01 00:00:18,2703186189652095,\"fraud_Rippin, Kub and Mann\",misc_net,4.97,Moravian Falls,NC,1325376018,36.011293,-82.048315,0\n\
            2019-01-01T00:04:08,630423337322,fraud_Heller,grocery_pos,107.23,Orient,WA,1325376248,49.159047,-118.186462,1\n"
        );

        let got = parse_transactions_csv(&text).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].merchant, "fraud_Rippin, Kub and Mann");
        assert_eq!(got[0].trans_date_trans_time, datetime!(2019-01-01 00:00:18));
        assert!(!got[0].is_fraud);
        assert_eq!(got[0].reason, "");
        assert_eq!(got[1].trans_date_trans_time, datetime!(2019-01-01 00:04:08));
        assert_eq!(got[1].amt, 107.23);
        assert!(got[1].is_fraud);
    }

    #[test]
    fn accepts_boolean_words_and_extra_columns() {
        let text = "unused,trans_date_trans_time,cc_num,merchant,category,amt,city,state,\
            unix_time,merch_lat,merch_long,is_fraud,reason\n\
            x,2019-01-01 00:00:18,1234,Shop,travel,10.5,Austin,TX,1325376018,30.2,-97.7,TRUE,Unusual location\n";

        let got = parse_transactions_csv(text).unwrap();

        assert!(got[0].is_fraud);
        assert_eq!(got[0].reason, "Unusual location");
    }

    #[test]
    fn error_names_failing_line() {
        let text = format!(
            "{HEADER}\n\
            2019-01-01 00:00:18,1234,Shop,travel,10.5,Austin,TX,1325376018,30.2,-97.7,0\n\
            2019-01-01 00:00:18,1234,Shop,travel,10.5,Austin,TX,1325376018,30.2,-97.7,maybe\n"
        );

        let result = parse_transactions_csv(&text);

        match result {
            Err(Error::InvalidCSV(message)) => {
                assert!(message.starts_with("line 2:"), "got {message}")
            }
            other => panic!("want InvalidCSV, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_an_error() {
        let text = format!(
            "{HEADER}\n01/01/2019,1234,Shop,travel,10.5,Austin,TX,1325376018,30.2,-97.7,0\n"
        );

        let result = parse_transactions_csv(&text);

        assert!(
            matches!(result, Err(Error::InvalidCSV(ref message)) if message.starts_with("line 1:")),
            "got {result:?}"
        );
    }

    #[test]
    fn import_stores_all_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let text = format!(
            "{HEADER}\n\
            2019-01-01 00:00:18,1234,Shop,travel,10.5,Austin,TX,1325376018,30.2,-97.7,0\n\
            2019-01-03 09:15:00,1234,Cafe,food_dining,3.25,Austin,TX,1325582100,30.2,-97.7,1\n"
        );
        let transactions = parse_transactions_csv(&text).unwrap();

        let count = import_transactions(transactions, &connection).unwrap();

        assert_eq!(count, 2);
        assert_eq!(count_transactions(&connection).unwrap(), 2);
        let stored = get_all_transactions(&connection).unwrap();
        assert_eq!(stored[0].merchant, "Cafe");
    }
}
