//! Transactions imported from an external fraud-scoring source.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database functions
//! - The CSV importer used by the seed tool
//! - The JSON API that lists every transaction

mod api;
mod core;
mod import;

pub use api::get_transactions_api;
pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction,
    create_transaction_table, get_all_transactions,
};
pub use import::{import_transactions, parse_transactions_csv};

#[cfg(test)]
pub(crate) use core::test_utils;
