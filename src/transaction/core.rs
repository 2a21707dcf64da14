//! Defines the transaction model and its database queries.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The format transaction date-times are stored and serialized in,
/// e.g. "2019-01-01 00:00:18".
pub const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

mod naive_date_time {
    //! Serializes a [time::PrimitiveDateTime] as "YYYY-MM-DD HH:MM:SS".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(dt: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A card transaction together with the fraud flag it was imported with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// When the transaction happened, in the timezone of the data source.
    #[serde(with = "naive_date_time")]
    pub trans_date_trans_time: PrimitiveDateTime,
    /// The card number that was charged.
    pub cc_num: String,
    pub merchant: String,
    pub category: String,
    /// The amount charged in dollars.
    pub amt: f64,
    pub city: String,
    /// The two letter state code.
    pub state: String,
    /// When the transaction happened, as seconds since the Unix epoch.
    pub unix_time: i64,
    /// The merchant's latitude.
    pub merch_lat: f64,
    /// The merchant's longitude.
    pub merch_long: f64,
    /// Why the transaction was flagged, may be empty.
    pub reason: String,
    /// Whether the source system marked the transaction as fraudulent.
    pub is_fraud: bool,
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub trans_date_trans_time: PrimitiveDateTime,
    pub cc_num: String,
    pub merchant: String,
    pub category: String,
    pub amt: f64,
    pub city: String,
    pub state: String,
    pub unix_time: i64,
    pub merch_lat: f64,
    pub merch_long: f64,
    pub reason: String,
    pub is_fraud: bool,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS fraud_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trans_date_trans_time TEXT NOT NULL,
                cc_num TEXT NOT NULL,
                merchant TEXT NOT NULL,
                category TEXT NOT NULL,
                amt REAL NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                unix_time INTEGER NOT NULL,
                merch_lat REAL NOT NULL,
                merch_long REAL NOT NULL,
                reason TEXT NOT NULL DEFAULT '',
                is_fraud INTEGER NOT NULL
                )",
        (),
    )?;

    // Used for the newest-first ordering of the dashboard table.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_fraud_transaction_date
            ON fraud_transaction(trans_date_trans_time DESC, id DESC);",
        (),
    )?;

    Ok(())
}

/// Store `new_transaction` and return it with its ID.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date_time = format_date_time(new_transaction.trans_date_trans_time)?;

    let transaction = connection
        .prepare(
            "INSERT INTO fraud_transaction (
                trans_date_trans_time, cc_num, merchant, category, amt, city, state,
                unix_time, merch_lat, merch_long, reason, is_fraud
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            RETURNING id, trans_date_trans_time, cc_num, merchant, category, amt, city, state,
                unix_time, merch_lat, merch_long, reason, is_fraud",
        )?
        .query_row(
            rusqlite::params![
                date_time,
                new_transaction.cc_num,
                new_transaction.merchant,
                new_transaction.category,
                new_transaction.amt,
                new_transaction.city,
                new_transaction.state,
                new_transaction.unix_time,
                new_transaction.merch_lat,
                new_transaction.merch_long,
                new_transaction.reason,
                new_transaction.is_fraud,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction, newest first.
///
/// Transactions with the same date-time are ordered by descending ID so the
/// order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a stored row is malformed.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, trans_date_trans_time, cc_num, merchant, category, amt, city, state,
                unix_time, merch_lat, merch_long, reason, is_fraud
            FROM fraud_transaction
            ORDER BY trans_date_trans_time DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM fraud_transaction;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

fn format_date_time(date_time: PrimitiveDateTime) -> Result<String, Error> {
    date_time
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateTime(error.to_string()))
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_date_time: String = row.get(1)?;
    let trans_date_trans_time = PrimitiveDateTime::parse(&raw_date_time, DATE_TIME_FORMAT)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id: row.get(0)?,
        trans_date_trans_time,
        cc_num: row.get(2)?,
        merchant: row.get(3)?,
        category: row.get(4)?,
        amt: row.get(5)?,
        city: row.get(6)?,
        state: row.get(7)?,
        unix_time: row.get(8)?,
        merch_lat: row.get(9)?,
        merch_long: row.get(10)?,
        reason: row.get(11)?,
        is_fraud: row.get(12)?,
    })
}
