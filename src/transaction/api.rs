//! The JSON endpoint that lists every stored transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, transaction::Transaction};

/// The state needed for the transactions API.
#[derive(Debug, Clone)]
pub struct TransactionsApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TransactionsResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transactions: Option<Vec<Transaction>>,
}

/// Respond with all transactions as JSON, unfiltered and newest first.
pub async fn get_transactions_api(State(state): State<TransactionsApiState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| super::get_all_transactions(&connection));

    match result {
        Ok(transactions) => {
            tracing::debug!("Fetched {} transactions", transactions.len());
            (
                StatusCode::OK,
                Json(TransactionsResponse {
                    message: "Success fetching all transactions!",
                    transactions: Some(transactions),
                }),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Error fetching transactions: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TransactionsResponse {
                    message: "Internal server error when fetching transactions!",
                    transactions: None,
                }),
            )
                .into_response()
        }
    }
}
