//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    envelope::SuccessEnvelope,
    transaction::{Transaction, TransactionRequest, record_transaction},
};

/// The message sent to the client after a transaction was created.
pub const TRANSACTION_CREATED_MESSAGE: &str = "Transaction created successfully";

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the stored
/// transaction and the status code 201 on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessEnvelope<Transaction>>), Error> {
    let Json(request) = payload?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = record_transaction(request, &connection)?;
    tracing::debug!("created transaction {}", transaction.id);

    Ok((
        StatusCode::CREATED,
        Json(SuccessEnvelope::new(TRANSACTION_CREATED_MESSAGE, transaction)),
    ))
}
