//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing transactions
//! - Validation of the fields a client sends to create a transaction
//! - The route handler for creating transactions

mod core;
mod create_endpoint;
mod service;

pub use self::core::{
    AMOUNT_SCALE, NewTransaction, Transaction, create_transaction, create_transaction_table,
    map_transaction_row,
};
pub use create_endpoint::{
    CreateTransactionState, TRANSACTION_CREATED_MESSAGE, create_transaction_endpoint,
};
pub use service::{RawAmount, TransactionRequest, record_transaction};

#[cfg(test)]
pub use self::core::{count_transactions, get_transaction};
