//! Validation of user input before a transaction is stored.

use std::str::FromStr;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::core::{NewTransaction, Transaction, create_transaction},
};

/// The request body for creating a transaction.
///
/// Every field is optional so that a missing field is reported as
/// [Error::MissingFields] by [TransactionRequest::validate] rather than as a
/// JSON parsing error.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// The user the transaction belongs to.
    #[serde(default)]
    pub user_id: Option<String>,
    /// A short description of what the transaction was for.
    #[serde(default)]
    pub title: Option<String>,
    /// The amount of money, either as a JSON number or a numeric string.
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// The category of the transaction.
    #[serde(default)]
    pub category: Option<String>,
}

/// An amount as it was written in the request body.
///
/// A zero number counts as missing but a string is only missing when it is
/// empty, so `"0"` is a valid amount while `0` is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON string that should hold a number, e.g. `"3.50"`.
    Text(String),
    /// A JSON number, e.g. `3.50`.
    Number(Decimal),
}

impl RawAmount {
    fn is_present(&self) -> bool {
        match self {
            RawAmount::Text(text) => !text.is_empty(),
            RawAmount::Number(number) => !number.is_zero(),
        }
    }

    fn parse(self) -> Result<Decimal, Error> {
        match self {
            RawAmount::Number(number) => Ok(number),
            RawAmount::Text(text) => {
                Decimal::from_str(text.trim()).map_err(|_| Error::InvalidAmount(text))
            }
        }
    }
}

impl From<Decimal> for RawAmount {
    fn from(number: Decimal) -> Self {
        RawAmount::Number(number)
    }
}

impl TransactionRequest {
    /// Check that every field is present, that no text field is empty and
    /// that the amount is not zero.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if any field fails the check,
    /// - or [Error::InvalidAmount] if the amount is a string that is not a number.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let (Some(user_id), Some(title), Some(amount), Some(category)) = (
            non_empty(self.user_id),
            non_empty(self.title),
            self.amount.filter(RawAmount::is_present),
            non_empty(self.category),
        ) else {
            return Err(Error::MissingFields);
        };

        Ok(NewTransaction::new_unchecked(
            &user_id,
            &title,
            amount.parse()?,
            &category,
        ))
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.is_empty())
}

/// Validate `request` and store it as a new transaction.
///
/// Nothing is written to the database if validation fails.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingFields] if `request` is missing a field,
/// - [Error::InvalidAmount] if the amount is not a number,
/// - or [Error::SqlError] if the transaction could not be stored.
pub fn record_transaction(
    request: TransactionRequest,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let new_transaction = request.validate()?;

    create_transaction(new_transaction, connection)
}
