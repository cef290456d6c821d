//! Defines the core data models and database queries for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

/// The number of decimal places amounts are stored with.
pub const AMOUNT_SCALE: u32 = 2;

// ============================================================================
// MODELS
// ============================================================================

/// A financial record: money a user spent or earned on something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: String,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, with two decimal places.
    pub amount: Decimal,
    /// The category of the transaction, e.g. "Food", "Transport", "Rent".
    pub category: String,
    /// The date the transaction was recorded.
    pub created_at: Date,
}

/// The fields of a transaction that has passed validation and is ready to be
/// stored.
///
/// Use [crate::transaction::TransactionRequest::validate] to create one from
/// user input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    user_id: String,
    title: String,
    amount: Decimal,
    category: String,
}

impl NewTransaction {
    /// Create a new transaction without checking that the fields are
    /// non-empty and the amount non-zero.
    ///
    /// The caller should ensure the fields are valid.
    pub fn new_unchecked(user_id: &str, title: &str, amount: Decimal, category: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new transaction into the database, returning the stored row.
///
/// The amount is rounded to [AMOUNT_SCALE] decimal places before it is
/// stored. The database assigns the ID and the creation date.
///
/// # Errors
/// This function will return an [Error::SqlError] if the insert fails, e.g.
/// because the table does not exist, a text field is longer than 255
/// characters, or the amount has more than 8 digits before the decimal point.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = to_storage_scale(new_transaction.amount);

    let transaction = connection
        .prepare(
            "INSERT INTO transactions (user_id, title, amount, category)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, title, amount, category, created_at",
        )?
        .query_row(
            (
                new_transaction.user_id,
                new_transaction.title,
                amount.to_string(),
                new_transaction.category,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is no such
/// transaction or there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, title, amount, category, created_at FROM transactions WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database if it does not exist yet.
///
/// The column constraints mirror a `DECIMAL(10, 2)` amount and
/// `VARCHAR(255)` text fields.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL CHECK (length(user_id) <= 255),
                title TEXT NOT NULL CHECK (length(title) <= 255),
                amount TEXT NOT NULL CHECK (abs(CAST(amount AS REAL)) < 100000000),
                category TEXT NOT NULL CHECK (length(category) <= 255),
                created_at TEXT NOT NULL DEFAULT CURRENT_DATE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let title = row.get(2)?;
    let amount: String = row.get(3)?;
    let amount = Decimal::from_str(&amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;
    let category = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Transaction {
        id,
        user_id,
        title,
        amount,
        category,
        created_at,
    })
}

/// Round `amount` to [AMOUNT_SCALE] decimal places, padding with zeros so
/// that e.g. 3.5 is stored as "3.50".
fn to_storage_scale(amount: Decimal) -> Decimal {
    let mut amount =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(AMOUNT_SCALE);

    amount
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, count_transactions, create_transaction, get_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let today = OffsetDateTime::now_utc().date();

        let result = create_transaction(
            NewTransaction::new_unchecked("u1", "Coffee", dec!(3.50), "Food"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.id, 1);
                assert_eq!(transaction.user_id, "u1");
                assert_eq!(transaction.title, "Coffee");
                assert_eq!(transaction.amount, dec!(3.50));
                assert_eq!(transaction.category, "Food");
                // The database uses the UTC date, allow for the test running over midnight.
                let yesterday = today.previous_day().unwrap();
                assert!(
                    transaction.created_at == today || transaction.created_at == yesterday,
                    "want created_at to be today ({today}), got {}",
                    transaction.created_at
                );
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_returns_stored_row() {
        let conn = get_test_connection();

        let created = create_transaction(
            NewTransaction::new_unchecked("u1", "Rent", dec!(-1200), "Housing"),
            &conn,
        )
        .unwrap();

        let stored = get_transaction(created.id, &conn).unwrap();
        assert_eq!(created, stored);
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let conn = get_test_connection();

        let first = create_transaction(
            NewTransaction::new_unchecked("u1", "Coffee", dec!(3.50), "Food"),
            &conn,
        )
        .unwrap();
        let second = create_transaction(
            NewTransaction::new_unchecked("u1", "Coffee", dec!(3.50), "Food"),
            &conn,
        )
        .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_rounds_amount_to_two_decimal_places() {
        let conn = get_test_connection();

        let cases = [
            (dec!(3.5), "3.50"),
            (dec!(10), "10.00"),
            (dec!(1.005), "1.01"),
            (dec!(-2.345), "-2.35"),
        ];

        for (amount, want) in cases {
            let transaction = create_transaction(
                NewTransaction::new_unchecked("u1", "Rounding", amount, "Test"),
                &conn,
            )
            .unwrap();

            assert_eq!(transaction.amount.to_string(), want, "amount {amount}");
        }
    }

    #[test]
    fn create_fails_on_amount_overflow() {
        let conn = get_test_connection();

        let result = create_transaction(
            NewTransaction::new_unchecked("u1", "Yacht", dec!(100000000), "Leisure"),
            &conn,
        );

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn create_fails_on_long_text() {
        let conn = get_test_connection();
        let long_title = "a".repeat(256);

        let result = create_transaction(
            NewTransaction::new_unchecked("u1", &long_title, dec!(1), "Food"),
            &conn,
        );

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn create_fails_without_table() {
        let conn = Connection::open_in_memory().unwrap();

        let result = create_transaction(
            NewTransaction::new_unchecked("u1", "Coffee", dec!(3.50), "Food"),
            &conn,
        );

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                NewTransaction::new_unchecked("u1", "Snack", i.into(), "Food"),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
