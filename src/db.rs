//! Opening the application's database and bootstrapping its schema.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::create_transaction_table};

/// The database URL for a throwaway in-memory database.
pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

/// Open a connection to the SQLite database at `database_url`.
///
/// `database_url` may be a plain file path, a file path prefixed with
/// `sqlite://` or `sqlite:`, or [IN_MEMORY_DATABASE_URL].
///
/// # Errors
/// Returns an [Error::SqlError] if the database cannot be opened.
pub fn open_connection(database_url: &str) -> Result<Connection, Error> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    let connection = if path == IN_MEMORY_DATABASE_URL {
        Connection::open_in_memory()?
    } else {
        Connection::open(path)?
    };

    Ok(connection)
}

/// Create the tables for the domain models if they do not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Initialize the database at startup, logging the outcome.
///
/// A failure is logged but does not stop the server. Requests that need the
/// missing tables will fail with an SQL error instead.
pub fn bootstrap(connection: &Connection) {
    match initialize(connection) {
        Ok(()) => tracing::info!("Database initialization successful"),
        Err(error) => tracing::error!("Error while initializing database: {error}"),
    }
}
