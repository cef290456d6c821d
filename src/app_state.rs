//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{config::Environment, db::bootstrap};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Whether error responses should include debugging details.
    pub environment: Environment,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will try to initialize the database by adding the tables
    /// for the domain models. If that fails the error is logged and the state
    /// is still created, so the server can start and report SQL errors per
    /// request.
    pub fn new(db_connection: Connection, environment: Environment) -> Self {
        bootstrap(&db_connection);

        Self {
            environment,
            db_connection: Arc::new(Mutex::new(db_connection)),
        }
    }
}
