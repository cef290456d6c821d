//! A small REST API for recording financial transactions.
//!
//! Clients `POST` a transaction (user, title, amount and category) as JSON to
//! [endpoints::TRANSACTIONS_API]. The transaction is validated, stored in a
//! SQLite database and returned, wrapped in a JSON envelope.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod config;
mod database_id;
pub mod db;
pub mod endpoints;
pub mod envelope;
mod error;
mod logging;
mod not_found;
mod routing;
pub mod transaction;

pub use app_state::AppState;
pub use config::{Config, Environment};
pub use database_id::{DatabaseId, TransactionId};
pub use db::{bootstrap as bootstrap_db, open_connection};
pub use error::{Error, ErrorReport, global_error_handler};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
