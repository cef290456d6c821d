//! The API endpoints URIs.

/// The root route which responds with a greeting.
pub const ROOT: &str = "/";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
