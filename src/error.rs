//! Defines the app level error type, its conversion to JSON error responses,
//! and the middleware that handles every error response in one place.
use axum::{
    Json,
    extract::{
        Request, State,
        rejection::{BytesRejection, JsonRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{config::Environment, envelope::ErrorEnvelope};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more of the fields needed to create a transaction were missing,
    /// empty or zero.
    #[error("Missing required fields")]
    MissingFields,

    /// The amount was given as a string that is not a number.
    #[error("invalid input syntax for an amount: {0:?}")]
    InvalidAmount(String),

    /// The request body could not be parsed as the expected JSON object.
    ///
    /// Holds the status code chosen by the JSON extractor (e.g., 400 for a
    /// syntax error, 415 for a missing content type) and a description of
    /// the problem.
    #[error("{1}")]
    InvalidRequestBody(StatusCode, String),

    /// The requested resource was not found.
    #[error("Not Found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// This covers constraint violations, failed queries and problems with
    /// the connection itself.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(#[source] rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The response produced by a route handler could not be read.
    #[error("could not read response body: {0}")]
    ResponseBodyError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::SqlError(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for Error {
    fn from(rejection: BytesRejection) -> Self {
        Error::InvalidRequestBody(rejection.status(), rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code to respond with for this error.
    ///
    /// Errors without a status of their own, validation errors included,
    /// are internal server errors.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequestBody(status_code, _) => *status_code,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingFields
            | Error::InvalidAmount(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::ResponseBodyError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The debug representation of the error followed by its chain of sources.
    fn trace(&self) -> String {
        let mut trace = format!("{self:?}");
        let mut source = std::error::Error::source(self);

        while let Some(error) = source {
            trace.push_str(&format!("\ncaused by: {error}"));
            source = std::error::Error::source(error);
        }

        trace
    }
}

/// What went wrong in a request, attached to the extensions of an error
/// response for [global_error_handler].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// The message shown to the client.
    pub message: String,
    /// The detailed error trace, only shown to the client in development mode.
    pub trace: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let report = ErrorReport {
            message: self.to_string(),
            trace: self.trace(),
        };

        let mut response =
            (status_code, Json(ErrorEnvelope::new(&report.message))).into_response();
        response.extensions_mut().insert(report);

        response
    }
}

/// Log every error response and, in development mode, add the error trace to
/// the response body.
///
/// Route handlers return [Error]s instead of logging them, so this is the one
/// place where failed requests are logged.
pub async fn global_error_handler(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    let status_code = response.status();

    if status_code.is_server_error() {
        tracing::error!("Global error ({status_code}): {}", report.trace);
    } else {
        tracing::warn!("Request failed ({status_code}): {}", report.trace);
    }

    match environment {
        Environment::Development => (
            status_code,
            Json(ErrorEnvelope::with_stack(&report.message, &report.trace)),
        )
            .into_response(),
        Environment::Production => response,
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router, body::to_bytes, http::StatusCode, middleware, response::IntoResponse,
        routing::get,
    };
    use axum_test::TestServer;

    use crate::{
        config::Environment,
        envelope::ErrorEnvelope,
        error::{Error, ErrorReport, global_error_handler},
    };

    #[test]
    fn validation_errors_default_to_internal_server_error() {
        assert_eq!(
            Error::MissingFields.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(Error::MissingFields.to_string(), "Missing required fields");
        assert_eq!(
            Error::InvalidAmount("abc".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_rejections_keep_their_status() {
        let error = Error::InvalidRequestBody(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_owned());

        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.to_string(), "too big");
    }

    #[test]
    fn storage_errors_are_internal_server_errors() {
        let error = Error::from(rusqlite::Error::InvalidQuery);

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Error::DatabaseLockError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn trace_includes_source() {
        let error = Error::from(rusqlite::Error::InvalidQuery);

        let trace = error.trace();

        assert!(trace.starts_with("SqlError(InvalidQuery)"), "got {trace}");
        assert!(trace.contains("caused by: "), "got {trace}");
    }

    #[tokio::test]
    async fn into_response_renders_envelope_and_attaches_report() {
        let response = Error::MissingFields.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .cloned()
            .expect("error responses should carry an error report");
        assert_eq!(report.message, "Missing required fields");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope, ErrorEnvelope::new("Missing required fields"));
    }

    fn get_test_server(environment: Environment) -> TestServer {
        let app = Router::new()
            .route("/fails", get(|| async { Error::DatabaseLockError }))
            .route("/succeeds", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                environment,
                global_error_handler,
            ));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn production_hides_stack() {
        let server = get_test_server(Environment::Production);

        let response = server.get("/fails").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = response.json::<ErrorEnvelope>();
        assert_eq!(envelope.status, "error");
        assert_eq!(envelope.message, "could not acquire the database lock");
        assert_eq!(envelope.stack, None);
    }

    #[tokio::test]
    async fn development_shows_stack() {
        let server = get_test_server(Environment::Development);

        let response = server.get("/fails").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = response.json::<ErrorEnvelope>();
        assert_eq!(envelope.message, "could not acquire the database lock");
        assert_eq!(envelope.stack.as_deref(), Some("DatabaseLockError"));
    }

    #[tokio::test]
    async fn successful_responses_pass_through() {
        let server = get_test_server(Environment::Development);

        let response = server.get("/succeeds").await;

        response.assert_status_ok();
        response.assert_text("ok");
    }
}
