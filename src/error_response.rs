//! JSON error bodies and the middleware that exposes internal error details in
//! development mode.

use std::any::Any;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Environment;

/// The message returned to clients for unexpected errors outside of development.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// A human readable description of what went wrong.
    pub message: String,
    /// Debugging details, only included in development mode.
    #[serde(rename = "stackTrace", skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl ErrorResponse {
    /// Create an error body with just a message.
    pub fn new(message: String) -> Self {
        Self {
            message,
            stack_trace: None,
        }
    }

    /// Create a 500 response with the generic message.
    ///
    /// The raw `message` and `details` are attached to the response extensions
    /// so that [error_detail_middleware] can swap them in when running in
    /// development mode.
    pub fn internal(message: &str, details: &str) -> Response {
        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(GENERIC_ERROR_MESSAGE.to_owned())),
        )
            .into_response();

        response.extensions_mut().insert(InternalErrorDetail {
            message: message.to_owned(),
            details: details.to_owned(),
        });

        response
    }
}

/// The raw details of an internal server error.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail {
    message: String,
    details: String,
}

/// Replace the body of 500 responses with the raw error details when running
/// in development mode.
///
/// In production the generic body is left untouched.
pub async fn error_detail_middleware(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if environment != Environment::Development {
        return response;
    }

    match response.extensions().get::<InternalErrorDetail>() {
        Some(detail) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: detail.message.clone(),
                stack_trace: Some(detail.details.clone()),
            }),
        )
            .into_response(),
        None => response,
    }
}

/// Convert a panic in a request handler into a 500 response.
///
/// Intended for use with [tower_http::catch_panic::CatchPanicLayer::custom].
pub fn handle_panic(error: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = error.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = error.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic message".to_owned()
    };

    tracing::error!("A request handler panicked: {message}");

    ErrorResponse::internal(&message, "panicked while handling the request")
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::Value;
    use tower_http::catch_panic::CatchPanicLayer;

    use crate::{Environment, Error};

    use super::{GENERIC_ERROR_MESSAGE, error_detail_middleware, handle_panic};

    async fn failing_handler() -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    async fn panicking_handler() -> &'static str {
        panic!("the handler fell over")
    }

    fn get_test_server(environment: Environment) -> TestServer {
        let app = Router::new()
            .route("/fail", get(failing_handler))
            .route("/panic", get(panicking_handler))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn_with_state(
                environment,
                error_detail_middleware,
            ));

        TestServer::new(app)
    }

    #[tokio::test]
    async fn production_hides_error_details() {
        let server = get_test_server(Environment::Production);

        let response = server.get("/fail").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
        assert!(body.get("stackTrace").is_none());
    }

    #[tokio::test]
    async fn development_shows_error_details() {
        let server = get_test_server(Environment::Development);

        let response = server.get("/fail").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], Error::DatabaseLockError.to_string());
        assert_eq!(body["stackTrace"], "DatabaseLockError");
    }

    #[tokio::test]
    async fn panics_become_internal_server_errors() {
        let server = get_test_server(Environment::Development);

        let response = server.get("/panic").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "the handler fell over");
    }
}
