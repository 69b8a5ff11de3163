//! Rendering handler results as HTTP responses.
//!
//! | Result | Status | Body |
//! |--------|--------|------|
//! | `Ok(Some(v))` | 200 | `{"data": v}` |
//! | `Ok(None)` | 204 | empty |
//! | bind / validation error | 400 | `{"error": {"message": ..}}` |
//! | handler or output error | 500 | `{"error": {"message": ..}}` |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rivet_framework::{HandlerError, HandlerResult};
use serde_json::json;
use tracing::{debug, error};

/// Maps a handler error to its HTTP status.
pub fn status_of(err: &HandlerError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Renders a normalized handler result.
pub fn render(result: HandlerResult) -> Response {
    match result {
        Ok(Some(data)) => (StatusCode::OK, Json(json!({ "data": data }))).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => render_error(&err),
    }
}

fn render_error(err: &HandlerError) -> Response {
    let status = status_of(err);
    if status.is_server_error() {
        error!(error = %err, "Handler failed");
    } else {
        debug!(error = %err, "Request rejected");
    }
    error_response(status, &err.to_string())
}

/// A JSON error body with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

#[cfg(test)]
mod tests {
    use rivet_core::BindError;

    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(render(Ok(Some(json!(1)))).status(), StatusCode::OK);
        assert_eq!(render(Ok(None)).status(), StatusCode::NO_CONTENT);

        let err = HandlerError::from(BindError::missing("email"));
        assert_eq!(render(Err(err)).status(), StatusCode::BAD_REQUEST);

        let err = HandlerError::Handler("boom".into());
        assert_eq!(render(Err(err)).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
