use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Render the JSON error envelope shared by every catalog service.
///
/// ```json
/// { "status": "error", "statusCode": 404, "kind": "NOT_FOUND", "message": "Product not found" }
/// ```
pub fn error_response(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Response {
    let body = serde_json::json!({
        "status": "error",
        "statusCode": status.as_u16(),
        "kind": kind,
        "message": message.into(),
    });
    (status, axum::Json(body)).into_response()
}

/// Fallback for handler panics, installed through `CatchPanicLayer::custom`.
///
/// The panic payload becomes the envelope message, the same way internal errors
/// surface their message.
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal Server Error".to_owned()
    };
    tracing::error!(error = %message, kind = "INTERNAL", "handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
}
