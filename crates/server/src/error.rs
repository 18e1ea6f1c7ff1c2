use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coffee_journey::{BlobError, StoreError, ValidationError};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Every variant renders as `{"result": <message>}` with its status code.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("missing params")]
    MissingParameter(&'static str),

    #[error("invalid price")]
    InvalidPrice(String),

    #[error("invalid id")]
    InvalidId(String),

    #[error("coffee not found")]
    NotFound,

    #[error("image not found")]
    ImageNotFound,

    #[error("not found")]
    RouteNotFound,

    #[error("malformed form: {0}")]
    MalformedForm(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Blob error: {0}")]
    Blob(#[from] BlobError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingParameter(_)
            | ServerError::InvalidPrice(_)
            | ServerError::InvalidId(_)
            | ServerError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound | ServerError::ImageNotFound | ServerError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Store(_)
            | ServerError::Blob(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `result` string clients see. Server-side failures are collapsed to
    /// a generic message; the detail goes to the log.
    pub fn result_message(&self) -> String {
        match self {
            ServerError::MalformedForm(_) => "malformed form".to_string(),
            ServerError::Store(_)
            | ServerError::Blob(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameter(field) => ServerError::MissingParameter(field),
            ValidationError::InvalidPrice(raw) => ServerError::InvalidPrice(raw),
            ValidationError::InvalidId(raw) => ServerError::InvalidId(raw),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = ?self, status = %status, "request rejected");
        }

        let body = Json(json!({ "result": self.result_message() }));
        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let cases = [
            (ValidationError::MissingParameter("name"), "missing params"),
            (ValidationError::InvalidPrice("1.234".into()), "invalid price"),
            (ValidationError::InvalidId("123".into()), "invalid id"),
        ];
        for (err, message) in cases {
            let err = ServerError::from(err);
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.result_message(), message);
        }
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(ServerError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::NotFound.result_message(), "coffee not found");
        assert_eq!(ServerError::ImageNotFound.result_message(), "image not found");
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let err = ServerError::Store(StoreError::backend("connection refused 10.0.0.3"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.result_message(), "internal error");
    }
}
