//! Error kinds to HTTP statuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskscope_core::ScopeError;
use taskscope_core::domain::ErrorKind;

/// Handler error: a core error, or a request rejected before reaching the core.
#[derive(Debug)]
pub enum ApiError {
    Core(ScopeError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(ScopeError::DeadlineExceeded) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Core(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::Unavailable | ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }
}

impl From<ScopeError> for ApiError {
    fn from(err: ScopeError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Core(err) => err.to_string(),
            ApiError::BadRequest(message) => message.clone(),
        };
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %message, "request failed");
        }
        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskscope_core::domain::EntityKind;

    #[test]
    fn maps_kinds_to_statuses() {
        let cases = [
            (ScopeError::not_found(EntityKind::Job, "x"), StatusCode::NOT_FOUND),
            (ScopeError::NoMatch { id: "x".into() }, StatusCode::NOT_FOUND),
            (ScopeError::invalid("bad"), StatusCode::BAD_REQUEST),
            (
                ScopeError::BackendUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ScopeError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (ScopeError::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
