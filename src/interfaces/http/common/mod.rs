//! Response envelope and error mapping shared by every handler

mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use crate::domain::DomainError;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

/// Map a domain outcome to its HTTP status and error envelope.
///
/// Store failures are logged and replaced by a generic message.
pub fn error_response<T>(err: DomainError) -> ApiError<T> {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::InvalidQuery(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match err {
        DomainError::Store(detail) => {
            tracing::error!(error = %detail, "Store failure while handling request");
            "Internal server error".to_string()
        }
        DomainError::Forbidden(msg)
        | DomainError::InvalidQuery(msg)
        | DomainError::Conflict(msg)
        | DomainError::Unauthorized(msg) => msg,
        DomainError::Validation(errors) => errors.join("; "),
        not_found @ DomainError::NotFound { .. } => not_found.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (DomainError::not_found("Charger", "c1"), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::InvalidQuery("lat".into()), StatusCode::BAD_REQUEST),
            (DomainError::validation("name"), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Store("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, _) = error_response::<()>(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn message_is_the_bare_reason() {
        let (_, Json(body)) =
            error_response::<()>(DomainError::Unauthorized("Invalid credentials".into()));
        assert_eq!(body.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn store_details_are_not_leaked() {
        let (_, Json(body)) =
            error_response::<()>(DomainError::Store("no such table: chargers".into()));
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
