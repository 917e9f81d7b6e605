//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::email::EmailError;

/// Custom error type for the API service
///
/// Handlers translate every store/service failure into one of these at the
/// boundary; no raw internal error detail crosses the API surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid session token
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad credentials on login, deliberately not distinguishing whether the
    /// username or the password was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many failed login attempts
    #[error("Too many login attempts")]
    TooManyAttempts,

    /// Validation failure with a field-identifying message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Single-resource lookup targeted a nonexistent id
    #[error("{0}")]
    NotFound(String),

    /// A store mutation matched nothing
    #[error("{0}")]
    OperationFailed(String),

    /// The lead was stored but the notification email did not go out
    #[error("Failed to send email")]
    EmailDelivery,

    /// A store or email operation timed out
    #[error("Request timed out")]
    Timeout,

    /// Internal server error, cause logged server-side only
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Classify a repository failure
    ///
    /// A pool acquire timeout surfaces as `Timeout`; everything else stays a
    /// generic internal error.
    pub fn store(e: &anyhow::Error) -> Self {
        match e.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::PoolTimedOut) => ApiError::Timeout,
            _ => ApiError::InternalServerError,
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(e: EmailError) -> Self {
        match e {
            EmailError::Timeout => ApiError::Timeout,
            _ => ApiError::EmailDelivery,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::TooManyAttempts => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::OperationFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::EmailDelivery => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send email".to_string(),
            ),
            ApiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Request timed out".to_string()),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::TooManyAttempts.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::BadRequest("Missing required field: make".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Car not found".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Timeout.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::InternalServerError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn pool_acquire_timeout_classifies_as_timeout() {
        let e = anyhow::Error::new(sqlx::Error::PoolTimedOut);
        assert!(matches!(ApiError::store(&e), ApiError::Timeout));
    }

    #[test]
    fn other_store_failures_stay_internal() {
        let e = anyhow::anyhow!("connection reset");
        assert!(matches!(
            ApiError::store(&e),
            ApiError::InternalServerError
        ));
        let e = anyhow::Error::new(sqlx::Error::RowNotFound);
        assert!(matches!(
            ApiError::store(&e),
            ApiError::InternalServerError
        ));
    }

    #[test]
    fn email_timeout_is_distinct_from_delivery_failure() {
        assert!(matches!(ApiError::from(EmailError::Timeout), ApiError::Timeout));
        assert!(matches!(
            ApiError::from(EmailError::InvalidAddress("bad".to_string())),
            ApiError::EmailDelivery
        ));
    }
}
