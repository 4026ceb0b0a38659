use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::payments::PaymentError;
use crate::storage::StorageError;
use crate::utils::response::error as error_response;

const PAYMENT_FAILED_MESSAGE: &str = "Error while processing payment";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::MissingRelation(_)) => StatusCode::BAD_REQUEST,
            AppError::Storage(StorageError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Payment(PaymentError::EventNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Payment(PaymentError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Payment(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Storage(StorageError::NotFound { .. }) => "NOT_FOUND",
            AppError::Storage(StorageError::MissingRelation(_)) => "INVALID_RELATION",
            AppError::Storage(StorageError::Database(_)) => "DATABASE_ERROR",
            AppError::Payment(_) => "PAYMENT_FAILED",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                warn!(message = %msg, "Request rejected");
            }
            AppError::Storage(StorageError::Database(e)) => {
                error!(error = ?e, "Database error");
            }
            AppError::Storage(e) => {
                warn!(error = %e, "Storage rejected request");
            }
            AppError::Payment(PaymentError::GatewayRejected { status, body }) => {
                error!(status, body = %body, "Payment gateway rejected checkout");
            }
            AppError::Payment(e) => {
                error!(error = ?e, "Payment processing failed");
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Storage(StorageError::Database(_)) => "A database error occurred".to_string(),
            AppError::Storage(e) => e.to_string(),
            AppError::Payment(_) => PAYMENT_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = self.public_message();

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let err = AppError::from(StorageError::NotFound {
            entity: "event",
            id: Uuid::nil(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_payment_errors_share_public_message() {
        let missing = AppError::from(PaymentError::EventNotFound(Uuid::nil()));
        let rejected = AppError::from(PaymentError::GatewayRejected {
            status: 400,
            body: "bad request".to_string(),
        });

        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(missing.code(), rejected.code());
        assert_eq!(missing.public_message(), PAYMENT_FAILED_MESSAGE);
        assert_eq!(rejected.public_message(), PAYMENT_FAILED_MESSAGE);
    }

    #[test]
    fn test_database_error_is_not_exposed() {
        let err = AppError::from(StorageError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "A database error occurred");
    }
}
