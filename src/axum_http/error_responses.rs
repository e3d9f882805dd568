use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::usecases::{
    feedback::FeedbackError, payments::PaymentError, subscriptions::SubscriptionAdminError,
    users::UserAdminError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a use-case error onto the response it should produce. Anything that is not
    /// a client error is treated as internal and its detail is only logged.
    fn from_usecase<E>(status: StatusCode, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match status {
            StatusCode::BAD_REQUEST => AppError::BadRequest(err.to_string()),
            StatusCode::NOT_FOUND => AppError::NotFound(err.to_string()),
            StatusCode::CONFLICT => AppError::Conflict(err.to_string()),
            _ => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::from_usecase(err.status_code(), err)
    }
}

impl From<SubscriptionAdminError> for AppError {
    fn from(err: SubscriptionAdminError) -> Self {
        Self::from_usecase(err.status_code(), err)
    }
}

impl From<UserAdminError> for AppError {
    fn from(err: UserAdminError) -> Self {
        Self::from_usecase(err.status_code(), err)
    }
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        Self::from_usecase(err.status_code(), err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_keeps_usecase_message() {
        let err: AppError = SubscriptionAdminError::InvalidStatus(
            crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus::Success,
        )
        .into();

        assert!(matches!(&err, AppError::Conflict(msg) if msg.contains("success")));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_are_hidden() {
        let err: AppError = PaymentError::Internal(anyhow::anyhow!("connection refused")).into();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn signature_failure_is_bad_request() {
        let err: AppError = PaymentError::InvalidSignature.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
