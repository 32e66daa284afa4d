use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error. Every failure surfaced to the API layer is one of
/// these; handlers bubble them with `?` and actix renders the response
/// through [`actix_web::ResponseError`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("Already checked out today")]
    AlreadyCheckedOut,

    #[error("No active check-in found for today")]
    NoCheckInFound,

    #[error("Leave request not found or already processed")]
    LeaveAlreadyDecided,

    #[error("{0}")]
    Validation(String),

    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        AppError::Internal(msg.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyCheckedIn
            | AppError::AlreadyCheckedOut
            | AppError::NoCheckInFound
            | AppError::LeaveAlreadyDecided
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_maps_to_bad_request() {
        for err in [
            AppError::AlreadyCheckedIn,
            AppError::AlreadyCheckedOut,
            AppError::NoCheckInFound,
            AppError::LeaveAlreadyDecided,
        ] {
            assert_eq!(
                actix_web::ResponseError::status_code(&err),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            actix_web::ResponseError::status_code(&AppError::NotFound("account")),
            StatusCode::NOT_FOUND
        );
    }
}
