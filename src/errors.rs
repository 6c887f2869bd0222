use crate::shifts::ShiftError;
use crate::tickets::TicketError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ShiftError> for AppError {
    fn from(err: ShiftError) -> Self {
        let message = err.to_string();
        match err {
            ShiftError::NotFound(_) => Self::not_found(message),
            ShiftError::AlreadyOpen(_) | ShiftError::AlreadyClosed(_) => Self::conflict(message),
            ShiftError::NoStaff
            | ShiftError::BlankName
            | ShiftError::DuplicateName(_)
            | ShiftError::EndCountMismatch { .. } => Self::bad_request(message),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
