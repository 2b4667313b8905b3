use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures of the content generation gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Transport failure or timeout. Retryable.
    #[error("Content generation unavailable: {0}")]
    Unavailable(String),

    /// The generated payload did not match the required shape. Never retried.
    #[error("Generated content was malformed: {0}")]
    MalformedOutput(String),
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Unavailable(_))
    }
}

/// Failures turning an uploaded document into study text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("The document contains no readable text")]
    Empty,

    #[error("Only PDF documents are supported")]
    Unsupported,

    #[error("The document is larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("The document could not be read: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Event rejected: {0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::Document(_) => "DOCUMENT_ERROR",
            AppError::Generation(GenerationError::Unavailable(_)) => "CONTENT_UNAVAILABLE",
            AppError::Generation(GenerationError::MalformedOutput(_)) => "MALFORMED_OUTPUT",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Generation(GenerationError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Generation(GenerationError::MalformedOutput(_)) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            kind: self.error_code(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
