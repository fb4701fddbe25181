use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal server error")]
    Database(sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid data")]
    Validation(Vec<String>),

    #[error("{0}")]
    Internal(String),
}

/// Wire shape for every non-validation failure: `{"errors":[{"message": ...}]}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorMessage>,
}

/// Wire shape for rejected input: `{"error":"Invalid data","details":[{"message": ...}]}`.
#[derive(Debug, Serialize)]
pub struct ValidationBody {
    pub error: String,
    pub details: Vec<ErrorMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            log::error!("request failed with status {}: {}", status_code, self.log_detail());
        } else {
            log::warn!("request failed with status {}: {}", status_code, self);
        }

        match self {
            AppError::Validation(messages) => {
                HttpResponse::build(status_code).json(ValidationBody {
                    error: self.to_string(),
                    details: messages.iter().map(|m| ErrorMessage { message: m.clone() }).collect(),
                })
            }
            _ => HttpResponse::build(status_code).json(ErrorBody {
                errors: vec![ErrorMessage {
                    message: self.to_string(),
                }],
            }),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        AppError::Database(error)
    }
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    pub fn validation(messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        AppError::Validation(messages.into_iter().map(Into::into).collect())
    }

    /// Full detail for server-side logs; the wire body stays generic for 5xx.
    pub(crate) fn log_detail(&self) -> String {
        match self {
            AppError::Database(source) => format!("database: {}", source),
            AppError::Internal(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Malformed JSON bodies surface through the validation envelope instead of
/// actix's default 400 text body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation([err.to_string()]).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::validation([err.to_string()]).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::validation([err.to_string()]).into())
}
