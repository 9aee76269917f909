//! Typed errors for the data layer, configuration, and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by the CRUD layer. Driver errors keep their source.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("{entity}: has no column {column}")]
    UnknownColumn { entity: &'static str, column: String },
    #[error("{entity}: column {column} cannot be changed")]
    ImmutableColumn { entity: &'static str, column: String },
    #[error("{entity}: column {column} expects {expected}")]
    InvalidValue {
        entity: &'static str,
        column: String,
        expected: &'static str,
    },
    #[error("{entity}: value has not been saved")]
    Transient { entity: &'static str },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the store rejected a write because a unique column already holds the value.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(#[from] figment::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] DatabaseError),
}

/// Well-formed JSON of the wrong shape is a validation error; anything else is a bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Db(e) => match e {
                DatabaseError::UnknownColumn { .. }
                | DatabaseError::ImmutableColumn { .. }
                | DatabaseError::InvalidValue { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
                }
                DatabaseError::Transient { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
                DatabaseError::Sqlx(sqlx::Error::RowNotFound) => {
                    (StatusCode::NOT_FOUND, "not_found")
                }
                e if e.is_unique_violation() => (StatusCode::CONFLICT, "conflict"),
                DatabaseError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            },
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
