//! Error types for the bookstore server

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Machine-readable codes carried in [`ErrorResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 1,
    MalformedJson = 2,
    MalformedPath = 3,
    MalformedQuery = 4,
}

/// Field name (wire spelling) to human-readable message
pub type FieldErrors = BTreeMap<String, String>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bad request: {1}")]
    BadRequest(ErrorCode, String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                tracing::debug!("{}", msg);
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::Validation(fields) => {
                tracing::debug!(?fields, "Rejected book payload");
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            AppError::BadRequest(code, message) => {
                tracing::debug!(?code, "{}", message);
                let body = Json(ErrorResponse {
                    code: code as u32,
                    error: format!("{:?}", code),
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let first = errs.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some((camel_case(&field.to_string()), message))
            })
            .collect();
        AppError::Validation(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(ErrorCode::MalformedJson, rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(ErrorCode::MalformedPath, rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(ErrorCode::MalformedQuery, rejection.body_text())
    }
}

/// `published_date` -> `publishedDate`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
