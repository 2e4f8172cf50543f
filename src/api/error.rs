// ==========================================
// Quotation system - API error type
// ==========================================
// Converts importer / repository errors into HTTP responses
// Body: {"success": false, "message": "..."}
// ==========================================

use crate::i18n::t_with_args;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 400 =====
    #[error("ข้อมูลคำขอไม่ถูกต้อง: {0}")]
    InvalidInput(String),

    /// Unreadable upload; the importer message is passed through
    #[error("{0}")]
    ImportFailed(String),

    #[error("ข้อมูลขัดแย้งกับข้อมูลที่มีอยู่: {0}")]
    BusinessRuleViolation(String),

    // ===== 404 =====
    /// Message is already user-facing
    #[error("{0}")]
    NotFound(String),

    // ===== 500 =====
    #[error("ฐานข้อมูลผิดพลาด: {0}")]
    DatabaseError(String),

    #[error("เกิดข้อผิดพลาดภายในระบบ: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::ImportFailed(_)
            | ApiError::BusinessRuleViolation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) | ApiError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message in the current locale
    pub fn localized_message(&self) -> String {
        match self {
            ApiError::InvalidInput(detail) => {
                t_with_args("api.invalid_request", &[("detail", detail)])
            }
            ApiError::DatabaseError(detail) | ApiError::InternalError(detail) => {
                t_with_args("api.internal_error", &[("detail", detail)])
            }
            ApiError::Other(err) => {
                t_with_args("api.internal_error", &[("detail", &err.to_string())])
            }
            ApiError::ImportFailed(message)
            | ApiError::BusinessRuleViolation(message)
            | ApiError::NotFound(message) => message.clone(),
        }
    }
}

// ==========================================
// From ImportError
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::SheetNotFound(_) => ApiError::NotFound(err.to_string()),
            ImportError::Repository(repo_err) => ApiError::from(repo_err),
            ImportError::ConfigReadError { .. } => ApiError::InternalError(err.to_string()),
            ImportError::Other(inner) => ApiError::Other(inner),
            e if e.is_input_format_error() => ApiError::ImportFailed(e.to_string()),
            // Row-level errors only reach here outside the batch loop
            e => ApiError::InvalidInput(e.to_string()),
        }
    }
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ApiError::NotFound(t_with_args(
                "api.not_found",
                &[("detail", &format!("{} (id={})", entity, id))],
            )),
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("lock failed: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "message": self.localized_message(),
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_status_mapping() {
        let unsupported: ApiError = ImportError::UnsupportedFormat(".txt".to_string()).into();
        assert_eq!(unsupported.status_code(), StatusCode::BAD_REQUEST);
        assert!(unsupported.localized_message().contains(".txt"));

        let header: ApiError = ImportError::HeaderNotFound { scanned: 10 }.into();
        assert_eq!(header.status_code(), StatusCode::BAD_REQUEST);

        let sheet: ApiError = ImportError::SheetNotFound("Q4".to_string()).into();
        assert_eq!(sheet.status_code(), StatusCode::NOT_FOUND);

        let lock: ApiError =
            ImportError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert_eq!(lock.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_repository_error_status_mapping() {
        let missing: ApiError = RepositoryError::NotFound {
            entity: "cars".to_string(),
            id: "7".to_string(),
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let dup: ApiError = RepositoryError::UniqueConstraintViolation("job_number".to_string()).into();
        assert_eq!(dup.status_code(), StatusCode::BAD_REQUEST);
    }
}
