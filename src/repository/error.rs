// ==========================================
// Quotation system - repository error types
// ==========================================
// Tool: thiserror derive
// rusqlite constraint failures are mapped to dedicated variants
// ==========================================

use thiserror::Error;

/// Repository error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database errors =====
    #[error("ไม่พบข้อมูล: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("เชื่อมต่อฐานข้อมูลไม่สำเร็จ: {0}")]
    DatabaseConnectionError(String),

    #[error("ล็อกฐานข้อมูลไม่สำเร็จ: {0}")]
    LockError(String),

    #[error("คิวรีฐานข้อมูลไม่สำเร็จ: {0}")]
    DatabaseQueryError(String),

    #[error("ข้อมูลซ้ำ (unique constraint): {0}")]
    UniqueConstraintViolation(String),

    #[error("ข้อมูลอ้างอิงไม่ถูกต้อง (foreign key): {0}")]
    ForeignKeyViolation(String),

    // ===== Data errors =====
    #[error("ข้อมูลไม่ถูกต้อง: {0}")]
    ValidationError(String),

    // ===== Generic =====
    #[error("ข้อผิดพลาดภายใน: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InternalError(format!("JSON: {}", err))
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
