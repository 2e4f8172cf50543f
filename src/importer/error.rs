// ==========================================
// Quotation system - importer error types
// ==========================================
// Tool: thiserror derive
// Messages are Thai first, English in parentheses
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Input format errors (abort the request) =====
    #[error("ไม่รองรับไฟล์นามสกุล: {0} (รองรับ .xlsx/.xlsm/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("อ่านไฟล์ไม่สำเร็จ: {0}")]
    FileReadError(String),

    #[error("อ่านไฟล์ Excel ไม่สำเร็จ: {0}")]
    ExcelParseError(String),

    #[error("อ่านไฟล์ CSV ไม่สำเร็จ: {0}")]
    CsvParseError(String),

    #[error("ไม่พบชีต: {0}")]
    SheetNotFound(String),

    #[error("ไฟล์ไม่มีชีตข้อมูล (workbook has no sheets)")]
    EmptyWorkbook,

    #[error("ไม่พบแถวหัวตาราง (header row not found in the first {scanned} rows)")]
    HeaderNotFound { scanned: usize },

    #[error("อ่านไฟล์ PDF ไม่สำเร็จ: {0}")]
    PdfParseError(String),

    // ===== Row-level errors (recorded, batch continues) =====
    #[error("แถว {row}: ไม่พบชื่อลูกค้า (missing customer name)")]
    MissingCustomerName { row: usize },

    #[error("แถว {row}: เลขที่ใบเสนอราคา {quotation_number} มีอยู่แล้วในระบบ (duplicate quotation number)")]
    DuplicateQuotation {
        row: usize,
        quotation_number: String,
    },

    #[error("แถว {row}: รูปแบบวันที่ไม่ถูกต้องในช่อง {field}: {value}")]
    InvalidDate {
        row: usize,
        field: String,
        value: String,
    },

    #[error("แถว {row}: {message}")]
    RowRejected { row: usize, message: String },

    // ===== Collaborator errors =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("อ่านค่าตั้งค่าไม่สำเร็จ (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// Input format errors block the preview step
    pub fn is_input_format_error(&self) -> bool {
        matches!(
            self,
            ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::SheetNotFound(_)
                | ImportError::EmptyWorkbook
                | ImportError::HeaderNotFound { .. }
                | ImportError::PdfParseError(_)
        )
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
