// ==========================================
// Quotation system - importer traits
// ==========================================
// Interfaces only; implementations live beside this file
// Pipeline: read grid -> detect header -> classify -> map -> normalize
//           -> (user review) -> execute
// ==========================================

use crate::domain::{
    CellValue, FileType, ImportBatchResult, ImportRecord, MappedRecord, RawRow, RecordIssue,
};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{SheetGrid, UploadedFile};
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// TabularReader Trait
// ==========================================
// Implementors: ExcelParser, CsvParser
pub trait TabularReader: Send + Sync {
    /// Sheet names in workbook order
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>>;

    /// Reads every row of one sheet as cells
    ///
    /// # Errors
    /// - SheetNotFound when `sheet_name` is not in the workbook
    /// - ExcelParseError / CsvParseError on unreadable content
    fn read_grid(&self, file: &UploadedFile, sheet_name: &str) -> ImportResult<SheetGrid>;
}

// ==========================================
// RecordNormalizer Trait
// ==========================================
// Implementor: DataCleaner
pub trait RecordNormalizer: Send + Sync {
    /// Trimmed text, None when blank
    fn clean_text(&self, cell: &CellValue) -> Option<String>;

    /// Thousands separators and currency marks stripped; 0 when empty or unreadable
    fn parse_number(&self, cell: &CellValue) -> f64;

    /// Excel serial or text date
    ///
    /// # Returns
    /// - Ok(None): blank cell
    /// - Ok(Some(date)): Gregorian date, Buddhist years already corrected
    /// - Err(text): non-empty cell that is not a date
    fn parse_date(&self, cell: &CellValue) -> Result<Option<NaiveDate>, String>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// Implementor: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// Maps one raw row to canonical fields
    ///
    /// # Returns
    /// - MappedRecord with every field the alias tables could fill
    /// - issues for cells that were present but unreadable
    fn map_row(&self, row: &RawRow, file_type: FileType) -> (MappedRecord, Vec<RecordIssue>);
}

// ==========================================
// DuplicateDetector Trait
// ==========================================
// Implementor: ConflictHandler
pub trait DuplicateDetector: Send + Sync {
    /// Quotation numbers used by more than one approved record in the batch,
    /// with the row numbers using them
    fn find_batch_duplicates(&self, records: &[ImportRecord]) -> Vec<(String, Vec<usize>)>;
}

// ==========================================
// ImportNotifier Trait
// ==========================================
// Receives executor progress; the default writes to the log
pub trait ImportNotifier: Send + Sync {
    fn row_failed(&self, batch_id: &str, row_number: usize, message: &str);

    fn batch_completed(&self, batch_id: &str, result: &ImportBatchResult);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl ImportNotifier for LogNotifier {
    fn row_failed(&self, batch_id: &str, row_number: usize, message: &str) {
        tracing::warn!(batch_id, row_number, message, "import row failed");
    }

    fn batch_completed(&self, batch_id: &str, result: &ImportBatchResult) {
        tracing::info!(
            batch_id,
            success = result.success,
            failed = result.failed,
            skipped = result.skipped,
            "import batch completed"
        );
    }
}

// ==========================================
// QuotationImporter Trait
// ==========================================
// Implementor: QuotationImporterImpl
#[async_trait]
pub trait QuotationImporter: Send + Sync {
    /// Imports user-reviewed records
    ///
    /// # Arguments
    /// - records: preview records carrying the user's approve/reject decision
    /// - file_type: classification reported by the preview
    ///
    /// # Returns
    /// - Ok(ImportBatchResult): per-row outcomes; row failures never abort the batch
    /// - Err: configuration could not be read
    async fn import_records(
        &self,
        records: Vec<ImportRecord>,
        file_type: FileType,
    ) -> ImportResult<ImportBatchResult>;
}
