// ==========================================
// Quotation system - domain layer
// ==========================================
// Entities and value types; no data access, no parsing
// ==========================================

pub mod import;
pub mod job_order;
pub mod master_data;
pub mod quotation;
pub mod types;

pub use import::{
    CellValue, ImportBatchResult, ImportRecord, ImportedSummary, MappedRecord, RawCells, RawRow,
    RecordIssue, RowError,
};
pub use job_order::{JobOrder, JobOrderDraft, PdfExtraction};
pub use master_data::{MasterDataEntry, MasterDataSeed};
pub use quotation::{Money, Quotation, QuotationTotals};
pub use types::{DateFallbackPolicy, FileType, ImportStatus, MasterDataKind};
