// ==========================================
// Quotation system - import layer
// ==========================================
// Spreadsheet path: file_parser -> header_detector -> column_classifier
//                   -> field_mapper (+ data_cleaner) -> preview
//                   -> quotation_importer_impl (+ conflict_handler)
// PDF path: pdf_extractor -> job-order draft
// ==========================================

pub mod column_classifier;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_detector;
pub mod importer_trait;
pub mod pdf_extractor;
pub mod quotation_importer_impl;

// Implementations
pub use conflict_handler::ConflictHandler;
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{CanonicalField, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, ParsedSheet, UniversalFileParser, UploadedFile};
pub use pdf_extractor::{extract_text_from_pdf, FieldExtractor, PdfExtractor};
pub use quotation_importer_impl::QuotationImporterImpl;

// Trait interfaces
pub use importer_trait::{
    DuplicateDetector, FieldMapper, ImportNotifier, LogNotifier, QuotationImporter,
    RecordNormalizer, TabularReader,
};
