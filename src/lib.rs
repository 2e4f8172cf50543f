// ==========================================
// Quotation system - core library
// ==========================================
// Sales quotations and job orders for Thai vehicle sales
// Stack: axum + rusqlite (SQLite) + calamine / csv / pdf-extract
// ==========================================

// Message catalogs (locales/th.yml, locales/en.yml)
rust_i18n::i18n!("locales", fallback = "th");

// ==========================================
// Modules
// ==========================================

// Domain - entities and value types
pub mod domain;

// Repositories - data access
pub mod repository;

// Import pipeline - spreadsheets and PDFs
pub mod importer;

// Settings - environment and config_kv
pub mod config;

// Database bootstrap (connection PRAGMAs, schema, seeds)
pub mod db;

pub mod logging;

pub mod i18n;

// API facades
pub mod api;

// HTTP application (router + shared state)
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    FileType, ImportBatchResult, ImportRecord, ImportStatus, JobOrder, MappedRecord,
    MasterDataKind, Money, Quotation,
};

pub use api::{ImportApi, MasterDataApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "SAHO Quotation Service";
