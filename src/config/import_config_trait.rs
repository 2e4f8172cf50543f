// ==========================================
// Quotation system - import config reader trait
// ==========================================
// Read-only settings the import pipeline needs
// No writes, no business logic
// ==========================================

use crate::domain::DateFallbackPolicy;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Leading rows inspected by the header detector
    ///
    /// # Default
    /// - 10
    async fn get_header_scan_rows(&self) -> ConfigResult<usize>;

    /// What happens to a date cell that cannot be read
    ///
    /// # Default
    /// - reject
    async fn get_date_fallback(&self) -> ConfigResult<DateFallbackPolicy>;

    /// Raw columns copied into each row error
    ///
    /// # Default
    /// - 5
    async fn get_error_snapshot_columns(&self) -> ConfigResult<usize>;

    /// Upload size limit in megabytes
    ///
    /// # Default
    /// - 20
    async fn get_max_upload_mb(&self) -> ConfigResult<usize>;
}
