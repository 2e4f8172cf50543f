// ==========================================
// Quotation system - config manager
// ==========================================
// Storage: config_kv table (scope_id + key -> value)
// Only the 'global' scope is used
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::DateFallbackPolicy;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const HEADER_SCAN_ROWS: &str = "import.header_scan_rows";
    pub const DATE_FALLBACK: &str = "import.date_fallback";
    pub const ERROR_SNAPSHOT_COLUMNS: &str = "import.error_snapshot_columns";
    pub const MAX_UPLOAD_MB: &str = "import.max_upload_mb";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Opens its own connection
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Value of a global key
    ///
    /// # Returns
    /// - Some(value): key present
    /// - None: key absent
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("config lock failed: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Inserts or replaces a global key
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("config lock failed: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "config updated");
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Positive integer setting; unreadable or zero values use the default
    fn get_positive_usize(&self, key: &str, default: usize) -> ConfigResult<usize> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        Ok(value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(default))
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_header_scan_rows(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::HEADER_SCAN_ROWS, 10)
    }

    async fn get_date_fallback(&self) -> ConfigResult<DateFallbackPolicy> {
        let value = self.get_config_or_default(config_keys::DATE_FALLBACK, "reject")?;
        match value.parse::<DateFallbackPolicy>() {
            Ok(policy) => Ok(policy),
            Err(other) => {
                tracing::warn!(value = %other, "unknown date fallback policy, using reject");
                Ok(DateFallbackPolicy::Reject)
            }
        }
    }

    async fn get_error_snapshot_columns(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::ERROR_SNAPSHOT_COLUMNS, 5)
    }

    async fn get_max_upload_mb(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::MAX_UPLOAD_MB, 20)
    }
}
