// ==========================================
// Quotation system - process settings
// ==========================================
// Read once at startup from the environment
// QUOTATION_DB_PATH / QUOTATION_BIND_ADDR / QUOTATION_LOCALE
// ==========================================

use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "QUOTATION_DB_PATH";
pub const ENV_BIND_ADDR: &str = "QUOTATION_BIND_ADDR";
pub const ENV_LOCALE: &str = "QUOTATION_LOCALE";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOCALE: &str = "th";
pub const SUPPORTED_LOCALES: [&str; 2] = ["th", "en"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub locale: String,
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_non_empty)
    }

    /// Builds the settings from any key lookup (tests pass a closure)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let locale = lookup(ENV_LOCALE)
            .map(|l| l.to_lowercase())
            .filter(|l| SUPPORTED_LOCALES.contains(&l.as_str()))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self {
            db_path: lookup(ENV_DB_PATH).unwrap_or_else(default_db_path),
            bind_addr: lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            locale,
        }
    }
}

/// Database file under the user data directory, `./saho_quotation.db` otherwise
pub fn default_db_path() -> String {
    let mut path = PathBuf::from("./saho_quotation.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("saho-quotation-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("saho-quotation");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("saho_quotation.db");
        }
    }

    path.to_string_lossy().to_string()
}
