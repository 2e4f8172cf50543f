// ==========================================
// Quotation system - config layer
// ==========================================
// Process settings: environment (AppConfig)
// Import settings: config_kv table (ConfigManager)
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod import_config_trait;

pub use app_config::{default_db_path, AppConfig};
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ConfigResult, ImportConfigReader};
