// ==========================================
// Quotation system - application state
// ==========================================
// One shared SQLite connection; repositories, config and API facades
// are built once and shared by every request
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ImportApi, MasterDataApi};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{bundled_seed, configure_sqlite_connection, init_database, open_sqlite_connection};
use crate::importer::pdf_extractor::ColorsRule;
use crate::importer::{PdfExtractor, QuotationImporterImpl};
use crate::repository::{
    JobOrderRepositoryImpl, MasterDataRepositoryImpl, QuotationRepositoryImpl, RepositoryError,
    RepositoryResult,
};

/// Shared by all handlers behind an `Arc`
pub struct AppState {
    pub db_path: String,
    pub config: Arc<ConfigManager>,
    pub import_api: Arc<ImportApi>,
    pub master_data_api: Arc<MasterDataApi>,
}

impl AppState {
    /// Opens (and initializes) the database file
    ///
    /// # Arguments
    /// - db_path: SQLite file path
    ///
    /// # Returns
    /// - Ok(AppState) with schema, default settings and seeds in place
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, "initializing app state");
        let conn = open_sqlite_connection(&db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e))
        })?;
        Self::from_connection(db_path, conn)
    }

    /// Builds the state over an existing connection (tests pass `:memory:`)
    pub fn from_connection(db_path: String, conn: Connection) -> RepositoryResult<Self> {
        configure_sqlite_connection(&conn)?;
        init_database(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repositories
        // ==========================================
        let quotation_repo = Arc::new(QuotationRepositoryImpl::from_connection(conn.clone()));
        let master_repo = Arc::new(MasterDataRepositoryImpl::from_connection(conn.clone()));
        let job_order_repo = Arc::new(JobOrderRepositoryImpl::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // Importer + API facades
        // ==========================================
        let importer = Arc::new(QuotationImporterImpl::new(
            quotation_repo,
            master_repo.clone(),
            config.clone() as Arc<dyn ImportConfigReader>,
        ));

        let seed_colors = bundled_seed()?.colors;
        let pdf_extractor = if seed_colors.is_empty() {
            PdfExtractor::default()
        } else {
            PdfExtractor::default().with_colors(ColorsRule::new(seed_colors))
        };

        let import_api = ImportApi::new(config.clone(), importer, job_order_repo)
            .with_pdf_extractor(pdf_extractor);
        let master_data_api = MasterDataApi::new(master_repo);

        tracing::info!("app state ready");
        Ok(Self {
            db_path,
            config,
            import_api: Arc::new(import_api),
            master_data_api: Arc::new(master_data_api),
        })
    }
}
