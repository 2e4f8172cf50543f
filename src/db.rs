// ==========================================
// Quotation system - SQLite connection and schema
// ==========================================
// Every connection gets the same PRAGMAs (foreign keys + busy timeout)
// Schema is created idempotently; seeds use INSERT OR IGNORE
// ==========================================

use crate::domain::{MasterDataKind, MasterDataSeed};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version this build creates
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Master data shipped with the binary
const MASTER_DATA_SEED: &str = include_str!("../seeds/master_data.json");

/// Import settings written on first start: (key, value)
pub const DEFAULT_CONFIG: [(&str, &str); 4] = [
    ("import.header_scan_rows", "10"),
    ("import.date_fallback", "reject"),
    ("import.error_snapshot_columns", "5"),
    ("import.max_upload_mb", "20"),
];

/// Applies the shared PRAGMAs
///
/// foreign_keys and busy_timeout are per connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a connection with the shared PRAGMAs applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Reads schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
}

/// Creates every table the service uses
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS cars (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sale_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS provinces (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS colors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        -- Money columns hold satang (1/100 baht)
        CREATE TABLE IF NOT EXISTS quotations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quotation_number TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            customer_code TEXT,
            customer_group TEXT,
            submission_date TEXT NOT NULL,
            request_date TEXT,
            sale_member_id INTEGER REFERENCES sale_members(id) ON DELETE SET NULL,
            car_id INTEGER REFERENCES cars(id) ON DELETE SET NULL,
            province_id INTEGER REFERENCES provinces(id) ON DELETE SET NULL,
            additional_options TEXT,
            quantity INTEGER NOT NULL DEFAULT 0,
            price_per_unit INTEGER NOT NULL DEFAULT 0,
            price_per_unit_with_vat INTEGER NOT NULL DEFAULT 0,
            options_price INTEGER NOT NULL DEFAULT 0,
            transport_trips INTEGER NOT NULL DEFAULT 0,
            price_per_trip INTEGER NOT NULL DEFAULT 0,
            total_sales_price INTEGER NOT NULL DEFAULT 0,
            total_sales_price_with_options INTEGER NOT NULL DEFAULT 0,
            total_transport_cost INTEGER NOT NULL DEFAULT 0,
            grand_total INTEGER NOT NULL DEFAULT 0,
            payment_terms TEXT,
            contact_name TEXT,
            contact_phone TEXT,
            contact_email TEXT,
            source TEXT NOT NULL DEFAULT 'import',
            created_at TEXT NOT NULL
        );

        -- colors / options are JSON arrays
        CREATE TABLE IF NOT EXISTS job_orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_number TEXT NOT NULL UNIQUE,
            customer_name TEXT,
            submission_date TEXT,
            delivery_date TEXT,
            delivery_address TEXT,
            car_model TEXT,
            quantity INTEGER NOT NULL DEFAULT 0,
            colors TEXT NOT NULL DEFAULT '[]',
            options TEXT NOT NULL DEFAULT '[]',
            price INTEGER,
            remarks TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )?;

    if read_schema_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![CURRENT_SCHEMA_VERSION],
        )?;
    }

    Ok(())
}

/// Writes the default import settings without touching existing values
pub fn insert_default_config(conn: &Connection) -> rusqlite::Result<usize> {
    let mut inserted = 0;
    for (key, value) in DEFAULT_CONFIG {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
    }
    Ok(inserted)
}

/// Parses the bundled seed file
pub fn bundled_seed() -> RepositoryResult<MasterDataSeed> {
    serde_json::from_str(MASTER_DATA_SEED)
        .map_err(|e| RepositoryError::InternalError(format!("seed file: {}", e)))
}

/// Inserts seed names that are not present yet; returns rows inserted
pub fn seed_master_data(conn: &Connection, seed: &MasterDataSeed) -> rusqlite::Result<usize> {
    let now = Utc::now();
    let mut inserted = 0;

    for kind in MasterDataKind::ALL {
        let sql = format!(
            "INSERT OR IGNORE INTO {} (name, created_at) VALUES (?1, ?2)",
            kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        for name in seed.names(kind) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            inserted += stmt.execute(params![name, now])?;
        }
    }

    Ok(inserted)
}

/// Schema + default settings + bundled seeds; safe to run on every start
pub fn init_database(conn: &Connection) -> RepositoryResult<()> {
    init_schema(conn)?;
    let config_rows = insert_default_config(conn)?;
    let seed_rows = seed_master_data(conn, &bundled_seed()?)?;

    tracing::info!(
        schema_version = CURRENT_SCHEMA_VERSION,
        config_rows,
        seed_rows,
        "database initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        conn
    }

    #[test]
    fn test_init_database_is_idempotent() {
        let conn = memory_db();
        init_database(&conn).unwrap();
        let cars_first: i64 = conn
            .query_row("SELECT COUNT(*) FROM cars", [], |r| r.get(0))
            .unwrap();
        init_database(&conn).unwrap();
        let cars_second: i64 = conn
            .query_row("SELECT COUNT(*) FROM cars", [], |r| r.get(0))
            .unwrap();

        assert!(cars_first > 0);
        assert_eq!(cars_first, cars_second);
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_default_config_does_not_overwrite() {
        let conn = memory_db();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', 'import.date_fallback', 'today')",
            [],
        )
        .unwrap();
        insert_default_config(&conn).unwrap();

        let value: String = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id='global' AND key='import.date_fallback'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(value, "today");
    }

    #[test]
    fn test_bundled_seed_parses() {
        let seed = bundled_seed().unwrap();
        assert!(!seed.provinces.is_empty());
        assert!(!seed.colors.is_empty());
    }

    #[test]
    fn test_schema_version_absent_before_init() {
        let conn = memory_db();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
