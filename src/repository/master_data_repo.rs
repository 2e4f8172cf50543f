// ==========================================
// Quotation system - master data repository
// ==========================================
// Cars / sale members / provinces / colors
// One table per MasterDataKind; names match exactly (case-sensitive)
// ==========================================

use crate::db::seed_master_data;
use crate::domain::{MasterDataEntry, MasterDataKind, MasterDataSeed};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// MasterDataRepository Trait
// ==========================================
// Implementor: MasterDataRepositoryImpl (rusqlite)
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    /// Entry with exactly this name, created when missing
    ///
    /// # Errors
    /// - ValidationError on a blank name
    async fn find_or_create(
        &self,
        kind: MasterDataKind,
        name: &str,
    ) -> RepositoryResult<MasterDataEntry>;

    async fn find_by_name(
        &self,
        kind: MasterDataKind,
        name: &str,
    ) -> RepositoryResult<Option<MasterDataEntry>>;

    /// All entries of one kind ordered by name
    async fn list(&self, kind: MasterDataKind) -> RepositoryResult<Vec<MasterDataEntry>>;

    /// # Errors
    /// - NotFound when no entry has this id
    async fn delete(&self, kind: MasterDataKind, id: i64) -> RepositoryResult<()>;

    /// Inserts missing seed names; returns rows inserted
    async fn seed(&self, seed: &MasterDataSeed) -> RepositoryResult<usize>;
}

// ==========================================
// MasterDataRepositoryImpl
// ==========================================
pub struct MasterDataRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl MasterDataRepositoryImpl {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn select_by_name(
        conn: &Connection,
        kind: MasterDataKind,
        name: &str,
    ) -> rusqlite::Result<Option<MasterDataEntry>> {
        let sql = format!(
            "SELECT id, name, created_at FROM {} WHERE name = ?1",
            kind.table()
        );
        conn.query_row(&sql, params![name], |row| {
            Ok(MasterDataEntry {
                id: row.get(0)?,
                kind,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .optional()
    }
}

#[async_trait]
impl MasterDataRepository for MasterDataRepositoryImpl {
    async fn find_or_create(
        &self,
        kind: MasterDataKind,
        name: &str,
    ) -> RepositoryResult<MasterDataEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "{}: ชื่อว่าง (empty name)",
                kind
            )));
        }

        let conn = self.get_conn()?;
        if let Some(entry) = Self::select_by_name(&conn, kind, name)? {
            return Ok(entry);
        }

        let sql = format!(
            "INSERT INTO {} (name, created_at) VALUES (?1, ?2)",
            kind.table()
        );
        conn.execute(&sql, params![name, Utc::now()])?;
        tracing::info!(kind = %kind, name, "master data created");

        Self::select_by_name(&conn, kind, name)?.ok_or_else(|| RepositoryError::NotFound {
            entity: kind.to_string(),
            id: name.to_string(),
        })
    }

    async fn find_by_name(
        &self,
        kind: MasterDataKind,
        name: &str,
    ) -> RepositoryResult<Option<MasterDataEntry>> {
        let conn = self.get_conn()?;
        Ok(Self::select_by_name(&conn, kind, name.trim())?)
    }

    async fn list(&self, kind: MasterDataKind) -> RepositoryResult<Vec<MasterDataEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, name, created_at FROM {} ORDER BY name",
            kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], |row| {
                Ok(MasterDataEntry {
                    id: row.get(0)?,
                    kind,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn delete(&self, kind: MasterDataKind, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        let affected = conn.execute(&sql, params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: kind.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn seed(&self, seed: &MasterDataSeed) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(seed_master_data(&conn, seed)?)
    }
}
