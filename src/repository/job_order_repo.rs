// ==========================================
// Quotation system - job order repository
// ==========================================
// Job orders saved from confirmed PDF extractions
// colors / options are stored as JSON arrays
// ==========================================

use crate::domain::{JobOrder, Money};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// JobOrderRepository Trait
// ==========================================
#[async_trait]
pub trait JobOrderRepository: Send + Sync {
    async fn exists_by_job_number(&self, job_number: &str) -> RepositoryResult<bool>;

    /// # Errors
    /// - UniqueConstraintViolation when the job number is taken
    async fn insert(&self, job_order: &JobOrder) -> RepositoryResult<i64>;

    async fn find_by_job_number(&self, job_number: &str) -> RepositoryResult<Option<JobOrder>>;
}

// ==========================================
// JobOrderRepositoryImpl
// ==========================================
pub struct JobOrderRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl JobOrderRepositoryImpl {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl JobOrderRepository for JobOrderRepositoryImpl {
    async fn exists_by_job_number(&self, job_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM job_orders WHERE job_number = ?1 LIMIT 1",
                params![job_number],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    async fn insert(&self, job: &JobOrder) -> RepositoryResult<i64> {
        let colors = serde_json::to_string(&job.colors)?;
        let options = serde_json::to_string(&job.options)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO job_orders (
                job_number, customer_name, submission_date, delivery_date,
                delivery_address, car_model, quantity, colors, options,
                price, remarks, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                job.job_number,
                job.customer_name,
                job.submission_date,
                job.delivery_date,
                job.delivery_address,
                job.car_model,
                job.quantity,
                colors,
                options,
                job.price.map(|p| p.satang()),
                job.remarks,
                job.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_by_job_number(&self, job_number: &str) -> RepositoryResult<Option<JobOrder>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT id, job_number, customer_name, submission_date, delivery_date,
                       delivery_address, car_model, quantity, colors, options,
                       price, remarks, created_at
                FROM job_orders WHERE job_number = ?1
                "#,
                params![job_number],
                |row| {
                    Ok((
                        JobOrder {
                            id: row.get(0)?,
                            job_number: row.get(1)?,
                            customer_name: row.get(2)?,
                            submission_date: row.get(3)?,
                            delivery_date: row.get(4)?,
                            delivery_address: row.get(5)?,
                            car_model: row.get(6)?,
                            quantity: row.get(7)?,
                            colors: Vec::new(),
                            options: Vec::new(),
                            price: row.get::<_, Option<i64>>(10)?.map(Money::from_satang),
                            remarks: row.get(11)?,
                            created_at: row.get(12)?,
                        },
                        row.get::<_, String>(8)?,
                        row.get::<_, String>(9)?,
                    ))
                },
            )
            .optional()?;

        match raw {
            None => Ok(None),
            Some((mut job, colors, options)) => {
                job.colors = serde_json::from_str(&colors)?;
                job.options = serde_json::from_str(&options)?;
                Ok(Some(job))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use chrono::{NaiveDate, Utc};

    fn repo() -> JobOrderRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        JobOrderRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn job(number: &str) -> JobOrder {
        JobOrder {
            id: None,
            job_number: number.to_string(),
            customer_name: Some("สมชาย ใจดี".to_string()),
            submission_date: NaiveDate::from_ymd_opt(2025, 10, 31),
            delivery_date: NaiveDate::from_ymd_opt(2025, 11, 15),
            delivery_address: Some("99 ถ.สุขุมวิท\nชลบุรี".to_string()),
            car_model: Some("EVT3".to_string()),
            quantity: 2,
            colors: vec!["แดง".to_string(), "ขาว".to_string()],
            options: vec!["หลังคา".to_string()],
            price: Money::from_baht(91_800.0),
            remarks: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let repo = repo();
        repo.insert(&job("SAHO68-168000095")).await.unwrap();
        let stored = repo
            .find_by_job_number("SAHO68-168000095")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.colors, vec!["แดง", "ขาว"]);
        assert_eq!(stored.price, Money::from_baht(91_800.0));
        assert_eq!(stored.delivery_date, NaiveDate::from_ymd_opt(2025, 11, 15));
    }

    #[tokio::test]
    async fn test_duplicate_job_number() {
        let repo = repo();
        repo.insert(&job("SAHO1-1")).await.unwrap();
        assert!(repo.exists_by_job_number("SAHO1-1").await.unwrap());
        let err = repo.insert(&job("SAHO1-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}
