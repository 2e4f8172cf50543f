// ==========================================
// Quotation system - quotation repository (rusqlite)
// ==========================================
// Money columns hold satang; dates are ISO text
// ==========================================

use crate::domain::{Money, Quotation, QuotationTotals};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::quotation_repo::QuotationRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    id, quotation_number, customer_name, customer_code, customer_group,
    submission_date, request_date, sale_member_id, car_id, province_id,
    additional_options, quantity, price_per_unit, price_per_unit_with_vat,
    options_price, transport_trips, price_per_trip, total_sales_price,
    total_sales_price_with_options, total_transport_cost, grand_total,
    payment_terms, contact_name, contact_phone, contact_email, source, created_at
"#;

// ==========================================
// QuotationRepositoryImpl
// ==========================================
pub struct QuotationRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl QuotationRepositoryImpl {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Quotation> {
        Ok(Quotation {
            id: row.get(0)?,
            quotation_number: row.get(1)?,
            customer_name: row.get(2)?,
            customer_code: row.get(3)?,
            customer_group: row.get(4)?,
            submission_date: row.get(5)?,
            request_date: row.get(6)?,
            sale_member_id: row.get(7)?,
            car_id: row.get(8)?,
            province_id: row.get(9)?,
            additional_options: row.get(10)?,
            quantity: row.get(11)?,
            price_per_unit: Money::from_satang(row.get(12)?),
            price_per_unit_with_vat: Money::from_satang(row.get(13)?),
            options_price: Money::from_satang(row.get(14)?),
            transport_trips: row.get(15)?,
            price_per_trip: Money::from_satang(row.get(16)?),
            totals: QuotationTotals {
                total_sales_price: Money::from_satang(row.get(17)?),
                total_sales_price_with_options: Money::from_satang(row.get(18)?),
                total_transport_cost: Money::from_satang(row.get(19)?),
                grand_total: Money::from_satang(row.get(20)?),
            },
            payment_terms: row.get(21)?,
            contact_name: row.get(22)?,
            contact_phone: row.get(23)?,
            contact_email: row.get(24)?,
            source: row.get(25)?,
            created_at: row.get(26)?,
        })
    }
}

#[async_trait]
impl QuotationRepository for QuotationRepositoryImpl {
    async fn exists_by_number(&self, quotation_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM quotations WHERE quotation_number = ?1 LIMIT 1",
                params![quotation_number],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    async fn insert(&self, q: &Quotation) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO quotations (
                quotation_number, customer_name, customer_code, customer_group,
                submission_date, request_date, sale_member_id, car_id, province_id,
                additional_options, quantity, price_per_unit, price_per_unit_with_vat,
                options_price, transport_trips, price_per_trip, total_sales_price,
                total_sales_price_with_options, total_transport_cost, grand_total,
                payment_terms, contact_name, contact_phone, contact_email, source, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26
            )
            "#,
            params![
                q.quotation_number,
                q.customer_name,
                q.customer_code,
                q.customer_group,
                q.submission_date,
                q.request_date,
                q.sale_member_id,
                q.car_id,
                q.province_id,
                q.additional_options,
                q.quantity,
                q.price_per_unit.satang(),
                q.price_per_unit_with_vat.satang(),
                q.options_price.satang(),
                q.transport_trips,
                q.price_per_trip.satang(),
                q.totals.total_sales_price.satang(),
                q.totals.total_sales_price_with_options.satang(),
                q.totals.total_transport_cost.satang(),
                q.totals.grand_total.satang(),
                q.payment_terms,
                q.contact_name,
                q.contact_phone,
                q.contact_email,
                q.source,
                q.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_by_number(&self, quotation_number: &str) -> RepositoryResult<Option<Quotation>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM quotations WHERE quotation_number = ?1",
            SELECT_COLUMNS
        );
        let quotation = conn
            .query_row(&sql, params![quotation_number], Self::map_row)
            .optional()?;
        Ok(quotation)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM quotations", [], |row| row.get(0))?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use chrono::{NaiveDate, Utc};

    fn repo() -> QuotationRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        QuotationRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn quotation(number: &str) -> Quotation {
        let unit = Money::from_baht(45_900.0).unwrap();
        let trip = Money::from_baht(1_500.0).unwrap();
        Quotation {
            id: None,
            quotation_number: number.to_string(),
            customer_name: "Acme Co".to_string(),
            customer_code: None,
            customer_group: None,
            submission_date: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            request_date: None,
            sale_member_id: None,
            car_id: None,
            province_id: None,
            additional_options: None,
            quantity: 3,
            price_per_unit: unit,
            price_per_unit_with_vat: unit,
            options_price: Money::ZERO,
            transport_trips: 2,
            price_per_trip: trip,
            totals: QuotationTotals::compute(3, unit, Money::ZERO, 2, trip).unwrap(),
            payment_terms: None,
            contact_name: None,
            contact_phone: None,
            contact_email: None,
            source: "import".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = repo();
        assert!(!repo.exists_by_number("QT-001").await.unwrap());

        let id = repo.insert(&quotation("QT-001")).await.unwrap();
        assert!(id > 0);
        assert!(repo.exists_by_number("QT-001").await.unwrap());

        let stored = repo.find_by_number("QT-001").await.unwrap().unwrap();
        assert_eq!(stored.quantity, 3);
        assert_eq!(stored.totals.grand_total, Money::from_baht(140_700.0).unwrap());
        assert_eq!(stored.submission_date, NaiveDate::from_ymd_opt(2025, 10, 31).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let repo = repo();
        repo.insert(&quotation("QT-002")).await.unwrap();
        let err = repo.insert(&quotation("QT-002")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
