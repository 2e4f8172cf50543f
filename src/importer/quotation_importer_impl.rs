// ==========================================
// Quotation system - import executor
// ==========================================
// Input: preview records carrying the user's decision
// Flow per approved row: number -> customer -> date issues -> totals
//                        -> duplicate -> master data -> insert
// Rows are processed one after another; a failed row never stops the batch
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::quotation::to_units;
use crate::domain::{
    DateFallbackPolicy, FileType, ImportBatchResult, ImportRecord, ImportStatus, ImportedSummary,
    MasterDataKind, Money, Quotation, QuotationTotals, RowError,
};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{
    DuplicateDetector, ImportNotifier, LogNotifier, QuotationImporter,
};
use crate::repository::{MasterDataRepository, QuotationRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Source tag stored on imported quotations
pub const IMPORT_SOURCE: &str = "import";

/// Settings read once per batch
#[derive(Debug, Clone, Copy)]
struct BatchSettings {
    date_fallback: DateFallbackPolicy,
    snapshot_columns: usize,
    today: NaiveDate,
}

// ==========================================
// QuotationImporterImpl
// ==========================================
pub struct QuotationImporterImpl {
    quotation_repo: Arc<dyn QuotationRepository>,
    master_repo: Arc<dyn MasterDataRepository>,
    config: Arc<dyn ImportConfigReader>,
    duplicate_detector: Box<dyn DuplicateDetector>,
    notifier: Arc<dyn ImportNotifier>,
}

impl QuotationImporterImpl {
    /// # Arguments
    /// - quotation_repo: quotation storage
    /// - master_repo: cars / sale members / provinces
    /// - config: import settings
    pub fn new(
        quotation_repo: Arc<dyn QuotationRepository>,
        master_repo: Arc<dyn MasterDataRepository>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            quotation_repo,
            master_repo,
            config,
            duplicate_detector: Box::new(ConflictHandler),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Replaces the default log-only notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn ImportNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    async fn load_settings(&self) -> ImportResult<BatchSettings> {
        let date_fallback = self.config.get_date_fallback().await.map_err(|e| {
            ImportError::ConfigReadError {
                key: "import.date_fallback".to_string(),
                message: e.to_string(),
            }
        })?;
        let snapshot_columns = self.config.get_error_snapshot_columns().await.map_err(|e| {
            ImportError::ConfigReadError {
                key: "import.error_snapshot_columns".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(BatchSettings {
            date_fallback,
            snapshot_columns,
            today: Local::now().date_naive(),
        })
    }

    /// Master data id for an optional name (created when missing)
    async fn resolve_master(
        &self,
        kind: MasterDataKind,
        name: Option<&str>,
    ) -> ImportResult<Option<i64>> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(None),
            Some(name) => Ok(Some(self.master_repo.find_or_create(kind, name).await?.id)),
        }
    }

    /// Imports one approved row
    async fn import_row(
        &self,
        record: &ImportRecord,
        settings: &BatchSettings,
        warnings: &mut Vec<String>,
    ) -> ImportResult<ImportedSummary> {
        let row = record.row_number;
        let data = &record.data;

        // 1. Quotation number, generated when blank
        let quotation_number = match data
            .quotation_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(n) => n.to_string(),
            None => format!("AUTO-{}-{}", Utc::now().timestamp_millis(), row),
        };

        // 2. Customer name is mandatory
        let customer_name = data
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ImportError::MissingCustomerName { row })?
            .to_string();

        // 3. Dates the preview could not read
        let mut submission_date = data.submission_date;
        let mut request_date = data.request_date;
        if let Some(issue) = record.issues.first() {
            match settings.date_fallback {
                DateFallbackPolicy::Reject => {
                    return Err(ImportError::InvalidDate {
                        row,
                        field: issue.field.clone(),
                        value: issue.value.clone(),
                    });
                }
                DateFallbackPolicy::Today => {
                    for issue in &record.issues {
                        match issue.field.as_str() {
                            "submissionDate" => submission_date = Some(settings.today),
                            "requestDate" => request_date = Some(settings.today),
                            _ => continue,
                        }
                        warnings.push(format!(
                            "แถว {}: วันที่ \"{}\" ในช่อง {} อ่านไม่ได้ ใช้วันที่นำเข้า {} แทน",
                            row, issue.value, issue.field, settings.today
                        ));
                    }
                }
            }
        }

        // 4. Totals in satang; sheet prices already include VAT
        let out_of_range = |field: &str| ImportError::RowRejected {
            row,
            message: format!("ค่าในช่อง {} เกินช่วงที่รองรับ (value out of range)", field),
        };
        let quantity = to_units(data.quantity).ok_or_else(|| out_of_range("quantity"))?;
        let transport_trips =
            to_units(data.transport_trips).ok_or_else(|| out_of_range("transportTrips"))?;
        let price_per_unit =
            Money::from_baht(data.price_per_unit).ok_or_else(|| out_of_range("pricePerUnit"))?;
        let price_per_trip =
            Money::from_baht(data.price_per_trip).ok_or_else(|| out_of_range("pricePerTrip"))?;
        let totals = QuotationTotals::compute(
            quantity,
            price_per_unit,
            Money::ZERO,
            transport_trips,
            price_per_trip,
        )
        .ok_or_else(|| out_of_range("grandTotal"))?;

        // 5. Never overwrite an existing quotation
        if self.quotation_repo.exists_by_number(&quotation_number).await? {
            return Err(ImportError::DuplicateQuotation {
                row,
                quotation_number,
            });
        }

        // 6. Master data by exact name
        let car_id = self
            .resolve_master(MasterDataKind::Car, data.car_name.as_deref())
            .await?;
        let sale_member_id = self
            .resolve_master(MasterDataKind::SaleMember, data.sale_member_name.as_deref())
            .await?;
        let province_id = self
            .resolve_master(MasterDataKind::Province, data.province_name.as_deref())
            .await?;

        let quotation = Quotation {
            id: None,
            quotation_number: quotation_number.clone(),
            customer_name: customer_name.clone(),
            customer_code: data.customer_code.clone(),
            customer_group: data.customer_group.clone(),
            submission_date: submission_date.unwrap_or(settings.today),
            request_date,
            sale_member_id,
            car_id,
            province_id,
            additional_options: data.additional_options.clone(),
            quantity,
            price_per_unit,
            price_per_unit_with_vat: price_per_unit,
            options_price: Money::ZERO,
            transport_trips,
            price_per_trip,
            totals,
            payment_terms: data.payment_terms.clone(),
            contact_name: data.contact_name.clone(),
            contact_phone: data.contact_phone.clone(),
            contact_email: data.contact_email.clone(),
            source: IMPORT_SOURCE.to_string(),
            created_at: Utc::now(),
        };

        // 7. Insert; a concurrent insert of the same number is still a duplicate
        match self.quotation_repo.insert(&quotation).await {
            Ok(_) => {}
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ImportError::DuplicateQuotation {
                    row,
                    quotation_number,
                });
            }
            Err(e) => return Err(e.into()),
        }

        debug!(row_number = row, quotation_number = %quotation_number, "row imported");
        Ok(ImportedSummary {
            row_number: row,
            quotation_number,
            customer_name,
            grand_total: totals.grand_total.to_baht(),
        })
    }
}

#[async_trait]
impl QuotationImporter for QuotationImporterImpl {
    #[instrument(skip(self, records), fields(batch_id = tracing::field::Empty, total = records.len()))]
    async fn import_records(
        &self,
        records: Vec<ImportRecord>,
        file_type: FileType,
    ) -> ImportResult<ImportBatchResult> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let settings = self.load_settings().await?;
        info!(
            batch_id = %batch_id,
            date_fallback = %settings.date_fallback,
            "import batch started"
        );

        let mut result = ImportBatchResult::default();

        if file_type == FileType::Unknown {
            result.warnings.push(
                "ไม่สามารถระบุรูปแบบหัวตารางได้ (unknown file type) ระบบจับคู่คอลัมน์ทั้งภาษาไทยและอังกฤษ"
                    .to_string(),
            );
        }

        for (number, rows) in self.duplicate_detector.find_batch_duplicates(&records) {
            warn!(quotation_number = %number, rows = ?rows, "duplicate quotation number in batch");
            result.warnings.push(ConflictHandler::warning_for(&number, &rows));
        }

        for record in &records {
            if record.status != ImportStatus::Approved {
                result.skipped += 1;
                continue;
            }
            // No cells at all counts as an empty row
            if record.raw_data.is_all_falsy() {
                debug!(row_number = record.row_number, "empty row skipped");
                result.skipped += 1;
                continue;
            }

            match self.import_row(record, &settings, &mut result.warnings).await {
                Ok(summary) => {
                    result.success += 1;
                    result.imported.push(summary);
                }
                Err(e) => {
                    let message = e.to_string();
                    self.notifier
                        .row_failed(&batch_id, record.row_number, &message);
                    result.failed += 1;
                    result.errors.push(RowError {
                        row_number: record.row_number,
                        data: record.raw_data.snapshot(settings.snapshot_columns),
                        error: message,
                    });
                }
            }
        }

        self.notifier.batch_completed(&batch_id, &result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{config_keys, ConfigManager};
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::{CellValue, MappedRecord, RawCells, RecordIssue};
    use crate::repository::{MasterDataRepositoryImpl, QuotationRepositoryImpl};
    use rusqlite::Connection;
    use std::sync::Mutex;

    struct Fixture {
        importer: QuotationImporterImpl,
        quotations: Arc<QuotationRepositoryImpl>,
        masters: Arc<MasterDataRepositoryImpl>,
        config: Arc<ConfigManager>,
    }

    fn fixture() -> Fixture {
        crate::logging::init_test();
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let quotations = Arc::new(QuotationRepositoryImpl::from_connection(conn.clone()));
        let masters = Arc::new(MasterDataRepositoryImpl::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn));
        let importer = QuotationImporterImpl::new(quotations.clone(), masters.clone(), config.clone());

        Fixture {
            importer,
            quotations,
            masters,
            config,
        }
    }

    fn record(row: usize, number: Option<&str>, customer: Option<&str>) -> ImportRecord {
        ImportRecord {
            row_number: row,
            status: ImportStatus::Approved,
            data: MappedRecord {
                quotation_number: number.map(str::to_string),
                customer_name: customer.map(str::to_string),
                submission_date: NaiveDate::from_ymd_opt(2025, 10, 31),
                quantity: 3.0,
                price_per_unit: 45_900.0,
                transport_trips: 2.0,
                price_per_trip: 1_500.0,
                ..Default::default()
            },
            raw_data: RawCells::from_iter([
                ("เลขที่", CellValue::from(number.unwrap_or(""))),
                ("ชื่อลูกค้า", CellValue::from(customer.unwrap_or(""))),
            ]),
            issues: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_imports_approved_row_with_totals() {
        let f = fixture();
        let mut rec = record(2, Some("QT-001"), Some("Acme Co"));
        rec.data.car_name = Some("SAHO EV-01".to_string());
        rec.data.province_name = Some("เชียงใหม่".to_string());

        let result = f.importer.import_records(vec![rec], FileType::Thai).await.unwrap();
        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.imported[0].grand_total, 140_700.0);

        let stored = f.quotations.find_by_number("QT-001").await.unwrap().unwrap();
        assert_eq!(stored.totals.total_sales_price, Money::from_baht(137_700.0).unwrap());
        assert_eq!(stored.totals.total_transport_cost, Money::from_baht(3_000.0).unwrap());
        assert_eq!(stored.source, IMPORT_SOURCE);

        let car = f
            .masters
            .find_by_name(MasterDataKind::Car, "SAHO EV-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.car_id, Some(car.id));
        assert!(stored.province_id.is_some());
        assert!(stored.sale_member_id.is_none());
    }

    #[tokio::test]
    async fn test_blank_number_gets_auto_number() {
        let f = fixture();
        let result = f
            .importer
            .import_records(vec![record(5, None, Some("Acme Co"))], FileType::Thai)
            .await
            .unwrap();

        assert_eq!(result.success, 1);
        let number = &result.imported[0].quotation_number;
        assert!(number.starts_with("AUTO-"));
        assert!(number.ends_with("-5"));
        assert!(f.quotations.exists_by_number(number).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_customer_fails_row_only() {
        let f = fixture();
        let records = vec![
            record(2, Some("QT-001"), None),
            record(3, Some("QT-002"), Some("Beta Ltd")),
        ];
        let result = f.importer.import_records(records, FileType::Thai).await.unwrap();

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].row_number, 2);
        assert!(result.errors[0].error.contains("ชื่อลูกค้า"));
        assert!(!f.quotations.exists_by_number("QT-001").await.unwrap());
    }

    #[tokio::test]
    async fn test_existing_number_is_duplicate() {
        let f = fixture();
        f.importer
            .import_records(vec![record(2, Some("QT-001"), Some("Acme Co"))], FileType::Thai)
            .await
            .unwrap();

        let result = f
            .importer
            .import_records(vec![record(2, Some("QT-001"), Some("Other"))], FileType::Thai)
            .await
            .unwrap();
        assert_eq!(result.failed, 1);
        assert!(result.errors[0].error.contains("QT-001"));
        assert_eq!(f.quotations.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_batch_duplicates_warn_and_first_wins() {
        let f = fixture();
        let records = vec![
            record(2, Some("QT-009"), Some("First")),
            record(3, Some("QT-009"), Some("Second")),
        ];
        let result = f.importer.import_records(records, FileType::Thai).await.unwrap();

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("QT-009"));
        let stored = f.quotations.find_by_number("QT-009").await.unwrap().unwrap();
        assert_eq!(stored.customer_name, "First");
    }

    #[tokio::test]
    async fn test_rejected_and_empty_rows_skipped() {
        let f = fixture();
        let mut rejected = record(2, Some("QT-001"), Some("Acme Co"));
        rejected.status = ImportStatus::Rejected;
        let mut pending = record(3, Some("QT-002"), Some("Acme Co"));
        pending.status = ImportStatus::Pending;
        let mut empty = record(4, None, None);
        empty.raw_data = RawCells::from_iter([
            ("เลขที่", CellValue::Empty),
            ("จำนวน", CellValue::Number(0.0)),
        ]);

        let result = f
            .importer
            .import_records(vec![rejected, pending, empty], FileType::Thai)
            .await
            .unwrap();
        assert_eq!(result.skipped, 3);
        assert_eq!(result.success + result.failed, 0);
    }

    #[tokio::test]
    async fn test_error_snapshot_is_bounded() {
        let f = fixture();
        let mut rec = record(7, Some("QT-001"), None);
        rec.raw_data = (0..9)
            .map(|i| (format!("c{}", i), CellValue::Number(i as f64 + 1.0)))
            .collect();

        let result = f.importer.import_records(vec![rec], FileType::Thai).await.unwrap();
        assert_eq!(result.errors[0].data.len(), 5);
    }

    fn record_with_bad_date(row: usize) -> ImportRecord {
        let mut rec = record(row, Some("QT-100"), Some("Acme Co"));
        rec.data.submission_date = None;
        rec.issues.push(RecordIssue {
            field: "submissionDate".to_string(),
            value: "เร็วๆนี้".to_string(),
            message: "unreadable".to_string(),
        });
        rec
    }

    #[tokio::test]
    async fn test_unreadable_date_rejected_by_default() {
        let f = fixture();
        let result = f
            .importer
            .import_records(vec![record_with_bad_date(4)], FileType::Thai)
            .await
            .unwrap();
        assert_eq!(result.failed, 1);
        assert!(result.errors[0].error.contains("เร็วๆนี้"));
    }

    #[tokio::test]
    async fn test_unreadable_date_replaced_under_today_policy() {
        let f = fixture();
        f.config
            .set_global_config_value(config_keys::DATE_FALLBACK, "today")
            .unwrap();

        let result = f
            .importer
            .import_records(vec![record_with_bad_date(4)], FileType::Thai)
            .await
            .unwrap();
        assert_eq!(result.success, 1);
        assert_eq!(result.warnings.len(), 1);

        let stored = f.quotations.find_by_number("QT-100").await.unwrap().unwrap();
        assert_eq!(stored.submission_date, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_unknown_file_type_warns() {
        let f = fixture();
        let result = f
            .importer
            .import_records(vec![record(2, Some("QT-001"), Some("Acme Co"))], FileType::Unknown)
            .await
            .unwrap();
        assert_eq!(result.success, 1);
        assert!(result.warnings.iter().any(|w| w.contains("unknown")));
    }

    #[tokio::test]
    async fn test_out_of_range_amount_fails_row_and_batch_continues() {
        let f = fixture();
        let mut big = record(2, Some("QT-BIG"), Some("Acme Co"));
        big.data.quantity = 1000.0;
        big.data.price_per_unit = 99_999_999_999_999_999.0;
        let mut overflow = record(3, Some("QT-OVF"), Some("Acme Co"));
        overflow.data.quantity = 1_000_000.0;
        overflow.data.price_per_unit = 90_000_000_000_000.0;
        let ok = record(4, Some("QT-OK"), Some("Beta"));

        let result = f
            .importer
            .import_records(vec![big, overflow, ok], FileType::Thai)
            .await
            .unwrap();

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors[0].row_number, 2);
        assert!(result.errors[0].error.contains("pricePerUnit"));
        assert_eq!(result.errors[1].row_number, 3);
        assert!(result.errors[1].error.contains("grandTotal"));
        assert_eq!(result.imported[0].quotation_number, "QT-OK");
        assert!(f.quotations.find_by_number("QT-BIG").await.unwrap().is_none());
        assert!(f.quotations.find_by_number("QT-OVF").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rows_without_cells_or_with_text_zeros_skipped() {
        let f = fixture();
        let mut no_cells = record(2, Some("QT-001"), Some("Acme Co"));
        no_cells.raw_data = RawCells::default();
        let mut zeros = record(3, None, None);
        zeros.raw_data = RawCells::from_iter([
            ("เลขที่", CellValue::from("0")),
            ("จำนวน", CellValue::from("0")),
            ("ราคา", CellValue::from("0")),
        ]);

        let result = f
            .importer
            .import_records(vec![no_cells, zeros], FileType::Thai)
            .await
            .unwrap();
        assert_eq!(result.skipped, 2);
        assert_eq!(result.failed, 0);
    }

    #[derive(Default)]
    struct RecordingNotifier {
        failed_rows: Mutex<Vec<usize>>,
        completed: Mutex<Vec<(usize, usize, usize)>>,
    }

    impl ImportNotifier for RecordingNotifier {
        fn row_failed(&self, _batch_id: &str, row_number: usize, _message: &str) {
            self.failed_rows.lock().unwrap().push(row_number);
        }

        fn batch_completed(&self, _batch_id: &str, result: &ImportBatchResult) {
            self.completed
                .lock()
                .unwrap()
                .push((result.success, result.failed, result.skipped));
        }
    }

    #[tokio::test]
    async fn test_injected_notifier_receives_progress() {
        let f = fixture();
        let notifier = Arc::new(RecordingNotifier::default());
        let importer = f.importer.with_notifier(notifier.clone());

        let mut rejected = record(4, Some("QT-004"), Some("Acme Co"));
        rejected.status = ImportStatus::Rejected;
        let records = vec![
            record(2, Some("QT-001"), Some("Acme Co")),
            record(3, Some("QT-002"), None),
            rejected,
        ];
        importer.import_records(records, FileType::Thai).await.unwrap();

        assert_eq!(*notifier.failed_rows.lock().unwrap(), vec![3]);
        assert_eq!(*notifier.completed.lock().unwrap(), vec![(1, 1, 1)]);
    }
}
