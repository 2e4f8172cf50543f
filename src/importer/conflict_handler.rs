// ==========================================
// Quotation system - conflict handler
// ==========================================
// Detects quotation numbers repeated inside one import batch
// Cross-batch duplicates are checked row by row against the repository
// ==========================================

use crate::domain::{ImportRecord, ImportStatus};
use crate::importer::importer_trait::DuplicateDetector;
use std::collections::HashMap;

pub struct ConflictHandler;

impl DuplicateDetector for ConflictHandler {
    /// Approved records sharing a quotation number
    ///
    /// # Returns
    /// - (quotation number, row numbers) in first-appearance order; each
    ///   entry lists two or more rows
    fn find_batch_duplicates(&self, records: &[ImportRecord]) -> Vec<(String, Vec<usize>)> {
        let mut order: Vec<String> = Vec::new();
        let mut rows_by_number: HashMap<String, Vec<usize>> = HashMap::new();

        for record in records.iter().filter(|r| r.status == ImportStatus::Approved) {
            let Some(number) = record
                .data
                .quotation_number
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            else {
                continue;
            };

            let rows = rows_by_number.entry(number.to_string()).or_insert_with(|| {
                order.push(number.to_string());
                Vec::new()
            });
            rows.push(record.row_number);
        }

        order
            .into_iter()
            .filter_map(|number| {
                let rows = rows_by_number.remove(&number)?;
                (rows.len() > 1).then_some((number, rows))
            })
            .collect()
    }
}

impl ConflictHandler {
    /// Warning text for one duplicate group
    pub fn warning_for(number: &str, rows: &[usize]) -> String {
        let rows = rows
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "เลขที่ใบเสนอราคา {} ซ้ำกันในไฟล์ (แถว {}); นำเข้าได้เฉพาะแถวแรก",
            number, rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MappedRecord;

    fn record(row: usize, number: Option<&str>, status: ImportStatus) -> ImportRecord {
        ImportRecord {
            row_number: row,
            status,
            data: MappedRecord {
                quotation_number: number.map(String::from),
                ..Default::default()
            },
            raw_data: Default::default(),
            issues: Vec::new(),
        }
    }

    #[test]
    fn test_detects_repeated_numbers() {
        let records = vec![
            record(2, Some("QT-1"), ImportStatus::Approved),
            record(3, Some("QT-2"), ImportStatus::Approved),
            record(4, Some("QT-1"), ImportStatus::Approved),
            record(5, Some(" QT-1 "), ImportStatus::Approved),
        ];
        let dups = ConflictHandler.find_batch_duplicates(&records);
        assert_eq!(dups, vec![("QT-1".to_string(), vec![2, 4, 5])]);
    }

    #[test]
    fn test_ignores_unapproved_and_blank() {
        let records = vec![
            record(2, Some("QT-1"), ImportStatus::Approved),
            record(3, Some("QT-1"), ImportStatus::Rejected),
            record(4, None, ImportStatus::Approved),
            record(5, None, ImportStatus::Approved),
        ];
        assert!(ConflictHandler.find_batch_duplicates(&records).is_empty());
    }

    #[test]
    fn test_warning_lists_rows() {
        let msg = ConflictHandler::warning_for("QT-1", &[2, 4]);
        assert!(msg.contains("QT-1"));
        assert!(msg.contains("2, 4"));
    }
}
