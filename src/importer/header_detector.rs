// ==========================================
// Quotation system - header row detector
// ==========================================
// Sheets often carry title rows above the real header; the header is the
// most populated row among the leading rows
// ==========================================

use crate::domain::CellValue;
use crate::importer::error::{ImportError, ImportResult};

/// Default number of leading rows inspected
pub const DEFAULT_SCAN_ROWS: usize = 10;

/// A row with this many filled cells ends the scan
const EARLY_STOP_CELLS: usize = 3;

/// Minimum filled cells for a row to count as a header
const MIN_HEADER_CELLS: usize = 2;

fn count_filled(row: &[CellValue]) -> usize {
    row.iter().filter(|c| !c.is_blank()).count()
}

/// Returns the 0-based index of the header row
///
/// Ties go to the first row seen. The scan stops at the first row holding
/// 3+ non-empty cells.
pub fn detect_header_row(rows: &[Vec<CellValue>], scan_rows: usize) -> ImportResult<usize> {
    let scan_rows = scan_rows.max(1);
    let mut best_index = 0usize;
    let mut best_count = 0usize;

    for (idx, row) in rows.iter().take(scan_rows).enumerate() {
        let count = count_filled(row);
        if count > best_count {
            best_count = count;
            best_index = idx;
        }
        if count >= EARLY_STOP_CELLS {
            break;
        }
    }

    if best_count < MIN_HEADER_CELLS {
        return Err(ImportError::HeaderNotFound {
            scanned: rows.len().min(scan_rows),
        });
    }

    tracing::debug!(header_row = best_index, filled = best_count, "header row detected");
    Ok(best_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    #[test]
    fn test_header_on_first_row() {
        let rows = vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])];
        assert_eq!(detect_header_row(&rows, 10).unwrap(), 0);
    }

    #[test]
    fn test_header_below_title_rows() {
        let rows = vec![
            row(&["รายงานใบเสนอราคา", "", ""]),
            row(&["", "", ""]),
            row(&["เลขที่ใบเสนอราคา", "ชื่อลูกค้า", "จำนวน/คัน"]),
            row(&["QT-001", "Acme Co", "3"]),
        ];
        assert_eq!(detect_header_row(&rows, 10).unwrap(), 2);
    }

    #[test]
    fn test_two_cell_header_tie_goes_to_first() {
        let rows = vec![row(&["", ""]), row(&["a", "b"]), row(&["x", "y"])];
        assert_eq!(detect_header_row(&rows, 10).unwrap(), 1);
    }

    #[test]
    fn test_whitespace_cells_not_counted() {
        let rows = vec![row(&["  ", "title", " "]), row(&["h1", "h2", ""])];
        assert_eq!(detect_header_row(&rows, 10).unwrap(), 1);
    }

    #[test]
    fn test_scan_limited_to_leading_rows() {
        let mut rows: Vec<Vec<CellValue>> = (0..10).map(|_| row(&["only", ""])).collect();
        rows.push(row(&["a", "b", "c", "d"]));
        let err = detect_header_row(&rows, 10).unwrap_err();
        assert!(matches!(err, ImportError::HeaderNotFound { scanned: 10 }));
    }

    #[test]
    fn test_header_not_found_on_empty_sheet() {
        let rows: Vec<Vec<CellValue>> = Vec::new();
        assert!(matches!(
            detect_header_row(&rows, 10),
            Err(ImportError::HeaderNotFound { .. })
        ));
    }
}
