// ==========================================
// Quotation system - tabular reader
// ==========================================
// Supports: Excel (.xlsx/.xlsm/.xls) / CSV (.csv), read from uploaded bytes
// Stage 0: sheet list; stage 1: sheet -> raw rows keyed by the header row
// ==========================================

use crate::domain::{CellValue, RawCells, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_detector::detect_header_row;
use crate::importer::importer_trait::TabularReader;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

// ==========================================
// UploadedFile - multipart payload
// ==========================================
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lower-cased extension without the dot
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string()
    }
}

// ==========================================
// ParsedSheet - rows keyed by the detected header
// ==========================================
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub sheet_name: String,
    /// 0-based index of the header inside the sheet grid
    pub header_index: usize,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Grid of cells plus the 1-based spreadsheet row number of its first row
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub first_row_number: usize,
    pub rows: Vec<Vec<CellValue>>,
}

// ==========================================
// Excel reader (calamine)
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn open(
        file: &UploadedFile,
    ) -> ImportResult<calamine::Sheets<Cursor<Vec<u8>>>> {
        open_workbook_auto_from_rs(Cursor::new(file.bytes.clone()))
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))
    }
}

fn data_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number; the date normalizer decodes it
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}

impl TabularReader for ExcelParser {
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        let workbook = Self::open(file)?;
        let names = workbook.sheet_names();
        if names.is_empty() {
            return Err(ImportError::EmptyWorkbook);
        }
        Ok(names)
    }

    fn read_grid(&self, file: &UploadedFile, sheet_name: &str) -> ImportResult<SheetGrid> {
        let mut workbook = Self::open(file)?;
        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let range = workbook.worksheet_range(sheet_name)?;
        // calamine trims leading empty rows; keep spreadsheet numbering
        let first_row_number = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
        let rows = range
            .rows()
            .map(|r| r.iter().map(data_to_cell).collect())
            .collect();

        Ok(SheetGrid {
            first_row_number,
            rows,
        })
    }
}

// ==========================================
// CSV reader
// ==========================================
// A CSV file is one sheet named after the file stem
pub struct CsvParser;

impl TabularReader for CsvParser {
    fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        Ok(vec![file.stem()])
    }

    fn read_grid(&self, file: &UploadedFile, sheet_name: &str) -> ImportResult<SheetGrid> {
        if sheet_name != file.stem() {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        // Strip a UTF-8 BOM; Excel writes one for Thai CSV exports
        let bytes = file
            .bytes
            .strip_prefix(&[0xEF, 0xBB, 0xBF])
            .unwrap_or(&file.bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        Ok(SheetGrid {
            first_row_number: 1,
            rows,
        })
    }
}

// ==========================================
// Universal reader (dispatch on extension)
// ==========================================
pub struct UniversalFileParser {
    scan_rows: usize,
}

impl UniversalFileParser {
    pub fn new(scan_rows: usize) -> Self {
        Self { scan_rows }
    }

    fn reader_for(&self, file: &UploadedFile) -> ImportResult<Box<dyn TabularReader>> {
        let ext = file.extension();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Box::new(ExcelParser)),
            "csv" => Ok(Box::new(CsvParser)),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                file.file_name.clone()
            } else {
                format!(".{}", ext)
            })),
        }
    }

    pub fn sheet_names(&self, file: &UploadedFile) -> ImportResult<Vec<String>> {
        self.reader_for(file)?.sheet_names(file)
    }

    /// Reads one sheet (first sheet when `sheet_name` is None)
    pub fn parse_sheet(
        &self,
        file: &UploadedFile,
        sheet_name: Option<&str>,
    ) -> ImportResult<ParsedSheet> {
        let reader = self.reader_for(file)?;
        let sheet_name = match sheet_name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.to_string(),
            None => reader
                .sheet_names(file)?
                .into_iter()
                .next()
                .ok_or(ImportError::EmptyWorkbook)?,
        };

        let grid = reader.read_grid(file, &sheet_name)?;
        rows_to_sheet(&sheet_name, grid, self.scan_rows)
    }
}

/// Builds header names: blanks get a positional name, repeats get a suffix
fn build_columns(header_row: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell
                .as_text()
                .unwrap_or_else(|| format!("Column {}", idx + 1));
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            if *n == 1 {
                base
            } else {
                format!("{} ({})", base, n)
            }
        })
        .collect()
}

/// Converts a sheet grid into raw rows keyed by the detected header
pub fn rows_to_sheet(sheet_name: &str, grid: SheetGrid, scan_rows: usize) -> ImportResult<ParsedSheet> {
    let header_index = detect_header_row(&grid.rows, scan_rows)?;
    let columns = build_columns(&grid.rows[header_index]);

    let rows = grid
        .rows
        .iter()
        .enumerate()
        .skip(header_index + 1)
        .map(|(idx, row)| {
            let cells: RawCells = columns
                .iter()
                .enumerate()
                .map(|(col, name)| (name.clone(), row.get(col).cloned().unwrap_or_default()))
                .collect();
            RawRow {
                row_number: grid.first_row_number + idx,
                cells,
            }
        })
        .collect();

    Ok(ParsedSheet {
        sheet_name: sheet_name.to_string(),
        header_index,
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("quotations.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_csv_single_sheet_named_after_stem() {
        let parser = UniversalFileParser::new(10);
        let sheets = parser.sheet_names(&csv_file("a,b\n1,2\n")).unwrap();
        assert_eq!(sheets, vec!["quotations".to_string()]);
    }

    #[test]
    fn test_csv_rows_keyed_by_detected_header() {
        let content = "รายงาน,,\n\
                       เลขที่ใบเสนอราคา,ชื่อลูกค้า,จำนวน/คัน\n\
                       QT-001,Acme Co,3\n";
        let parser = UniversalFileParser::new(10);
        let sheet = parser.parse_sheet(&csv_file(content), None).unwrap();

        assert_eq!(sheet.header_index, 1);
        assert_eq!(sheet.columns, vec!["เลขที่ใบเสนอราคา", "ชื่อลูกค้า", "จำนวน/คัน"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].row_number, 3);
        assert_eq!(
            sheet.rows[0].cells.get("ชื่อลูกค้า"),
            Some(&CellValue::Text("Acme Co".to_string()))
        );
    }

    #[test]
    fn test_csv_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("h1,h2\nx,y\n".as_bytes());
        let file = UploadedFile::new("a.csv", bytes);
        let sheet = UniversalFileParser::new(10).parse_sheet(&file, None).unwrap();
        assert_eq!(sheet.columns[0], "h1");
    }

    #[test]
    fn test_short_rows_padded_with_empty() {
        let sheet = UniversalFileParser::new(10)
            .parse_sheet(&csv_file("a,b,c\n1\n"), None)
            .unwrap();
        assert_eq!(sheet.rows[0].cells.len(), 3);
        assert_eq!(sheet.rows[0].cells.get("c"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_blank_and_duplicate_headers_named() {
        let cols = build_columns(&[
            CellValue::from("ราคา"),
            CellValue::Empty,
            CellValue::from("ราคา"),
        ]);
        assert_eq!(cols, vec!["ราคา", "Column 2", "ราคา (2)"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = UploadedFile::new("notes.txt", b"a,b".to_vec());
        let err = UniversalFileParser::new(10).sheet_names(&file).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref e) if e == ".txt"));
    }

    #[test]
    fn test_unknown_csv_sheet() {
        let err = UniversalFileParser::new(10)
            .parse_sheet(&csv_file("a,b\n"), Some("Sheet9"))
            .unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(_)));
    }

    #[test]
    fn test_corrupt_xlsx_reports_excel_error() {
        let file = UploadedFile::new("broken.xlsx", b"not a zip".to_vec());
        let err = UniversalFileParser::new(10).sheet_names(&file).unwrap_err();
        assert!(matches!(err, ImportError::ExcelParseError(_)));
    }

    #[test]
    fn test_grid_row_numbers_offset() {
        let grid = SheetGrid {
            first_row_number: 4,
            rows: vec![
                vec![CellValue::from("a"), CellValue::from("b")],
                vec![CellValue::from("1"), CellValue::from("2")],
            ],
        };
        let sheet = rows_to_sheet("S", grid, 10).unwrap();
        assert_eq!(sheet.rows[0].row_number, 5);
    }

    fn small_workbook() -> UploadedFile {
        use rust_xlsxwriter::{Format, Workbook};

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("cover").unwrap();
        let sheet = workbook.add_worksheet();
        sheet.set_name("data").unwrap();
        sheet.write_string(2, 0, "เลขที่").unwrap();
        sheet.write_string(2, 1, "วันที่").unwrap();
        sheet.write_string(3, 0, "QT-1").unwrap();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        sheet.write_number_with_format(3, 1, 45961.0, &date_format).unwrap();
        UploadedFile::new("book.xlsx", workbook.save_to_buffer().unwrap())
    }

    #[test]
    fn test_xlsx_sheet_names_in_workbook_order() {
        let names = ExcelParser.sheet_names(&small_workbook()).unwrap();
        assert_eq!(names, vec!["cover".to_string(), "data".to_string()]);
    }

    #[test]
    fn test_xlsx_grid_keeps_row_numbers_and_date_serials() {
        let grid = ExcelParser.read_grid(&small_workbook(), "data").unwrap();
        // Rows 1-2 are empty and trimmed by the reader
        assert_eq!(grid.first_row_number, 3);
        assert_eq!(grid.rows[1][1], CellValue::Number(45961.0));

        let sheet = rows_to_sheet("data", grid, 10).unwrap();
        assert_eq!(sheet.rows[0].row_number, 4);
        assert_eq!(sheet.rows[0].cells.get("วันที่"), Some(&CellValue::Number(45961.0)));
    }

    #[test]
    fn test_xlsx_unknown_sheet() {
        let err = ExcelParser.read_grid(&small_workbook(), "missing").unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(_)));
    }
}
