// ==========================================
// Integration test helpers
// ==========================================
// Temporary database files, app state and upload builders
// ==========================================
#![allow(dead_code)]

use std::error::Error;
use std::sync::Arc;

use rusqlite::Connection;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use saho_quotation::app::AppState;
use saho_quotation::db::{init_database, open_sqlite_connection};
use saho_quotation::domain::{ImportRecord, ImportStatus};
use saho_quotation::importer::UploadedFile;
use tempfile::NamedTempFile;

pub const BOUNDARY: &str = "saho-test-boundary";

/// Creates a temporary database with schema, default settings and seeds
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - String: database file path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not utf-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_database(&conn)?;

    Ok((temp_file, db_path))
}

/// App state over a fresh temporary database
pub fn create_test_state() -> Result<(NamedTempFile, Arc<AppState>), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::new(db_path)?;
    Ok((temp_file, Arc::new(state)))
}

/// Second connection for assertions made straight against the tables
pub fn open_db(db_path: &str) -> Connection {
    open_sqlite_connection(db_path).expect("open test db")
}

pub fn csv_upload(file_name: &str, content: &str) -> UploadedFile {
    UploadedFile::new(file_name, content.as_bytes().to_vec())
}

/// Thai quotation sheet: title row, header, two good rows,
/// one row without customer, one empty row
pub fn thai_quotation_csv() -> String {
    [
        "รายงานใบเสนอราคา ประจำเดือนตุลาคม,,,,,,,,",
        "เลขที่ใบเสนอราคา,ชื่อลูกค้า,วันที่เสนอราคา,รุ่นรถ,จำนวน/คัน,ราคาต่อคัน,จังหวัด,จำนวนเที่ยว,ค่าขนส่งต่อเที่ยว",
        "QT-001,Acme Co,31/10/2568,SAHO EV-01,3,\"45,900\",เชียงใหม่,2,1500",
        ",Beta Ltd,01/11/2025,SAHO EV-01,1,45900,ลำปาง,1,800",
        "QT-003,,02/11/2025,SAHO EV-02,2,39900,,,",
        ",,,,,,,,",
    ]
    .join("\n")
}

/// Excel serials of the date cells in `quotation_workbook`
pub const SERIAL_2025_10_31: f64 = 45961.0;
pub const SERIAL_BE_2568_11_02: f64 = 244290.0;

/// Two-sheet workbook: a summary sheet first, then the quotation sheet
///
/// The quotation sheet leaves row 1 empty, has a title on row 2, the header
/// on row 3 and data on rows 4-5; submission dates are date-formatted cells,
/// the second one typed with a Buddhist Era year
pub fn quotation_workbook() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    let summary = workbook.add_worksheet();
    summary.set_name("summary")?;
    summary.write_string(0, 0, "สรุปยอดประจำเดือน")?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("october")?;
    sheet.write_string(1, 0, "รายงานใบเสนอราคา ประจำเดือนตุลาคม")?;
    let headers = ["เลขที่ใบเสนอราคา", "ชื่อลูกค้า", "วันที่เสนอราคา", "จำนวน/คัน", "ราคาต่อคัน"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(2, col as u16, *header)?;
    }

    sheet.write_string(3, 0, "QT-X1")?;
    sheet.write_string(3, 1, "Acme Co")?;
    sheet.write_number_with_format(3, 2, SERIAL_2025_10_31, &date_format)?;
    sheet.write_number(3, 3, 3)?;
    sheet.write_number(3, 4, 45900)?;

    sheet.write_string(4, 0, "QT-X2")?;
    sheet.write_string(4, 1, "Beta Ltd")?;
    sheet.write_number_with_format(4, 2, SERIAL_BE_2568_11_02, &date_format)?;
    sheet.write_number(4, 3, 1)?;
    sheet.write_number(4, 4, 39900.5)?;

    workbook.save_to_buffer()
}

/// Marks every record approved
pub fn approve_all(records: Vec<ImportRecord>) -> Vec<ImportRecord> {
    records
        .into_iter()
        .map(|mut r| {
            r.status = ImportStatus::Approved;
            r
        })
        .collect()
}

/// multipart/form-data body with a single `file` field
pub fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
