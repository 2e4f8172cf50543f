// ==========================================
// Quotation system - record normalizer
// ==========================================
// Text: TRIM + blank -> None
// Numbers: strip thousands separators / currency mark, unreadable -> 0
// Dates: Excel serial or text, two-digit years -> 20YY,
//        Buddhist Era (year > 2500) -> Gregorian (- 543)
// ==========================================

use crate::domain::CellValue;
use crate::importer::importer_trait::RecordNormalizer;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Years above this are Buddhist Era
pub const BUDDHIST_ERA_THRESHOLD: i32 = 2500;
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub struct DataCleaner;

impl RecordNormalizer for DataCleaner {
    fn clean_text(&self, cell: &CellValue) -> Option<String> {
        cell.as_text()
    }

    fn parse_number(&self, cell: &CellValue) -> f64 {
        match cell {
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Text(s) => parse_number_text(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn parse_date(&self, cell: &CellValue) -> Result<Option<NaiveDate>, String> {
        match cell {
            CellValue::Empty => Ok(None),
            CellValue::Number(n) => excel_serial_to_date(*n)
                .map(Some)
                .ok_or_else(|| cell.to_string()),
            CellValue::Bool(b) => Err(b.to_string()),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                parse_date_text(trimmed)
                    .map(Some)
                    .ok_or_else(|| trimmed.to_string())
            }
        }
    }
}

fn number_prefix_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("number regex")
    })
}

/// Leading number after separators are removed; trailing text is ignored
///
/// "1,250,000.50", "฿ 3,000", "-12", "3 คัน", "45,900 บาท" -> f64
pub fn parse_number_text(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',' && *c != '฿').collect();
    number_prefix_pattern()
        .find(cleaned.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Two-digit years expand to 20YY, then Buddhist years are corrected
pub fn normalize_year(year: i32) -> i32 {
    let year = if (0..100).contains(&year) { 2000 + year } else { year };
    if year > BUDDHIST_ERA_THRESHOLD {
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

/// Builds a date with the year normalized; None on an impossible day/month
pub fn make_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(normalize_year(year), month, day)
}

/// Excel serial day number (epoch 1899-12-30); time of day is dropped
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::days(serial.floor() as i64))?;
    // A serial never lands in the Buddhist range, but a BE-typed date cell can
    if date.year() > BUDDHIST_ERA_THRESHOLD {
        NaiveDate::from_ymd_opt(date.year() - BUDDHIST_ERA_OFFSET, date.month(), date.day())
    } else {
        Some(date)
    }
}

fn iso_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 2025-10-31, 2025/10/31, optionally followed by a time part
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[T\s].*)?$").expect("iso date regex")
    })
}

fn dmy_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 31/10/2568, 31-10-2025, 31.10.68
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})(?:\s.*)?$").expect("dmy date regex")
    })
}

fn named_month_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 31 Oct 2025, 31 ต.ค. 2568, 31 ตุลาคม 68, 31-Oct-25
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[\s\-]+([^\s\d\-]+)[\s\-]+(\d{4}|\d{2})$")
            .expect("named month regex")
    })
}

fn serial_text_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // CSV exports of date cells carry the bare serial
    RE.get_or_init(|| Regex::new(r"^\d{1,5}(?:\.\d+)?$").expect("serial regex"))
}

const THAI_MONTHS: [(&str, &str); 12] = [
    ("ม.ค.", "มกราคม"),
    ("ก.พ.", "กุมภาพันธ์"),
    ("มี.ค.", "มีนาคม"),
    ("เม.ย.", "เมษายน"),
    ("พ.ค.", "พฤษภาคม"),
    ("มิ.ย.", "มิถุนายน"),
    ("ก.ค.", "กรกฎาคม"),
    ("ส.ค.", "สิงหาคม"),
    ("ก.ย.", "กันยายน"),
    ("ต.ค.", "ตุลาคม"),
    ("พ.ย.", "พฤศจิกายน"),
    ("ธ.ค.", "ธันวาคม"),
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month number from an English or Thai month name / abbreviation
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim();
    for (idx, (abbr, full)) in THAI_MONTHS.iter().enumerate() {
        if name == *abbr || name == *full || name == abbr.trim_end_matches('.') {
            return Some(idx as u32 + 1);
        }
    }

    let lower = name.trim_end_matches('.').to_lowercase();
    if lower.chars().count() < 3 {
        return None;
    }
    ENGLISH_MONTHS
        .iter()
        .position(|m| m.starts_with(&lower))
        .map(|idx| idx as u32 + 1)
}

/// Parses the text date layouts seen in quotation sheets
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(caps) = iso_pattern().captures(value) {
        return make_date(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
    }

    if let Some(caps) = dmy_pattern().captures(value) {
        return make_date(caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?);
    }

    if let Some(caps) = named_month_pattern().captures(value) {
        let month = month_from_name(&caps[2])?;
        return make_date(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }

    if serial_text_pattern().is_match(value) {
        return excel_serial_to_date(value.parse().ok()?);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_number_strips_separators() {
        let c = DataCleaner;
        assert_eq!(c.parse_number(&text("1,250,000.50")), 1_250_000.5);
        assert_eq!(c.parse_number(&text(" ฿ 3,000 ")), 3000.0);
        assert_eq!(c.parse_number(&CellValue::Number(42.0)), 42.0);
    }

    #[test]
    fn test_parse_number_ignores_trailing_unit() {
        let c = DataCleaner;
        assert_eq!(c.parse_number(&text("3 คัน")), 3.0);
        assert_eq!(c.parse_number(&text("45,900 บาท")), 45_900.0);
        assert_eq!(c.parse_number(&text("-12.5kg")), -12.5);
        assert_eq!(c.parse_number(&text(".5")), 0.5);
        assert_eq!(c.parse_number(&text("คัน 3")), 0.0);
    }

    #[test]
    fn test_parse_number_unreadable_is_zero() {
        let c = DataCleaner;
        assert_eq!(c.parse_number(&text("n/a")), 0.0);
        assert_eq!(c.parse_number(&CellValue::Empty), 0.0);
        assert_eq!(c.parse_number(&text("")), 0.0);
    }

    #[test]
    fn test_buddhist_year_corrected() {
        assert_eq!(parse_date_text("31/10/2568"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_date_text("2568-10-31"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_date_text("31/10/2025"), Some(ymd(2025, 10, 31)));
    }

    #[test]
    fn test_boundary_year_not_corrected() {
        assert_eq!(normalize_year(2500), 2500);
        assert_eq!(normalize_year(2501), 1958);
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date_text("31.10.25"), Some(ymd(2025, 10, 31)));
        assert_eq!(normalize_year(68), 2068);
    }

    #[test]
    fn test_text_layouts() {
        assert_eq!(parse_date_text("2025-01-05T00:00:00"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_date_text("2025/01/05"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_date_text("5-1-2025"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_date_text("5 Jan 2025"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_date_text("5 January 2025"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_date_text("31 ต.ค. 2568"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_date_text("1 มกราคม 2568"), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial_to_date(45961.0), Some(ymd(2025, 10, 31)));
        assert_eq!(excel_serial_to_date(45961.75), Some(ymd(2025, 10, 31)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(
            DataCleaner.parse_date(&CellValue::Number(45961.0)),
            Ok(Some(ymd(2025, 10, 31)))
        );
        assert_eq!(parse_date_text("45961"), Some(ymd(2025, 10, 31)));
    }

    #[test]
    fn test_parse_date_blank_and_invalid() {
        let c = DataCleaner;
        assert_eq!(c.parse_date(&CellValue::Empty), Ok(None));
        assert_eq!(c.parse_date(&text("   ")), Ok(None));
        assert_eq!(c.parse_date(&text("พรุ่งนี้")), Err("พรุ่งนี้".to_string()));
        assert_eq!(c.parse_date(&text("31/02/2025")), Err("31/02/2025".to_string()));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_from_name("Sept"), Some(9));
        assert_eq!(month_from_name("ธ.ค."), Some(12));
        assert_eq!(month_from_name("Ma"), None);
    }
}
