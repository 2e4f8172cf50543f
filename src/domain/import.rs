// ==========================================
// Quotation system - import domain model
// ==========================================
// Raw rows (as read from the sheet), mapped records (canonical fields),
// import records (user-reviewed) and the batch result
// ==========================================

use crate::domain::types::ImportStatus;
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// CellValue - one spreadsheet cell
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Falsy in the spreadsheet sense: empty, "", 0, false
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Bool(b) => !b,
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Text(s) => is_falsy_text(s),
        }
    }

    /// Empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form, None when blank
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// CSV cells arrive as text; a bare zero or `false` reads like the typed cell
fn is_falsy_text(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case("false")
        || s.parse::<f64>().map(|n| n == 0.0).unwrap_or(false)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text().unwrap_or_default())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Whole numbers print without a trailing ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// RawCells - ordered column -> cell mapping
// ==========================================
// Serialized as a JSON object; column order survives the round trip
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCells(pub Vec<(String, CellValue)>);

impl RawCells {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.0.push((column.into(), value));
    }

    /// Exact column lookup
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, CellValue)> {
        self.0.iter()
    }

    pub fn columns(&self) -> Vec<String> {
        self.0.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every cell is falsy
    pub fn is_all_falsy(&self) -> bool {
        self.0.iter().all(|(_, v)| v.is_falsy())
    }

    /// First `n` columns, used for bounded error reports
    pub fn snapshot(&self, n: usize) -> RawCells {
        RawCells(self.0.iter().take(n).cloned().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawCells {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        RawCells(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for RawCells {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawCells {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawCellsVisitor;

        impl<'de> Visitor<'de> for RawCellsVisitor {
            type Value = RawCells;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawCells, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, CellValue>()? {
                    cells.push((k, v));
                }
                Ok(RawCells(cells))
            }
        }

        deserializer.deserialize_map(RawCellsVisitor)
    }
}

// ==========================================
// RawRow - one source row below the header
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    /// 1-based row number as shown by the spreadsheet
    pub row_number: usize,
    pub cells: RawCells,
}

// ==========================================
// MappedRecord - canonical quotation fields
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappedRecord {
    pub quotation_number: Option<String>,
    pub customer_name: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub request_date: Option<NaiveDate>,
    pub customer_group: Option<String>,
    pub sale_member_name: Option<String>,
    pub customer_code: Option<String>,
    pub car_name: Option<String>,
    pub additional_options: Option<String>,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub province_name: Option<String>,
    pub transport_trips: f64,
    pub price_per_trip: f64,
    pub payment_terms: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

// ==========================================
// ImportRecord - preview row awaiting a user decision
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub row_number: usize,
    #[serde(default)]
    pub status: ImportStatus,
    pub data: MappedRecord,
    #[serde(default)]
    pub raw_data: RawCells,
    /// Normalization problems found at preview (e.g. unreadable dates)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RecordIssue>,
}

/// A cell the normalizer could not read; `field` is the camelCase field name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIssue {
    pub field: String,
    pub value: String,
    pub message: String,
}

// ==========================================
// Batch result
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row_number: usize,
    /// First few raw columns only
    pub data: RawCells,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedSummary {
    pub row_number: usize,
    pub quotation_number: String,
    pub customer_name: String,
    pub grand_total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchResult {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
    pub imported: Vec<ImportedSummary>,
    pub warnings: Vec<String>,
}
