// ==========================================
// Quotation system - field mapper
// ==========================================
// Raw column names -> canonical quotation fields
// Per field: ordered alias list (Thai or English by sheet classification)
// Per alias: exact key -> trimmed case-insensitive key -> substring
// The first alias yielding a non-empty value wins
// ==========================================

use crate::domain::{CellValue, FileType, MappedRecord, RawCells, RawRow, RecordIssue};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::importer_trait::{FieldMapper as FieldMapperTrait, RecordNormalizer};

/// Aliases this short only match exactly (case-insensitively)
const MIN_SUBSTRING_ALIAS_CHARS: usize = 4;

// ==========================================
// CanonicalField - system field names
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    QuotationNumber,
    CustomerName,
    SubmissionDate,
    RequestDate,
    CustomerGroup,
    SaleMemberName,
    CustomerCode,
    CarName,
    AdditionalOptions,
    Quantity,
    PricePerUnit,
    ProvinceName,
    TransportTrips,
    PricePerTrip,
    PaymentTerms,
    ContactName,
    ContactPhone,
    ContactEmail,
}

impl CanonicalField {
    /// JSON field name
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::QuotationNumber => "quotationNumber",
            CanonicalField::CustomerName => "customerName",
            CanonicalField::SubmissionDate => "submissionDate",
            CanonicalField::RequestDate => "requestDate",
            CanonicalField::CustomerGroup => "customerGroup",
            CanonicalField::SaleMemberName => "saleMemberName",
            CanonicalField::CustomerCode => "customerCode",
            CanonicalField::CarName => "carName",
            CanonicalField::AdditionalOptions => "additionalOptions",
            CanonicalField::Quantity => "quantity",
            CanonicalField::PricePerUnit => "pricePerUnit",
            CanonicalField::ProvinceName => "provinceName",
            CanonicalField::TransportTrips => "transportTrips",
            CanonicalField::PricePerTrip => "pricePerTrip",
            CanonicalField::PaymentTerms => "paymentTerms",
            CanonicalField::ContactName => "contactName",
            CanonicalField::ContactPhone => "contactPhone",
            CanonicalField::ContactEmail => "contactEmail",
        }
    }

    /// Header aliases of Thai sheets, highest priority first
    pub fn thai_aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::QuotationNumber => {
                &["เลขที่ใบเสนอราคา", "เลขที่ QT", "เลขที่เอกสาร", "เลขที่"]
            }
            CanonicalField::CustomerName => &["ชื่อลูกค้า", "ชื่อ-นามสกุล", "ชื่อบริษัท", "ลูกค้า"],
            CanonicalField::SubmissionDate => {
                &["วันที่เสนอราคา", "วันที่ออกใบเสนอราคา", "วันที่ยื่น", "วันที่"]
            }
            CanonicalField::RequestDate => {
                &["วันที่ต้องการ", "วันที่ต้องการรถ", "วันที่ส่งมอบ", "กำหนดส่ง"]
            }
            CanonicalField::CustomerGroup => &["กลุ่มลูกค้า", "ประเภทลูกค้า"],
            CanonicalField::SaleMemberName => {
                &["พนักงานขาย", "ชื่อพนักงานขาย", "ผู้เสนอราคา", "เซลล์"]
            }
            CanonicalField::CustomerCode => &["รหัสลูกค้า"],
            CanonicalField::CarName => &["รุ่นรถ", "ชื่อรุ่น", "รุ่น", "รถ"],
            CanonicalField::AdditionalOptions => &["อุปกรณ์เสริม", "ออปชั่น", "ตัวเลือกเพิ่มเติม"],
            CanonicalField::Quantity => &["จำนวน/คัน", "จำนวน (คัน)", "จำนวนคัน", "จำนวน"],
            CanonicalField::PricePerUnit => &["ราคาต่อคัน", "ราคา/คัน", "ราคาต่อหน่วย", "ราคา"],
            CanonicalField::ProvinceName => &["จังหวัด", "จังหวัดที่ส่ง", "สถานที่ส่ง"],
            CanonicalField::TransportTrips => &["จำนวนเที่ยว", "เที่ยวขนส่ง", "เที่ยว"],
            CanonicalField::PricePerTrip => &["ค่าขนส่งต่อเที่ยว", "ราคาต่อเที่ยว", "ค่าขนส่ง"],
            CanonicalField::PaymentTerms => {
                &["เงื่อนไขการชำระเงิน", "เงื่อนไขการชำระ", "การชำระเงิน", "เครดิต"]
            }
            CanonicalField::ContactName => &["ชื่อผู้ติดต่อ", "ผู้ติดต่อ"],
            CanonicalField::ContactPhone => &["เบอร์โทร", "เบอร์โทรศัพท์", "โทรศัพท์", "เบอร์ติดต่อ"],
            CanonicalField::ContactEmail => &["อีเมล", "อีเมล์", "E-mail", "Email"],
        }
    }

    /// Header aliases of English sheets, highest priority first
    pub fn english_aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::QuotationNumber => &[
                "Quotation No.",
                "Quotation No",
                "Quotation Number",
                "QT No.",
                "JOB No.",
                "JOB No",
                "JOB",
            ],
            CanonicalField::CustomerName => &["Customer Name", "Customer", "Company Name", "Name"],
            CanonicalField::SubmissionDate => &["Submission Date", "Quotation Date", "Date"],
            CanonicalField::RequestDate => &["Request Date", "Required Date", "Delivery Date"],
            CanonicalField::CustomerGroup => &["Customer Group", "Group"],
            CanonicalField::SaleMemberName => {
                &["Sale Member", "Sales Name", "Salesperson", "Sales", "Sale"]
            }
            CanonicalField::CustomerCode => &["Customer Code", "Code"],
            CanonicalField::CarName => &["Car Model", "Model", "Car"],
            CanonicalField::AdditionalOptions => &["Additional Options", "Options", "Option"],
            CanonicalField::Quantity => &["Quantity", "Qty", "Units"],
            CanonicalField::PricePerUnit => &["Price Per Unit", "Unit Price", "Price"],
            CanonicalField::ProvinceName => &["Province", "Delivery Province"],
            CanonicalField::TransportTrips => &["Transport Trips", "Trips"],
            CanonicalField::PricePerTrip => &["Price Per Trip", "Transport Cost", "Shipping"],
            CanonicalField::PaymentTerms => &["Payment Terms", "Payment", "Terms"],
            CanonicalField::ContactName => &["Contact Name", "Contact Person", "Contact"],
            CanonicalField::ContactPhone => &["Contact Phone", "Phone", "Tel", "Mobile"],
            CanonicalField::ContactEmail => &["Contact Email", "Email", "E-mail"],
        }
    }

    /// Alias lists to try, in order, for a sheet classification
    pub fn alias_lists(&self, file_type: FileType) -> Vec<&'static [&'static str]> {
        match file_type {
            FileType::Thai => vec![self.thai_aliases()],
            FileType::English => vec![self.english_aliases()],
            FileType::Unknown => vec![self.thai_aliases(), self.english_aliases()],
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

fn first_non_blank<'a, F>(cells: &'a RawCells, matches: F) -> Option<&'a CellValue>
where
    F: Fn(&str) -> bool,
{
    cells
        .iter()
        .filter(|(key, value)| matches(key) && !value.is_blank())
        .map(|(_, value)| value)
        .next()
}

/// Value of the first alias that matches a non-empty cell
///
/// # Matching order per alias
/// 1. exact column name
/// 2. trimmed, case-insensitive column name
/// 3. substring either way (aliases of 4+ characters only)
pub fn find_value<'a>(cells: &'a RawCells, aliases: &[&str]) -> Option<&'a CellValue> {
    for alias in aliases {
        if let Some(value) = cells.get(alias).filter(|v| !v.is_blank()) {
            return Some(value);
        }

        let wanted = normalize_key(alias);
        if let Some(value) = first_non_blank(cells, |key| normalize_key(key) == wanted) {
            return Some(value);
        }

        if alias.trim().chars().count() >= MIN_SUBSTRING_ALIAS_CHARS {
            let found = first_non_blank(cells, |key| {
                let key = normalize_key(key);
                !key.is_empty() && (key.contains(&wanted) || wanted.contains(&key))
            });
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper {
    normalizer: Box<dyn RecordNormalizer>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(Box::new(DataCleaner))
    }
}

impl FieldMapper {
    pub fn new(normalizer: Box<dyn RecordNormalizer>) -> Self {
        Self { normalizer }
    }

    fn lookup<'a>(
        &self,
        cells: &'a RawCells,
        field: CanonicalField,
        file_type: FileType,
    ) -> Option<&'a CellValue> {
        field
            .alias_lists(file_type)
            .into_iter()
            .find_map(|aliases| find_value(cells, aliases))
    }

    fn text(&self, cells: &RawCells, field: CanonicalField, file_type: FileType) -> Option<String> {
        self.lookup(cells, field, file_type)
            .and_then(|v| self.normalizer.clean_text(v))
    }

    fn number(&self, cells: &RawCells, field: CanonicalField, file_type: FileType) -> f64 {
        self.lookup(cells, field, file_type)
            .map(|v| self.normalizer.parse_number(v))
            .unwrap_or(0.0)
    }

    fn date(
        &self,
        row: &RawRow,
        field: CanonicalField,
        file_type: FileType,
        issues: &mut Vec<RecordIssue>,
    ) -> Option<chrono::NaiveDate> {
        let cell = self.lookup(&row.cells, field, file_type)?;
        match self.normalizer.parse_date(cell) {
            Ok(date) => date,
            Err(value) => {
                let message = ImportError::InvalidDate {
                    row: row.row_number,
                    field: field.name().to_string(),
                    value: value.clone(),
                }
                .to_string();
                issues.push(RecordIssue {
                    field: field.name().to_string(),
                    value,
                    message,
                });
                None
            }
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_row(&self, row: &RawRow, file_type: FileType) -> (MappedRecord, Vec<RecordIssue>) {
        use CanonicalField as F;

        let cells = &row.cells;
        let mut issues = Vec::new();

        let record = MappedRecord {
            quotation_number: self.text(cells, F::QuotationNumber, file_type),
            customer_name: self.text(cells, F::CustomerName, file_type),
            submission_date: self.date(row, F::SubmissionDate, file_type, &mut issues),
            request_date: self.date(row, F::RequestDate, file_type, &mut issues),
            customer_group: self.text(cells, F::CustomerGroup, file_type),
            sale_member_name: self.text(cells, F::SaleMemberName, file_type),
            customer_code: self.text(cells, F::CustomerCode, file_type),
            car_name: self.text(cells, F::CarName, file_type),
            additional_options: self.text(cells, F::AdditionalOptions, file_type),
            quantity: self.number(cells, F::Quantity, file_type),
            price_per_unit: self.number(cells, F::PricePerUnit, file_type),
            province_name: self.text(cells, F::ProvinceName, file_type),
            transport_trips: self.number(cells, F::TransportTrips, file_type),
            price_per_trip: self.number(cells, F::PricePerTrip, file_type),
            payment_terms: self.text(cells, F::PaymentTerms, file_type),
            contact_name: self.text(cells, F::ContactName, file_type),
            contact_phone: self.text(cells, F::ContactPhone, file_type),
            contact_email: self.text(cells, F::ContactEmail, file_type),
        };

        (record, issues)
    }
}
