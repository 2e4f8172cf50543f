// ==========================================
// Quotation system - job-order PDF extractor
// ==========================================
// Input: text layer of a job-order PDF (pdf-extract)
// Output: PdfExtraction, every field best-effort and independently nullable
// One FieldExtractor rule per field; no cross-field validation
// ==========================================

use crate::domain::PdfExtraction;
use crate::importer::data_cleaner::{make_date, parse_number_text};
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Colors recognized in job-order text
pub const COLOR_VOCABULARY: [&str; 14] = [
    "ขาว", "ดำ", "แดง", "น้ำเงิน", "เทา", "เงิน", "เขียว", "เหลือง", "ส้ม", "ชมพู", "ม่วง",
    "ฟ้า", "น้ำตาล", "ครีม",
];

/// Words that contain a color name without meaning the color
const COLOR_FALSE_FRIENDS: [&str; 3] = ["ไฟฟ้า", "ดำเนิน", "ท้องฟ้า"];

/// Optional equipment line items recognized in job-order text
pub const OPTION_VOCABULARY: [&str; 12] = [
    "หลังคา",
    "ตะกร้าหน้า",
    "ตะกร้าหลัง",
    "กระจกมองหลัง",
    "แบตเตอรี่สำรอง",
    "ที่ชาร์จ",
    "ผ้าคลุม",
    "กล่องท้าย",
    "เบาะเสริม",
    "ล้ออะไหล่",
    "จดทะเบียน",
    "ประกันภัย",
];

const ADDRESS_LABELS: [&str; 3] = ["ที่อยู่จัดส่ง", "สถานที่จัดส่ง", "ที่อยู่"];

/// Lines starting with one of these end an address block
const SECTION_LABELS: [&str; 20] = [
    "รุ่น", "Model", "จำนวน", "Qty", "สีรถ", "สี:", "สี :", "ราคา", "Gross", "Total", "Sub Total",
    "หมายเหตุ", "วันที่", "อุปกรณ์", "Option", "โทร", "เบอร์โทร", "Tel", "คุณ", "กำหนดส่ง",
];

const MAX_ADDRESS_LINES: usize = 4;

// ==========================================
// FieldExtractor Trait
// ==========================================
pub trait FieldExtractor: Send + Sync {
    type Output;

    /// Field name used in logs
    fn field(&self) -> &'static str;

    /// None when the text does not carry the field
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

// ==========================================
// Patterns
// ==========================================
fn job_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"SAHO\d+\s*-\s*\d+").expect("job number regex"))
}

fn slash_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("slash date regex"))
}

fn dot_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{2})\b").expect("dot date regex"))
}

fn customer_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"คุณ\s*([^(\r\n]+)").expect("customer regex"))
}

fn model_code_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:รุ่นรถ|รุ่น|Model)\s*[:：]?\s*([A-Z0-9][A-Z0-9\-]*)")
            .expect("model code regex")
    })
}

fn model_phrase_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"จักรยานไฟฟ้า[^\r\n]*").expect("model phrase regex"))
}

fn quantity_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:จำนวน|qty\.?)\s*[:：]?\s*(\d+)").expect("quantity regex")
    })
}

fn gross_total_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)gross\s*total\s*[:：]?\s*(?:฿|thb)?\s*([\d,]+(?:\.\d+)?)")
            .expect("gross total regex")
    })
}

fn pre_vat_total_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:total\s*before\s*vat|ราคาก่อนภาษี|sub\s*total)\s*[:：]?\s*(?:฿|thb)?\s*([\d,]+(?:\.\d+)?)",
        )
        .expect("pre-vat total regex")
    })
}

fn capture_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    re.captures_iter(text).find_map(|caps| {
        let day = caps[1].parse::<u32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        let year = caps[3].parse::<i32>().ok()?;
        make_date(year, month, day)
    })
}

// ==========================================
// Rules
// ==========================================

/// `SAHO68 - 168000095` -> `SAHO68-168000095`
pub struct JobNumberRule;

impl FieldExtractor for JobNumberRule {
    type Output = String;

    fn field(&self) -> &'static str {
        "quotationNumber"
    }

    fn extract(&self, text: &str) -> Option<String> {
        job_number_pattern()
            .find(text)
            .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
    }
}

/// First valid `DD/MM/YYYY`
pub struct SubmissionDateRule;

impl FieldExtractor for SubmissionDateRule {
    type Output = NaiveDate;

    fn field(&self) -> &'static str {
        "submissionDate"
    }

    fn extract(&self, text: &str) -> Option<NaiveDate> {
        capture_date(slash_date_pattern(), text)
    }
}

/// First valid `DD.MM.YY`, read as 20YY
pub struct DeliveryDateRule;

impl FieldExtractor for DeliveryDateRule {
    type Output = NaiveDate;

    fn field(&self) -> &'static str {
        "deliveryDate"
    }

    fn extract(&self, text: &str) -> Option<NaiveDate> {
        capture_date(dot_date_pattern(), text)
    }
}

pub struct CustomerNameRule;

impl FieldExtractor for CustomerNameRule {
    type Output = String;

    fn field(&self) -> &'static str {
        "customerName"
    }

    fn extract(&self, text: &str) -> Option<String> {
        customer_pattern().captures_iter(text).find_map(|caps| {
            let name = caps[1].trim();
            (!name.is_empty()).then(|| name.to_string())
        })
    }
}

/// Text after the first address label, continued on following lines
pub struct DeliveryAddressRule;

impl DeliveryAddressRule {
    fn starts_section(line: &str) -> bool {
        SECTION_LABELS.iter().any(|label| line.starts_with(label))
            || ADDRESS_LABELS.iter().any(|label| line.starts_with(label))
    }

    fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
        let idx = line.find(label)?;
        let rest = &line[idx + label.len()..];
        Some(rest.trim_start_matches([':', '：', ' ', '\t']).trim())
    }
}

impl FieldExtractor for DeliveryAddressRule {
    type Output = String;

    fn field(&self) -> &'static str {
        "deliveryAddress"
    }

    fn extract(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        // Labels are tried in priority order; the longer labels come first
        let (start, first) = ADDRESS_LABELS.iter().find_map(|label| {
            lines
                .iter()
                .enumerate()
                .find_map(|(i, line)| Self::strip_label(line, label).map(|rest| (i, rest)))
        })?;

        let mut parts: Vec<&str> = Vec::new();
        if !first.is_empty() {
            parts.push(first);
        }
        for line in lines.iter().skip(start + 1) {
            if parts.len() >= MAX_ADDRESS_LINES || line.is_empty() || Self::starts_section(line) {
                break;
            }
            parts.push(line);
        }

        (!parts.is_empty()).then(|| parts.join("\n"))
    }
}

/// Model code after `รุ่น`/`Model`, else an `จักรยานไฟฟ้า...` phrase
pub struct CarModelRule;

impl FieldExtractor for CarModelRule {
    type Output = String;

    fn field(&self) -> &'static str {
        "carModel"
    }

    fn extract(&self, text: &str) -> Option<String> {
        let code = model_code_pattern().captures_iter(text).find_map(|caps| {
            let token = caps[1].trim_end_matches('-');
            token
                .chars()
                .any(|c| c.is_ascii_digit())
                .then(|| token.to_string())
        });

        code.or_else(|| {
            model_phrase_pattern()
                .find(text)
                .map(|m| m.as_str().trim().to_string())
        })
    }
}

pub struct QuantityRule;

impl FieldExtractor for QuantityRule {
    type Output = i64;

    fn field(&self) -> &'static str {
        "quantity"
    }

    fn extract(&self, text: &str) -> Option<i64> {
        quantity_pattern()
            .captures_iter(text)
            .find_map(|caps| caps[1].parse::<i64>().ok())
    }
}

/// Up to `limit` colors in order of first appearance
pub struct ColorsRule {
    vocabulary: Vec<String>,
    limit: usize,
}

impl Default for ColorsRule {
    fn default() -> Self {
        Self::new(COLOR_VOCABULARY.iter().map(|c| c.to_string()).collect())
    }
}

impl ColorsRule {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self {
            vocabulary,
            limit: 2,
        }
    }

    /// Byte ranges already claimed by longer words
    fn masked_ranges(&self, text: &str, color: &str) -> Vec<(usize, usize)> {
        let longer = self
            .vocabulary
            .iter()
            .map(String::as_str)
            .filter(|other| other.len() > color.len() && other.contains(color))
            .chain(COLOR_FALSE_FRIENDS.iter().copied().filter(|w| w.contains(color)));

        longer
            .flat_map(|word| {
                text.match_indices(word)
                    .map(move |(i, m)| (i, i + m.len()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn first_position(&self, text: &str, color: &str) -> Option<usize> {
        let masked = self.masked_ranges(text, color);
        text.match_indices(color)
            .map(|(i, _)| i)
            .find(|&i| !masked.iter().any(|&(s, e)| i >= s && i + color.len() <= e))
    }
}

impl FieldExtractor for ColorsRule {
    type Output = Vec<String>;

    fn field(&self) -> &'static str {
        "colors"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let mut found: Vec<(usize, &str)> = self
            .vocabulary
            .iter()
            .filter_map(|c| self.first_position(text, c).map(|pos| (pos, c.as_str())))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        let colors: Vec<String> = found
            .into_iter()
            .take(self.limit)
            .map(|(_, c)| c.to_string())
            .collect();
        (!colors.is_empty()).then_some(colors)
    }
}

/// Known optional equipment, in order of first appearance
pub struct OptionsRule;

impl FieldExtractor for OptionsRule {
    type Output = Vec<String>;

    fn field(&self) -> &'static str {
        "options"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let mut found: Vec<(usize, &str)> = OPTION_VOCABULARY
            .iter()
            .filter_map(|item| text.find(item).map(|pos| (pos, *item)))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        let options: Vec<String> = found.into_iter().map(|(_, o)| o.to_string()).collect();
        (!options.is_empty()).then_some(options)
    }
}

/// Gross total, else the pre-VAT total
pub struct PriceRule;

impl FieldExtractor for PriceRule {
    type Output = f64;

    fn field(&self) -> &'static str {
        "price"
    }

    fn extract(&self, text: &str) -> Option<f64> {
        [gross_total_pattern(), pre_vat_total_pattern()]
            .into_iter()
            .find_map(|re| {
                re.captures_iter(text)
                    .find_map(|caps| parse_number_text(&caps[1]))
            })
    }
}

// ==========================================
// PdfExtractor
// ==========================================
pub struct PdfExtractor {
    job_number: Box<dyn FieldExtractor<Output = String>>,
    submission_date: Box<dyn FieldExtractor<Output = NaiveDate>>,
    delivery_date: Box<dyn FieldExtractor<Output = NaiveDate>>,
    customer_name: Box<dyn FieldExtractor<Output = String>>,
    delivery_address: Box<dyn FieldExtractor<Output = String>>,
    car_model: Box<dyn FieldExtractor<Output = String>>,
    quantity: Box<dyn FieldExtractor<Output = i64>>,
    colors: Box<dyn FieldExtractor<Output = Vec<String>>>,
    options: Box<dyn FieldExtractor<Output = Vec<String>>>,
    price: Box<dyn FieldExtractor<Output = f64>>,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self {
            job_number: Box::new(JobNumberRule),
            submission_date: Box::new(SubmissionDateRule),
            delivery_date: Box::new(DeliveryDateRule),
            customer_name: Box::new(CustomerNameRule),
            delivery_address: Box::new(DeliveryAddressRule),
            car_model: Box::new(CarModelRule),
            quantity: Box::new(QuantityRule),
            colors: Box::new(ColorsRule::default()),
            options: Box::new(OptionsRule),
            price: Box::new(PriceRule),
        }
    }
}

fn run<T>(rule: &dyn FieldExtractor<Output = T>, text: &str) -> Option<T> {
    let value = rule.extract(text);
    if value.is_none() {
        debug!(field = rule.field(), "field not found in pdf text");
    }
    value
}

impl PdfExtractor {
    /// Replaces the color rule (e.g. with the colors master list)
    pub fn with_colors(mut self, rule: ColorsRule) -> Self {
        self.colors = Box::new(rule);
        self
    }

    /// Runs every rule over the text
    pub fn extract_fields(&self, text: &str) -> PdfExtraction {
        PdfExtraction {
            quotation_number: run(self.job_number.as_ref(), text),
            submission_date: run(self.submission_date.as_ref(), text),
            delivery_date: run(self.delivery_date.as_ref(), text),
            customer_name: run(self.customer_name.as_ref(), text),
            delivery_address: run(self.delivery_address.as_ref(), text),
            car_model: run(self.car_model.as_ref(), text),
            quantity: run(self.quantity.as_ref(), text),
            colors: run(self.colors.as_ref(), text).unwrap_or_default(),
            options: run(self.options.as_ref(), text).unwrap_or_default(),
            price: run(self.price.as_ref(), text),
        }
    }
}

/// Text layer of a PDF
///
/// # Errors
/// - PdfParseError: not a PDF, encrypted, or no readable text
pub fn extract_text_from_pdf(bytes: &[u8]) -> ImportResult<String> {
    if bytes.is_empty() {
        return Err(ImportError::PdfParseError("ไฟล์ว่าง (empty file)".to_string()));
    }
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ImportError::PdfParseError(e.to_string()))
}
