// ==========================================
// Quotation system - column classifier
// ==========================================
// Labels a sheet thai / english / unknown from its header names
// ==========================================

use crate::domain::FileType;

/// Thai keywords for dates, quantities, customer and document fields
pub const THAI_KEYWORDS: [&str; 6] = ["วันที่", "จำนวน", "ชื่อลูกค้า", "ลูกค้า", "เลขที่", "ราคา"];

/// English keywords (case-sensitive)
pub const ENGLISH_KEYWORDS: [&str; 3] = ["Status", "JOB", "Customer"];

fn any_contains(headers: &[String], keywords: &[&str]) -> bool {
    headers
        .iter()
        .any(|h| keywords.iter().any(|k| h.contains(k)))
}

/// Thai is checked first, English second
pub fn classify(headers: &[String]) -> FileType {
    let file_type = if any_contains(headers, &THAI_KEYWORDS) {
        FileType::Thai
    } else if any_contains(headers, &ENGLISH_KEYWORDS) {
        FileType::English
    } else {
        FileType::Unknown
    };

    tracing::debug!(%file_type, columns = headers.len(), "sheet classified");
    file_type
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_thai_headers() {
        let h = headers(&["เลขที่ใบเสนอราคา", "ชื่อลูกค้า", "จำนวน/คัน"]);
        assert_eq!(classify(&h), FileType::Thai);
    }

    #[test]
    fn test_thai_wins_over_english() {
        let h = headers(&["Customer", "วันที่เสนอ"]);
        assert_eq!(classify(&h), FileType::Thai);
    }

    #[test]
    fn test_english_headers() {
        let h = headers(&["JOB No.", "Customer Name", "Qty"]);
        assert_eq!(classify(&h), FileType::English);
    }

    #[test]
    fn test_english_keywords_case_sensitive() {
        let h = headers(&["customer", "status", "job"]);
        assert_eq!(classify(&h), FileType::Unknown);
    }

    #[test]
    fn test_unknown_headers() {
        assert_eq!(classify(&headers(&["a", "b"])), FileType::Unknown);
        assert_eq!(classify(&[]), FileType::Unknown);
    }
}
