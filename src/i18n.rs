// ==========================================
// Localization (rust-i18n)
// ==========================================
// Thai (default) and English
// Note: rust_i18n::i18n! is invoked in lib.rs
// ==========================================

use crate::config::app_config::SUPPORTED_LOCALES;

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switches the message language
///
/// # Arguments
/// - locale: "th" or "en"; anything else is ignored
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "unsupported locale ignored");
    }
}

/// Message without arguments
///
/// # Example
/// ```no_run
/// use saho_quotation::i18n::t;
/// let msg = t("api.missing_file");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Message with `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use saho_quotation::i18n::t_with_args;
/// let msg = t_with_args("api.job_order_saved", &[("number", "SAHO68-168000095")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Locale is process-global and tests run in parallel
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("fr");
        assert_eq!(current_locale(), "en");

        set_locale("th");
        assert_eq!(current_locale(), "th");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("th");
        assert_eq!(t("api.missing_file"), "ไม่พบไฟล์ที่อัปโหลด");

        set_locale("en");
        assert_eq!(t("api.missing_file"), "No uploaded file");

        set_locale("th");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("api.job_order_saved", &[("number", "SAHO68-168000095")]);
        assert!(msg.contains("SAHO68-168000095"));
        assert!(msg.contains("saved"));

        set_locale("th");
        let msg = t_with_args("api.job_order_saved", &[("number", "SAHO68-168000095")]);
        assert!(msg.contains("บันทึก"));
    }
}
