// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level comes from RUST_LOG, output shape from LOG_FORMAT
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global subscriber
///
/// # Environment
/// - RUST_LOG: filter directives (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=saho_quotation::importer=trace
/// - LOG_FORMAT: `json` for one JSON object per line, otherwise plain text
///
/// # Example
/// ```no_run
/// use saho_quotation::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    if json {
        builder.json().with_current_span(true).init();
    } else {
        builder.with_thread_ids(false).init();
    }
}

/// Subscriber for tests: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
