// ==========================================
// Quotation system - application layer
// ==========================================
// axum router over the API facades
// ==========================================

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
