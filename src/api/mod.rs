// ==========================================
// Quotation system - API layer
// ==========================================
// Business facades called by the HTTP handlers in app::routes
// ==========================================

pub mod error;
pub mod import_api;
pub mod master_data_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{
    ImportApi, ImportSelectedRequest, PdfParseResponse, PreviewResponse, SaveJobOrderResponse,
    SheetListResponse,
};
pub use master_data_api::{CreateMasterDataRequest, DeleteMasterDataResponse, MasterDataApi};
