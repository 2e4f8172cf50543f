// ==========================================
// Quotation system - HTTP routes (axum)
// ==========================================
// Thin handlers: extract -> API facade -> JSON
// Errors render as {"success": false, "message": "..."}
// ==========================================

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{
    ApiError, ApiResult, CreateMasterDataRequest, DeleteMasterDataResponse,
    ImportSelectedRequest, PdfParseResponse, PreviewResponse, SaveJobOrderResponse,
    SheetListResponse,
};
use crate::app::state::AppState;
use crate::config::ImportConfigReader;
use crate::domain::{ImportBatchResult, JobOrderDraft, MasterDataEntry};
use crate::i18n::{t, t_with_args};
use crate::importer::UploadedFile;

/// Multipart field carrying the upload
const UPLOAD_FIELD: &str = "file";

type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub sheet_name: Option<String>,
}

/// Builds the application router
///
/// # Arguments
/// - state: shared application state
/// - max_upload_mb: request body limit for uploads
pub fn build_router(state: SharedState, max_upload_mb: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // Spreadsheet import
        // ========================================
        .route("/import/sheets", post(list_sheets))
        .route("/import/preview", post(preview))
        .route("/import/import-selected", post(import_selected))
        // ========================================
        // Job-order PDF
        // ========================================
        .route("/import/pdf", post(parse_pdf))
        .route("/import/pdf/save", post(save_pdf_job_order))
        // ========================================
        // Master data
        // ========================================
        .route(
            "/master-data/:kind",
            get(list_master_data).post(create_master_data),
        )
        .route("/master-data/:kind/:id", delete(delete_master_data))
        .layer(DefaultBodyLimit::max(max_upload_mb.saturating_mul(1024 * 1024)))
        .layer(cors)
        .with_state(state)
}

// ==========================================
// Extraction helpers
// ==========================================

/// Reads the `file` field (or the first field carrying a file name)
async fn read_upload(mut multipart: Multipart, max_upload_mb: usize) -> ApiResult<UploadedFile> {
    let to_api_error = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::InvalidInput(t_with_args(
                "api.file_too_large",
                &[("limit", &max_upload_mb.to_string())],
            ))
        } else {
            ApiError::InvalidInput(e.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(to_api_error)? {
        let is_upload = field.name() == Some(UPLOAD_FIELD) || field.file_name().is_some();
        if !is_upload {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| UPLOAD_FIELD.to_string());
        let bytes = field.bytes().await.map_err(to_api_error)?;
        tracing::debug!(file_name = %file_name, size = bytes.len(), "upload received");
        return Ok(UploadedFile::new(file_name, bytes.to_vec()));
    }

    Err(ApiError::InvalidInput(t("api.missing_file")))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))
}

/// Upload limit in MB for error messages
async fn upload_limit(state: &AppState) -> usize {
    state.config.get_max_upload_mb().await.unwrap_or(20)
}

// ==========================================
// Import handlers
// ==========================================

/// POST /import/sheets
async fn list_sheets(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> ApiResult<Json<SheetListResponse>> {
    let file = read_upload(multipart, upload_limit(&state).await).await?;
    Ok(Json(state.import_api.list_sheets(&file).await?))
}

/// POST /import/preview?sheetName=
async fn preview(
    State(state): State<SharedState>,
    Query(query): Query<PreviewQuery>,
    multipart: Multipart,
) -> ApiResult<Json<PreviewResponse>> {
    let file = read_upload(multipart, upload_limit(&state).await).await?;
    let response = state
        .import_api
        .preview(&file, query.sheet_name.as_deref())
        .await?;
    Ok(Json(response))
}

/// POST /import/import-selected
async fn import_selected(
    State(state): State<SharedState>,
    payload: Result<Json<ImportSelectedRequest>, JsonRejection>,
) -> ApiResult<Json<ImportBatchResult>> {
    let request = json_body(payload)?;
    Ok(Json(state.import_api.import_selected(request).await?))
}

/// POST /import/pdf
async fn parse_pdf(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> ApiResult<Json<PdfParseResponse>> {
    let file = read_upload(multipart, upload_limit(&state).await).await?;
    Ok(Json(state.import_api.parse_pdf(&file).await?))
}

/// POST /import/pdf/save
async fn save_pdf_job_order(
    State(state): State<SharedState>,
    payload: Result<Json<JobOrderDraft>, JsonRejection>,
) -> ApiResult<Json<SaveJobOrderResponse>> {
    let draft = json_body(payload)?;
    Ok(Json(state.import_api.save_pdf_job_order(draft).await?))
}

// ==========================================
// Master data handlers
// ==========================================

/// GET /master-data/:kind
async fn list_master_data(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<MasterDataEntry>>> {
    Ok(Json(state.master_data_api.list(&kind).await?))
}

/// POST /master-data/:kind
async fn create_master_data(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    payload: Result<Json<CreateMasterDataRequest>, JsonRejection>,
) -> ApiResult<Json<MasterDataEntry>> {
    let request = json_body(payload)?;
    Ok(Json(state.master_data_api.create(&kind, request).await?))
}

/// DELETE /master-data/:kind/:id
async fn delete_master_data(
    State(state): State<SharedState>,
    Path((kind, id)): Path<(String, i64)>,
) -> ApiResult<Json<DeleteMasterDataResponse>> {
    Ok(Json(state.master_data_api.delete(&kind, id).await?))
}
