// ==========================================
// Quotation system - import API
// ==========================================
// Spreadsheet: sheets -> preview -> import-selected
// PDF: parse -> (user edits) -> save job order
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::{
    FileType, ImportBatchResult, ImportRecord, ImportStatus, JobOrder, JobOrderDraft, Money,
    PdfExtraction,
};
use crate::i18n::{t, t_with_args};
use crate::importer::column_classifier::classify;
use crate::importer::{
    extract_text_from_pdf, FieldMapper, FieldMapperImpl, ImportError, PdfExtractor,
    QuotationImporter, UniversalFileParser, UploadedFile,
};
use crate::repository::{JobOrderRepository, RepositoryError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Job orders keep at most this many colors
const MAX_JOB_ORDER_COLORS: usize = 2;

// ==========================================
// Request / response DTOs
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetListResponse {
    pub file_name: String,
    pub sheets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub file_name: String,
    pub sheet_name: String,
    pub available_sheets: Vec<String>,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub file_type: FileType,
    pub records: Vec<ImportRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSelectedRequest {
    pub records: Vec<ImportRecord>,
    #[serde(default)]
    pub file_type: FileType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfParseResponse {
    pub success: bool,
    pub raw_text: String,
    pub extracted: PdfExtraction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobOrderResponse {
    pub success: bool,
    pub message: String,
    pub data: JobOrder,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    config: Arc<dyn ImportConfigReader>,
    importer: Arc<dyn QuotationImporter>,
    job_order_repo: Arc<dyn JobOrderRepository>,
    field_mapper: Box<dyn FieldMapper>,
    pdf_extractor: PdfExtractor,
}

impl ImportApi {
    pub fn new(
        config: Arc<dyn ImportConfigReader>,
        importer: Arc<dyn QuotationImporter>,
        job_order_repo: Arc<dyn JobOrderRepository>,
    ) -> Self {
        Self {
            config,
            importer,
            job_order_repo,
            field_mapper: Box::new(FieldMapperImpl::default()),
            pdf_extractor: PdfExtractor::default(),
        }
    }

    /// Replaces the PDF rules (e.g. colors taken from master data)
    pub fn with_pdf_extractor(mut self, pdf_extractor: PdfExtractor) -> Self {
        self.pdf_extractor = pdf_extractor;
        self
    }

    async fn file_parser(&self) -> ApiResult<UniversalFileParser> {
        let scan_rows = self.config.get_header_scan_rows().await.map_err(|e| {
            ApiError::from(ImportError::ConfigReadError {
                key: "import.header_scan_rows".to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(UniversalFileParser::new(scan_rows))
    }

    /// Sheet names of an uploaded workbook
    ///
    /// # Returns
    /// - CSV files report one sheet named after the file
    pub async fn list_sheets(&self, file: &UploadedFile) -> ApiResult<SheetListResponse> {
        let sheets = self.file_parser().await?.sheet_names(file)?;
        Ok(SheetListResponse {
            file_name: file.file_name.clone(),
            sheets,
        })
    }

    /// Detects the header, classifies the columns and maps every row
    ///
    /// # Arguments
    /// - file: uploaded spreadsheet
    /// - sheet_name: sheet to read; the first sheet when None
    ///
    /// # Returns
    /// - every record is `pending`, awaiting the user's decision
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn preview(
        &self,
        file: &UploadedFile,
        sheet_name: Option<&str>,
    ) -> ApiResult<PreviewResponse> {
        let start = Instant::now();
        let parser = self.file_parser().await?;
        let available_sheets = parser.sheet_names(file)?;
        let sheet = parser.parse_sheet(file, sheet_name)?;

        let file_type = classify(&sheet.columns);
        let records: Vec<ImportRecord> = sheet
            .rows
            .into_iter()
            .map(|row| {
                let (data, issues) = self.field_mapper.map_row(&row, file_type);
                ImportRecord {
                    row_number: row.row_number,
                    status: ImportStatus::Pending,
                    data,
                    raw_data: row.cells,
                    issues,
                }
            })
            .collect();

        info!(
            sheet_name = %sheet.sheet_name,
            header_index = sheet.header_index,
            file_type = %file_type,
            total_rows = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "preview built"
        );

        Ok(PreviewResponse {
            file_name: file.file_name.clone(),
            sheet_name: sheet.sheet_name,
            available_sheets,
            total_rows: records.len(),
            columns: sheet.columns,
            file_type,
            records,
        })
    }

    /// Imports the records the user approved
    pub async fn import_selected(
        &self,
        request: ImportSelectedRequest,
    ) -> ApiResult<ImportBatchResult> {
        let result = self
            .importer
            .import_records(request.records, request.file_type)
            .await?;
        Ok(result)
    }

    /// Extracts job-order fields from a PDF
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn parse_pdf(&self, file: &UploadedFile) -> ApiResult<PdfParseResponse> {
        let is_pdf = file.extension() == "pdf" || file.bytes.starts_with(b"%PDF");
        if !is_pdf {
            return Err(ImportError::UnsupportedFormat(file.file_name.clone()).into());
        }

        let raw_text = extract_text_from_pdf(&file.bytes)?;
        let extracted = self.pdf_extractor.extract_fields(&raw_text);
        info!(
            text_len = raw_text.len(),
            quotation_number = ?extracted.quotation_number,
            "pdf parsed"
        );

        Ok(PdfParseResponse {
            success: true,
            raw_text,
            extracted,
        })
    }

    /// Saves a user-confirmed job order
    ///
    /// # Errors
    /// - InvalidInput: job number missing, or price outside the storable range
    /// - BusinessRuleViolation: job number already saved
    pub async fn save_pdf_job_order(&self, draft: JobOrderDraft) -> ApiResult<SaveJobOrderResponse> {
        let job_number = draft
            .quotation_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::InvalidInput(t("api.job_number_required")))?
            .to_string();

        let exists_message = || t_with_args("api.job_order_exists", &[("number", &job_number)]);
        if self.job_order_repo.exists_by_job_number(&job_number).await? {
            return Err(ApiError::BusinessRuleViolation(exists_message()));
        }

        let price = draft
            .price
            .map(|baht| {
                Money::from_baht(baht)
                    .ok_or_else(|| ApiError::InvalidInput(format!("price out of range: {}", baht)))
            })
            .transpose()?;

        let mut job_order = JobOrder {
            id: None,
            job_number: job_number.clone(),
            customer_name: draft.customer_name.filter(|n| !n.trim().is_empty()),
            submission_date: draft.submission_date,
            delivery_date: draft.delivery_date,
            delivery_address: draft.delivery_address,
            car_model: draft.car_model,
            quantity: draft.quantity.filter(|q| *q > 0).unwrap_or(1),
            colors: draft.colors.into_iter().take(MAX_JOB_ORDER_COLORS).collect(),
            options: draft.options,
            price,
            remarks: draft.remarks,
            created_at: Utc::now(),
        };

        match self.job_order_repo.insert(&job_order).await {
            Ok(id) => job_order.id = Some(id),
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ApiError::BusinessRuleViolation(exists_message()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(job_number = %job_number, "job order saved");
        Ok(SaveJobOrderResponse {
            success: true,
            message: t_with_args("api.job_order_saved", &[("number", &job_number)]),
            data: job_order,
        })
    }
}
