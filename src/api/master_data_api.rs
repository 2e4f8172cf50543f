// ==========================================
// Quotation system - master data API
// ==========================================
// Cars / sale members / provinces / colors lookup lists
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{MasterDataEntry, MasterDataKind};
use crate::i18n::{t, t_with_args};
use crate::repository::MasterDataRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMasterDataRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMasterDataResponse {
    pub success: bool,
    pub message: String,
}

pub struct MasterDataApi {
    repo: Arc<dyn MasterDataRepository>,
}

impl MasterDataApi {
    pub fn new(repo: Arc<dyn MasterDataRepository>) -> Self {
        Self { repo }
    }

    /// Path segment -> kind; unknown segments are 404
    pub fn parse_kind(slug: &str) -> ApiResult<MasterDataKind> {
        slug.parse::<MasterDataKind>().map_err(|kind| {
            ApiError::NotFound(t_with_args("api.unknown_master_kind", &[("kind", &kind)]))
        })
    }

    /// Entries ordered by name
    pub async fn list(&self, slug: &str) -> ApiResult<Vec<MasterDataEntry>> {
        let kind = Self::parse_kind(slug)?;
        Ok(self.repo.list(kind).await?)
    }

    /// Returns the existing entry when the exact name is already present
    pub async fn create(
        &self,
        slug: &str,
        request: CreateMasterDataRequest,
    ) -> ApiResult<MasterDataEntry> {
        let kind = Self::parse_kind(slug)?;
        Ok(self.repo.find_or_create(kind, &request.name).await?)
    }

    pub async fn delete(&self, slug: &str, id: i64) -> ApiResult<DeleteMasterDataResponse> {
        let kind = Self::parse_kind(slug)?;
        self.repo.delete(kind, id).await?;
        tracing::info!(kind = %kind, id, "master data deleted");
        Ok(DeleteMasterDataResponse {
            success: true,
            message: t("api.master_data_deleted"),
        })
    }
}
