// ==========================================
// Quotation system - master data model
// ==========================================
// Cars / sale members / provinces / colors, keyed by exact name
// ==========================================

use crate::domain::types::MasterDataKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataEntry {
    pub id: i64,
    pub kind: MasterDataKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Seed fixture file layout (seeds/master_data.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterDataSeed {
    pub cars: Vec<String>,
    pub sale_members: Vec<String>,
    pub provinces: Vec<String>,
    pub colors: Vec<String>,
}

impl MasterDataSeed {
    pub fn names(&self, kind: MasterDataKind) -> &[String] {
        match kind {
            MasterDataKind::Car => &self.cars,
            MasterDataKind::SaleMember => &self.sale_members,
            MasterDataKind::Province => &self.provinces,
            MasterDataKind::Color => &self.colors,
        }
    }
}
