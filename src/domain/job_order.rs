// ==========================================
// Quotation system - job order domain model
// ==========================================
// PdfExtraction: best-effort fields lifted from a job-order PDF
// JobOrderDraft: user-confirmed payload posted back for saving
// JobOrder: persisted row
// ==========================================

use crate::domain::quotation::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Every field is independently nullable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfExtraction {
    pub quotation_number: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub delivery_address: Option<String>,
    pub car_model: Option<String>,
    pub quantity: Option<i64>,
    pub colors: Vec<String>,
    pub options: Vec<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobOrderDraft {
    #[serde(alias = "jobNumber")]
    pub quotation_number: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub delivery_address: Option<String>,
    pub car_model: Option<String>,
    pub quantity: Option<i64>,
    pub colors: Vec<String>,
    pub options: Vec<String>,
    pub price: Option<f64>,
    pub remarks: Option<String>,
}

impl From<PdfExtraction> for JobOrderDraft {
    fn from(e: PdfExtraction) -> Self {
        Self {
            quotation_number: e.quotation_number,
            submission_date: e.submission_date,
            delivery_date: e.delivery_date,
            customer_name: e.customer_name,
            delivery_address: e.delivery_address,
            car_model: e.car_model,
            quantity: e.quantity,
            colors: e.colors,
            options: e.options,
            price: e.price,
            remarks: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrder {
    pub id: Option<i64>,
    pub job_number: String,
    pub customer_name: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub car_model: Option<String>,
    pub quantity: i64,
    pub colors: Vec<String>,
    pub options: Vec<String>,
    pub price: Option<Money>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}
