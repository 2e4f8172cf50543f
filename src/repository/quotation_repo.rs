// ==========================================
// Quotation system - quotation repository trait
// ==========================================
// Data access only; duplicate policy lives in the import executor
// ==========================================

use crate::domain::Quotation;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// QuotationRepository Trait
// ==========================================
// Implementor: QuotationRepositoryImpl (rusqlite)
#[async_trait]
pub trait QuotationRepository: Send + Sync {
    /// Whether a quotation number is already stored
    async fn exists_by_number(&self, quotation_number: &str) -> RepositoryResult<bool>;

    /// Inserts a new quotation; never replaces an existing one
    ///
    /// # Returns
    /// - Ok(id): row id of the new quotation
    /// - Err(UniqueConstraintViolation): the number is taken
    async fn insert(&self, quotation: &Quotation) -> RepositoryResult<i64>;

    async fn find_by_number(&self, quotation_number: &str) -> RepositoryResult<Option<Quotation>>;

    async fn count(&self) -> RepositoryResult<i64>;
}
