// ==========================================
// Quotation system - repository layer
// ==========================================
// Data access only, no business rules
// All queries are parameterized; table names come from static enum metadata
// ==========================================

pub mod error;
pub mod job_order_repo;
pub mod master_data_repo;
pub mod quotation_repo;
pub mod quotation_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use job_order_repo::{JobOrderRepository, JobOrderRepositoryImpl};
pub use master_data_repo::{MasterDataRepository, MasterDataRepositoryImpl};
pub use quotation_repo::QuotationRepository;
pub use quotation_repo_impl::QuotationRepositoryImpl;
