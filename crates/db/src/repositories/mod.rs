//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tenant-owned tables take
//! `company_id` as the second.

pub mod audit_repo;
pub mod company_repo;
pub mod evaluation_repo;
pub mod role_level_repo;
pub mod scorecard_repo;
pub mod template_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use company_repo::CompanyRepo;
pub use evaluation_repo::EvaluationRepo;
pub use role_level_repo::RoleLevelRepo;
pub use scorecard_repo::ScorecardRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
