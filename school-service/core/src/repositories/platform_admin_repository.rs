use crate::domains::school_admin::School;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// The only cross-tenant surface in the persistence gateway (spec
/// §4.4), used exclusively by platform_admin routes. Every other
/// repository trait in this crate takes `tenant_id` as an explicit,
/// mandatory argument; this one deliberately does not.
#[async_trait]
pub trait PlatformAdminRepository: Send + Sync {
    async fn list_schools(&self) -> Result<Vec<School>, AppError>;
    async fn create_school(&self, school: &School) -> Result<School, AppError>;
    async fn set_school_active(&self, id: Uuid, active: bool) -> Result<School, AppError>;
    /// Cascading tenant delete, in the order spec §4.4 specifies:
    /// notifications -> push registrations -> homeroom notes -> grades
    /// -> violations/achievements/permits/counseling notes ->
    /// attendances -> parent<->student links -> parents -> students ->
    /// classes -> devices -> settings -> users -> school. Implemented
    /// as a single transaction.
    async fn delete_school_cascade(&self, id: Uuid) -> Result<(), AppError>;
}
