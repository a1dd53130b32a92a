use crate::domains::school_admin::{Class, Device, DisplayToken, ParentStudentLink, School, Student, User};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Tenant root itself; `id` doubles as the tenant id everywhere else in
/// this trait set, so no separate tenant argument is needed.
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AppError>;
    async fn update(&self, school: &School) -> Result<School, AppError>;
}

/// Every read/write here takes `tenant_id` explicitly; the query must
/// filter `WHERE school_id = tenant_id` (platform_admin is the only
/// role with a different, dedicated trait — see
/// `platform_admin_repository`).
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<User>, AppError>;
    /// Tenant-less lookup, reserved for resolving `platform_admin`'s own
    /// identity (`school_id IS NULL`) — never used to read another
    /// tenant's user out from under it.
    async fn find_by_id_platform_admin(&self, id: Uuid) -> Result<Option<User>, AppError>;
    /// Cross-tenant-by-id lookup, reserved for the authorization
    /// middleware's liveness check (C4): it only has a user id off the
    /// token's claims, not a tenant, and must work for every role
    /// including platform_admin.
    async fn find_by_id_any(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn list(&self, tenant_id: Uuid, role: Option<&str>) -> Result<Vec<User>, AppError>;
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Class>, AppError>;
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Class>, AppError>;
    async fn create(&self, class: &Class) -> Result<Class, AppError>;
    async fn update(&self, class: &Class) -> Result<Class, AppError>;
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError>;
    async fn exists_name_year(
        &self,
        tenant_id: Uuid,
        name: &str,
        academic_year: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError>;

    /// The class a homeroom_teacher is assigned to, if any (spec
    /// §4.3(c) row-level check — a teacher's writes/reads are scoped to
    /// this one class).
    async fn find_by_homeroom_teacher(
        &self,
        tenant_id: Uuid,
        teacher_user_id: Uuid,
    ) -> Result<Option<Class>, AppError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Student>, AppError>;
    async fn find_by_rfid(&self, tenant_id: Uuid, rfid_code: &str) -> Result<Option<Student>, AppError>;
    async fn list_by_class(&self, tenant_id: Uuid, class_id: Uuid) -> Result<Vec<Student>, AppError>;
    async fn create(&self, student: &Student) -> Result<Student, AppError>;
    async fn update(&self, student: &Student) -> Result<Student, AppError>;
}

#[async_trait]
pub trait ParentStudentLinkRepository: Send + Sync {
    async fn link(&self, link: &ParentStudentLink) -> Result<ParentStudentLink, AppError>;
    async fn unlink(&self, tenant_id: Uuid, parent_user_id: Uuid, student_id: Uuid) -> Result<(), AppError>;
    async fn students_for_parent(&self, tenant_id: Uuid, parent_user_id: Uuid) -> Result<Vec<Student>, AppError>;
    async fn parents_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Uuid>, AppError>;
    async fn is_linked(&self, tenant_id: Uuid, parent_user_id: Uuid, student_id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    async fn find_by_device_code(&self, device_code: &str) -> Result<Option<Device>, AppError>;
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Device>, AppError>;
    async fn create(&self, device: &Device) -> Result<Device, AppError>;
    async fn update(&self, device: &Device) -> Result<Device, AppError>;
}

#[async_trait]
pub trait DisplayTokenRepository: Send + Sync {
    async fn find_by_secret_hash(&self, secret_hash: &str) -> Result<Option<DisplayToken>, AppError>;
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<DisplayToken>, AppError>;
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<DisplayToken>, AppError>;
    async fn create(&self, token: &DisplayToken) -> Result<DisplayToken, AppError>;
    async fn update(&self, token: &DisplayToken) -> Result<DisplayToken, AppError>;
    async fn touch_last_accessed(&self, id: Uuid) -> Result<(), AppError>;
}
