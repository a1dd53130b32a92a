use crate::domains::records::{Achievement, CounselingNote, Grade, HomeroomNote, PermitDocument, Violation};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait GradeRepository: Send + Sync {
    async fn create(&self, grade: &Grade) -> Result<Grade, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Grade>, AppError>;
}

#[async_trait]
pub trait HomeroomNoteRepository: Send + Sync {
    async fn create(&self, note: &HomeroomNote) -> Result<HomeroomNote, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<HomeroomNote>, AppError>;
}

/// `internal_note` is read here in full; it is the authorization layer's
/// job (spec §4.3(b)), not the repository's, to strip it before it
/// reaches a non-counselor response.
#[async_trait]
pub trait CounselingNoteRepository: Send + Sync {
    async fn create(&self, note: &CounselingNote) -> Result<CounselingNote, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<CounselingNote>, AppError>;
}

#[async_trait]
pub trait PermitDocumentRepository: Send + Sync {
    async fn create(&self, permit: &PermitDocument) -> Result<PermitDocument, AppError>;
    async fn update(&self, permit: &PermitDocument) -> Result<PermitDocument, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<PermitDocument>, AppError>;
}

#[async_trait]
pub trait ViolationRepository: Send + Sync {
    async fn create(&self, violation: &Violation) -> Result<Violation, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Violation>, AppError>;
}

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    async fn create(&self, achievement: &Achievement) -> Result<Achievement, AppError>;
    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Achievement>, AppError>;
}
