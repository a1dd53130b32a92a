use async_trait::async_trait;
use school_service_core::domains::records::{
    Achievement, CounselingNote, Grade, HomeroomNote, PermitDocument, Violation,
};
use school_service_core::repositories::{
    AchievementRepository, CounselingNoteRepository, GradeRepository, HomeroomNoteRepository,
    PermitDocumentRepository, ViolationRepository,
};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct GradeRepositoryImpl {
    pool: PgPool,
}

impl GradeRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GradeRepository for GradeRepositoryImpl {
    async fn create(&self, grade: &Grade) -> Result<Grade, AppError> {
        let row = sqlx::query_as::<_, Grade>(
            r#"
            INSERT INTO grades (id, school_id, student_id, created_by_user_id, subject, term, score, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(grade.id)
        .bind(grade.school_id)
        .bind(grade.student_id)
        .bind(grade.created_by_user_id)
        .bind(&grade.subject)
        .bind(&grade.term)
        .bind(grade.score)
        .bind(&grade.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Grade>, AppError> {
        let rows = sqlx::query_as::<_, Grade>(
            "SELECT * FROM grades WHERE school_id = $1 AND student_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct HomeroomNoteRepositoryImpl {
    pool: PgPool,
}

impl HomeroomNoteRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HomeroomNoteRepository for HomeroomNoteRepositoryImpl {
    async fn create(&self, note: &HomeroomNote) -> Result<HomeroomNote, AppError> {
        let row = sqlx::query_as::<_, HomeroomNote>(
            r#"
            INSERT INTO homeroom_notes (id, school_id, student_id, created_by_user_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(note.id)
        .bind(note.school_id)
        .bind(note.student_id)
        .bind(note.created_by_user_id)
        .bind(&note.body)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<HomeroomNote>, AppError> {
        let rows = sqlx::query_as::<_, HomeroomNote>(
            "SELECT * FROM homeroom_notes WHERE school_id = $1 AND student_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct CounselingNoteRepositoryImpl {
    pool: PgPool,
}

impl CounselingNoteRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounselingNoteRepository for CounselingNoteRepositoryImpl {
    async fn create(&self, note: &CounselingNote) -> Result<CounselingNote, AppError> {
        let row = sqlx::query_as::<_, CounselingNote>(
            r#"
            INSERT INTO counseling_notes (id, school_id, student_id, created_by_user_id, internal_note, parent_summary)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(note.id)
        .bind(note.school_id)
        .bind(note.student_id)
        .bind(note.created_by_user_id)
        .bind(&note.internal_note)
        .bind(&note.parent_summary)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<CounselingNote>, AppError> {
        let rows = sqlx::query_as::<_, CounselingNote>(
            "SELECT * FROM counseling_notes WHERE school_id = $1 AND student_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct PermitDocumentRepositoryImpl {
    pool: PgPool,
}

impl PermitDocumentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermitDocumentRepository for PermitDocumentRepositoryImpl {
    async fn create(&self, permit: &PermitDocument) -> Result<PermitDocument, AppError> {
        let row = sqlx::query_as::<_, PermitDocument>(
            r#"
            INSERT INTO permit_documents (id, school_id, student_id, created_by_user_id, reason, permit_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(permit.id)
        .bind(permit.school_id)
        .bind(permit.student_id)
        .bind(permit.created_by_user_id)
        .bind(&permit.reason)
        .bind(permit.permit_date)
        .bind(permit.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, permit: &PermitDocument) -> Result<PermitDocument, AppError> {
        let row = sqlx::query_as::<_, PermitDocument>(
            "UPDATE permit_documents SET status = $3 WHERE id = $1 AND school_id = $2 RETURNING *",
        )
        .bind(permit.id)
        .bind(permit.school_id)
        .bind(permit.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<PermitDocument>, AppError> {
        let rows = sqlx::query_as::<_, PermitDocument>(
            "SELECT * FROM permit_documents WHERE school_id = $1 AND student_id = $2 ORDER BY permit_date DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct ViolationRepositoryImpl {
    pool: PgPool,
}

impl ViolationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViolationRepository for ViolationRepositoryImpl {
    async fn create(&self, violation: &Violation) -> Result<Violation, AppError> {
        let row = sqlx::query_as::<_, Violation>(
            r#"
            INSERT INTO violations (id, school_id, student_id, created_by_user_id, category, description, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(violation.id)
        .bind(violation.school_id)
        .bind(violation.student_id)
        .bind(violation.created_by_user_id)
        .bind(&violation.category)
        .bind(&violation.description)
        .bind(violation.points)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Violation>, AppError> {
        let rows = sqlx::query_as::<_, Violation>(
            "SELECT * FROM violations WHERE school_id = $1 AND student_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct AchievementRepositoryImpl {
    pool: PgPool,
}

impl AchievementRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AchievementRepository for AchievementRepositoryImpl {
    async fn create(&self, achievement: &Achievement) -> Result<Achievement, AppError> {
        let row = sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (id, school_id, student_id, created_by_user_id, title, description, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(achievement.id)
        .bind(achievement.school_id)
        .bind(achievement.student_id)
        .bind(achievement.created_by_user_id)
        .bind(&achievement.title)
        .bind(&achievement.description)
        .bind(achievement.points)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Achievement>, AppError> {
        let rows = sqlx::query_as::<_, Achievement>(
            "SELECT * FROM achievements WHERE school_id = $1 AND student_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
