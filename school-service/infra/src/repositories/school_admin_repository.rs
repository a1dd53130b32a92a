//! PostgreSQL implementations of the school/user/class/student/device/
//! display-token repository traits (C2). Every query that is not the
//! tenant root itself carries `WHERE school_id = $tenant` — see
//! `school_service_core::repositories::school_admin_repository` for the
//! trait contracts this grounds.

use async_trait::async_trait;
use school_service_core::domains::school_admin::{
    Class, Device, DisplayToken, ParentStudentLink, School, Student, User,
};
use school_service_core::repositories::{
    ClassRepository, DeviceRepository, DisplayTokenRepository, ParentStudentLinkRepository,
    SchoolRepository, StudentRepository, UserRepository,
};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SchoolRepositoryImpl {
    pool: PgPool,
}

impl SchoolRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolRepository for SchoolRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    async fn update(&self, school: &School) -> Result<School, AppError> {
        let row = sqlx::query_as::<_, School>(
            r#"
            UPDATE schools
            SET name = $2, contact_email = $3, contact_phone = $4, timezone = $5,
                active = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(school.id)
        .bind(&school.name)
        .bind(&school.contact_email)
        .bind(&school.contact_phone)
        .bind(&school.timezone)
        .bind(school.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

pub struct UserRepositoryImpl {
    pool: PgPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id_platform_admin(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND school_id IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id_any(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, school_id, role, username, password_hash, must_reset_password, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(user.school_id)
        .bind(&user.role)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.must_reset_password)
        .bind(user.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, password_hash = $3, must_reset_password = $4, active = $5,
                last_login_at = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.role)
        .bind(&user.password_hash)
        .bind(user.must_reset_password)
        .bind(user.active)
        .bind(user.last_login_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, tenant_id: Uuid, role: Option<&str>) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE school_id = $1 AND ($2::text IS NULL OR role = $2)
            ORDER BY username
            "#,
        )
        .bind(tenant_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

pub struct ClassRepositoryImpl {
    pool: PgPool,
}

impl ClassRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for ClassRepositoryImpl {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Class>, AppError> {
        let rows = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE school_id = $1 ORDER BY academic_year DESC, name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, class: &Class) -> Result<Class, AppError> {
        let row = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (id, school_id, name, grade, academic_year, homeroom_teacher_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(class.id)
        .bind(class.school_id)
        .bind(&class.name)
        .bind(&class.grade)
        .bind(&class.academic_year)
        .bind(class.homeroom_teacher_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, class: &Class) -> Result<Class, AppError> {
        let row = sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET name = $3, grade = $4, academic_year = $5, homeroom_teacher_id = $6, updated_at = now()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(class.id)
        .bind(class.school_id)
        .bind(&class.name)
        .bind(&class.grade)
        .bind(&class.academic_year)
        .bind(class.homeroom_teacher_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM classes WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn exists_name_year(
        &self,
        tenant_id: Uuid,
        name: &str,
        academic_year: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM classes
                WHERE school_id = $1 AND name = $2 AND academic_year = $3
                AND ($4::uuid IS NULL OR id != $4)
            )
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(academic_year)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_homeroom_teacher(
        &self,
        tenant_id: Uuid,
        teacher_user_id: Uuid,
    ) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE school_id = $1 AND homeroom_teacher_id = $2",
        )
        .bind(tenant_id)
        .bind(teacher_user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }
}

pub struct StudentRepositoryImpl {
    pool: PgPool,
}

impl StudentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_by_rfid(&self, tenant_id: Uuid, rfid_code: &str) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE school_id = $1 AND rfid_code = $2 AND active",
        )
        .bind(tenant_id)
        .bind(rfid_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn list_by_class(&self, tenant_id: Uuid, class_id: Uuid) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE school_id = $1 AND class_id = $2 ORDER BY name",
        )
        .bind(tenant_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, student: &Student) -> Result<Student, AppError> {
        let row = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, school_id, class_id, nis, nisn, name, rfid_code, user_id, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(student.id)
        .bind(student.school_id)
        .bind(student.class_id)
        .bind(&student.nis)
        .bind(&student.nisn)
        .bind(&student.name)
        .bind(&student.rfid_code)
        .bind(student.user_id)
        .bind(student.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, student: &Student) -> Result<Student, AppError> {
        let row = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET class_id = $3, nis = $4, nisn = $5, name = $6, rfid_code = $7, user_id = $8, active = $9, updated_at = now()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(student.id)
        .bind(student.school_id)
        .bind(student.class_id)
        .bind(&student.nis)
        .bind(&student.nisn)
        .bind(&student.name)
        .bind(&student.rfid_code)
        .bind(student.user_id)
        .bind(student.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

pub struct ParentStudentLinkRepositoryImpl {
    pool: PgPool,
}

impl ParentStudentLinkRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParentStudentLinkRepository for ParentStudentLinkRepositoryImpl {
    async fn link(&self, link: &ParentStudentLink) -> Result<ParentStudentLink, AppError> {
        let row = sqlx::query_as::<_, ParentStudentLink>(
            r#"
            INSERT INTO parent_student_links (id, school_id, parent_user_id, student_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(link.id)
        .bind(link.school_id)
        .bind(link.parent_user_id)
        .bind(link.student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn unlink(&self, tenant_id: Uuid, parent_user_id: Uuid, student_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "DELETE FROM parent_student_links WHERE school_id = $1 AND parent_user_id = $2 AND student_id = $3",
        )
        .bind(tenant_id)
        .bind(parent_user_id)
        .bind(student_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn students_for_parent(&self, tenant_id: Uuid, parent_user_id: Uuid) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.* FROM students s
            JOIN parent_student_links l ON l.student_id = s.id
            WHERE l.school_id = $1 AND l.parent_user_id = $2
            ORDER BY s.name
            "#,
        )
        .bind(tenant_id)
        .bind(parent_user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn parents_for_student(&self, tenant_id: Uuid, student_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT parent_user_id FROM parent_student_links WHERE school_id = $1 AND student_id = $2",
        )
        .bind(tenant_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn is_linked(&self, tenant_id: Uuid, parent_user_id: Uuid, student_id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM parent_student_links
                WHERE school_id = $1 AND parent_user_id = $2 AND student_id = $3
            )
            "#,
        )
        .bind(tenant_id)
        .bind(parent_user_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

pub struct DeviceRepositoryImpl {
    pool: PgPool,
}

impl DeviceRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRepository for DeviceRepositoryImpl {
    async fn find_by_device_code(&self, device_code: &str) -> Result<Option<Device>, AppError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE device_code = $1")
            .bind(device_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(device)
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Device>, AppError> {
        let rows = sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE school_id = $1 ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, device: &Device) -> Result<Device, AppError> {
        let row = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (id, school_id, device_code, api_key_hash, name, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(device.id)
        .bind(device.school_id)
        .bind(&device.device_code)
        .bind(&device.api_key_hash)
        .bind(&device.name)
        .bind(device.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, device: &Device) -> Result<Device, AppError> {
        let row = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices
            SET api_key_hash = $3, name = $4, active = $5, updated_at = now()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(device.id)
        .bind(device.school_id)
        .bind(&device.api_key_hash)
        .bind(&device.name)
        .bind(device.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

pub struct DisplayTokenRepositoryImpl {
    pool: PgPool,
}

impl DisplayTokenRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DisplayTokenRepository for DisplayTokenRepositoryImpl {
    async fn find_by_secret_hash(&self, secret_hash: &str) -> Result<Option<DisplayToken>, AppError> {
        let token = sqlx::query_as::<_, DisplayToken>(
            "SELECT * FROM display_tokens WHERE secret_hash = $1",
        )
        .bind(secret_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<DisplayToken>, AppError> {
        let token = sqlx::query_as::<_, DisplayToken>(
            "SELECT * FROM display_tokens WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<DisplayToken>, AppError> {
        let rows = sqlx::query_as::<_, DisplayToken>(
            "SELECT * FROM display_tokens WHERE school_id = $1 ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, token: &DisplayToken) -> Result<DisplayToken, AppError> {
        let row = sqlx::query_as::<_, DisplayToken>(
            r#"
            INSERT INTO display_tokens (id, school_id, secret_hash, name, active, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(token.id)
        .bind(token.school_id)
        .bind(&token.secret_hash)
        .bind(&token.name)
        .bind(token.active)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, token: &DisplayToken) -> Result<DisplayToken, AppError> {
        let row = sqlx::query_as::<_, DisplayToken>(
            r#"
            UPDATE display_tokens
            SET secret_hash = $3, name = $4, active = $5, expires_at = $6
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(token.id)
        .bind(token.school_id)
        .bind(&token.secret_hash)
        .bind(&token.name)
        .bind(token.active)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn touch_last_accessed(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE display_tokens SET last_accessed_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
