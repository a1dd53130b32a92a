use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// CSPRNG-backed capability tokens for unattended public displays (C7).
/// The secret is only ever returned by `create`/`regenerate`; everything
/// else works off the hash.
#[async_trait]
pub trait DisplayTokenService: Send + Sync {
    /// Returns `(id, secret)`; `secret` is shown exactly once.
    async fn create(&self, tenant_id: Uuid, name: &str) -> Result<(Uuid, String), AppError>;
    async fn regenerate(&self, tenant_id: Uuid, id: Uuid) -> Result<String, AppError>;
    async fn revoke(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError>;
    /// Validates a bearer secret presented by a display client and
    /// returns the tenant it grants access to.
    async fn authenticate(&self, secret: &str) -> Result<Uuid, AppError>;
}
