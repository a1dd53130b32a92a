//! JWT issuance and verification for the auth & token service (C3).
//!
//! Two signed bearer tokens per login: access (short TTL) and refresh
//! (long TTL). Both carry the same claim shape but a different
//! `token_type`, and callers must assert which type they expect —
//! presenting an access token where a refresh token is required (or vice
//! versa) is always `AppError::InvalidToken`, never silently accepted.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_error::AppError;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: user id.
    pub sub: Uuid,

    /// Tenant (school) id. `None` only for platform_admin.
    pub tenant_id: Option<Uuid>,

    pub role: String,
    pub username: String,
    pub token_type: TokenType,
    pub iss: String,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Expiry, Unix seconds.
    pub exp: i64,
}

const ISSUER: &str = "school-service";

impl Claims {
    fn new(
        user_id: Uuid,
        tenant_id: Option<Uuid>,
        role: String,
        username: String,
        token_type: TokenType,
        expiration_seconds: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            tenant_id,
            role,
            username,
            token_type,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + expiration_seconds,
        }
    }

    pub fn new_access(
        user_id: Uuid,
        tenant_id: Option<Uuid>,
        role: String,
        username: String,
        expiration_seconds: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self::new(
            user_id,
            tenant_id,
            role,
            username,
            TokenType::Access,
            expiration_seconds,
            now,
        )
    }

    pub fn new_refresh(
        user_id: Uuid,
        tenant_id: Option<Uuid>,
        role: String,
        username: String,
        expiration_seconds: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self::new(
            user_id,
            tenant_id,
            role,
            username,
            TokenType::Refresh,
            expiration_seconds,
            now,
        )
    }
}

pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<String, AppError> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| AppError::Internal(format!("failed to encode JWT: {e}")))
}

/// Decode and validate a JWT, asserting it carries the expected token type.
///
/// `jsonwebtoken`'s `Validation` already rejects an expired `exp`
/// (surfaced as `AppError::TokenExpired`); any other decode failure,
/// including a type mismatch, is `AppError::InvalidToken`.
pub fn decode_jwt(token: &str, secret: &str, expected: TokenType) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let claims = decode::<Claims>(token, &key, &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?
        .claims;

    if claims.token_type != expected {
        return Err(AppError::InvalidToken);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let secret = "test-secret-that-is-long-enough-0123456789";

        let claims = Claims::new_access(
            user_id,
            Some(tenant_id),
            "school_admin".to_string(),
            "jane".to_string(),
            900,
            now(),
        );
        let token = encode_jwt(&claims, secret).unwrap();

        let decoded = decode_jwt(&token, secret, TokenType::Access).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.tenant_id, Some(tenant_id));
        assert_eq!(decoded.role, "school_admin");
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let secret = "test-secret-that-is-long-enough-0123456789";
        let claims = Claims::new_access(
            Uuid::new_v4(),
            None,
            "platform_admin".to_string(),
            "root".to_string(),
            900,
            now(),
        );
        let token = encode_jwt(&claims, secret).unwrap();

        let err = decode_jwt(&token, secret, TokenType::Refresh).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn platform_admin_has_no_tenant() {
        let secret = "test-secret-that-is-long-enough-0123456789";
        let claims = Claims::new_access(
            Uuid::new_v4(),
            None,
            "platform_admin".to_string(),
            "root".to_string(),
            900,
            now(),
        );
        let token = encode_jwt(&claims, secret).unwrap();
        let decoded = decode_jwt(&token, secret, TokenType::Access).unwrap();
        assert_eq!(decoded.tenant_id, None);
    }
}
