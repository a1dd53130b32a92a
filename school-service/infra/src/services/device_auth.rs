//! Implementation of `shared_auth::extractors::DeviceAuthenticator`
//! (C4/C6): devices present `device_code` + `api_key` and get back a
//! bare `DeviceContext`, never a user id. The key is hashed with
//! SHA-256 at rest, mirroring the teacher's `hash_token` pattern in
//! `services/user_service/infra/src/auth/service.rs` applied to a
//! credential instead of a session token.

use async_trait::async_trait;
use school_service_core::repositories::DeviceRepository;
use sha2::{Digest, Sha256};
use shared_auth::extractors::{DeviceAuthenticator, DeviceContext};
use shared_error::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceAuthenticatorImpl {
    device_repo: Arc<dyn DeviceRepository>,
}

impl DeviceAuthenticatorImpl {
    pub fn new(device_repo: Arc<dyn DeviceRepository>) -> Self {
        Self { device_repo }
    }

    fn hash(api_key: &str) -> String {
        format!("{:x}", Sha256::digest(api_key.as_bytes()))
    }
}

#[async_trait]
impl DeviceAuthenticator for DeviceAuthenticatorImpl {
    async fn authenticate_device(
        &self,
        device_code: &str,
        api_key: &str,
    ) -> Result<DeviceContext, AppError> {
        let device = self
            .device_repo
            .find_by_device_code(device_code)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !device.active {
            return Err(AppError::InvalidCredentials);
        }

        if Self::hash(api_key) != device.api_key_hash {
            return Err(AppError::InvalidCredentials);
        }

        Ok(DeviceContext {
            tenant_id: device.school_id,
            device_id: device.id,
        })
    }
}
