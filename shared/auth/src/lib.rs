//! Authorization middleware (C4): token verification, tenant-predicate
//! injection, and the fixed six-role capability matrix (spec §4.3).

pub mod extractors;
pub mod middleware;
pub mod policy;

pub use extractors::{DeviceContext, TenantContext};
pub use middleware::{auth_middleware, AuthLayerState, JwtSecretProvider, UserStatus, UserStatusProvider};
pub use policy::{authorize, Capability};

use shared_context::RequestContext;

/// Re-exported so handlers only need `use shared_auth::*`.
pub type Context = RequestContext;
