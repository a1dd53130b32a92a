//! School Service API
//!
//! HTTP handlers and routing for the school service (multi-tenant
//! attendance, records and notifications backend).
//!
//! - `handlers/`: Axum HTTP handlers, one module per domain
//! - `routes/`: route tree assembly and middleware wiring
//! - `state`: the `AppState` shared across handlers
//! - `response`: the `ApiResponse`/`ApiAck` envelope types

pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
