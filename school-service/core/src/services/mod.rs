pub mod attendance_service;
pub mod auth_service;
pub mod display_token_service;
pub mod notification_service;
pub mod schedule_service;

pub use attendance_service::*;
pub use auth_service::*;
pub use display_token_service::*;
pub use notification_service::*;
pub use schedule_service::*;
