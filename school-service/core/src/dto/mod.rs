pub mod attendance_dto;
pub mod auth_dto;
pub mod notification_dto;
pub mod platform_admin_dto;
pub mod records_dto;
pub mod schedule_dto;
pub mod school_admin_dto;

pub use attendance_dto::*;
pub use auth_dto::*;
pub use notification_dto::*;
pub use platform_admin_dto::*;
pub use records_dto::*;
pub use schedule_dto::*;
pub use school_admin_dto::*;
