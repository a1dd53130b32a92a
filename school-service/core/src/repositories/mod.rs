pub mod attendance_repository;
pub mod notification_repository;
pub mod platform_admin_repository;
pub mod records_repository;
pub mod school_admin_repository;
pub mod schedule_repository;

pub use attendance_repository::*;
pub use notification_repository::*;
pub use platform_admin_repository::*;
pub use records_repository::*;
pub use schedule_repository::*;
pub use school_admin_repository::*;
