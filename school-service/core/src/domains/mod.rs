pub mod attendance;
pub mod notification;
pub mod records;
pub mod schedule;
pub mod school_admin;
