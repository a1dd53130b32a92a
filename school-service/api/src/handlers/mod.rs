pub mod attendance;
pub mod auth;
pub mod display_token;
pub mod live_feed;
pub mod notification;
pub mod platform_admin;
pub mod records;
pub mod school_admin;
pub mod schedule;
