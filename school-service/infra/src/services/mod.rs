mod attendance_service;
mod auth_service;
mod delivery_worker;
mod device_auth;
mod display_token_service;
mod notification_service;
mod schedule_service;

pub use attendance_service::AttendanceIngressServiceImpl;
pub use auth_service::AuthServiceImpl;
pub use delivery_worker::{backoff_delay, run_delivery_worker, DeliveryWorkerConfig};
pub use device_auth::DeviceAuthenticatorImpl;
pub use display_token_service::DisplayTokenServiceImpl;
pub use notification_service::NotificationServiceImpl;
pub use schedule_service::ScheduleServiceImpl;
