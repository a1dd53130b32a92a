pub mod live_feed;
pub mod push;
pub mod repositories;
pub mod services;
