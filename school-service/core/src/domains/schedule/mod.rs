pub mod engine;
pub mod model;

pub use engine::{check_overlap, classify, resolve_active_schedule};
pub use model::*;
