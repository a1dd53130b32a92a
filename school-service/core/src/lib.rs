pub mod domains;
pub mod dto;
pub mod repositories;
pub mod services;
