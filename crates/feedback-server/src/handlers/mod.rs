//! HTTP handlers

pub mod error;
pub mod feedbacks;
pub mod health;
pub mod page;
pub mod stats;

pub use error::ApiError;
pub use health::{api_health, health};
