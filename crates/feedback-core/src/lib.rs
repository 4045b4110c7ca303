//! Feedback Core Library
//!
//! Domain types, validation and storage ports for the feedback service.

pub mod error;
pub mod ports;
pub mod types;
pub mod validation;

pub use error::{FeedbackError, Result, StoreError, ValidationError};
pub use ports::{FeedbackStore, StoreHealth};
pub use types::*;
pub use validation::validate;
