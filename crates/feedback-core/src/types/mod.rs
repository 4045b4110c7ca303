//! Core domain types

pub mod feedback;

pub use feedback::*;
