//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Markup escaping
//! - Error types and result types

pub mod error;
pub mod escape;

// Re-export commonly used items
pub use error::{TableError, TableResult};
pub use escape::html_entities;
