//! Data layer - static mappings
//!
//! This module contains the static lookup tables used while emitting markup.

pub mod entities;

pub use entities::{entity_for, HTML_ENTITIES};
