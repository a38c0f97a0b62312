//! Core table modules
//!
//! Components, leaves first:
//!
//! ```text
//! selector ─┐
//! grid ─────┼─> render_map ─> entity ─> section (grid walk) ─> table
//! properties┘
//! ```
//!
//! - [`selector`]: selection expressions to index sets
//! - [`grid`]: section dimensions and synthetic bucket indices
//! - [`render_map`]: override slots, mappings and folding
//! - [`entity`]: views passed to callbacks
//! - [`section`]: mapping entry point and the span-aware render walk
//! - [`table`]: collapsed and full tables

pub mod entity;
pub mod grid;
pub mod options;
pub mod properties;
pub mod render_map;
pub mod section;
pub mod selector;
pub mod table;

pub use entity::{Cell, Column, Element, Row, SectionContext, SectionKind, TableContext};
pub use grid::{EntityKind, GridSpace, Scope};
pub use options::RenderOptions;
pub use render_map::{AttributeFn, ContentFn, Mapping, RenderMap};
pub use section::Section;
pub use table::{Table, TableKind};
