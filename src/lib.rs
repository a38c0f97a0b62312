//! # matrix_tables
//!
//! Declarative HTML table builder.
//!
//! Describe a grid, then attach content and attribute callbacks to any
//! rectangular region of it with a compact selector syntax. At render time
//! every cell resolves the stack of callbacks that apply to it and the grid is
//! written out with merged (spanning) cells handled correctly.
//!
//! ## Features
//!
//! - **Selectors**: `"<columns>,<rows>"` with `*`, `first`, `last`, `odd`,
//!   `even`, single indices and `a-b` ranges, joined by `;`
//! - **Layered attributes**: cell, row, column, section and table scopes
//! - **Folding callbacks**: each callback sees the value built so far
//! - **Spans**: cells can cover neighbors; covered cells are not emitted
//! - **Omitted cells**: a content callback returning `None` drops its cell
//! - **Sections**: header/body/footer, or a single collapsed grid
//!
//! ## Usage Examples
//!
//! ### Collapsed table
//!
//! ```rust
//! use matrix_tables::{Mapping, RenderOptions, Table};
//!
//! let mut table = Table::collapsed(3, 2);
//! table.map("*,first", Mapping::text("head").row_attr("class", |_, _| "top".into()));
//! table.map("odd,*", Mapping::new().column_attr("class", |_, _| "odd".into()));
//! if let Some(cell) = table.cell(0, 1) {
//!     cell.expand(2, 1);
//! }
//!
//! let html = table.render_with(&RenderOptions::compact());
//! assert!(html.starts_with("<table><tr class=\"top\">"));
//! assert!(html.contains("<td colspan=\"2\" rowspan=\"1\" class=\"odd\">&nbsp;</td>"));
//! ```
//!
//! ### Full table
//!
//! ```rust
//! use matrix_tables::{Mapping, Table};
//!
//! let mut table = Table::full();
//! table.set_header(2, 1).map("*,*", Mapping::content(|cell, _| {
//!     format!("Column {}", cell.column_index() + 1)
//! }));
//! table.set_body(2, 3).map("*,*", Mapping::content(|cell, prev| {
//!     format!("{}{}", prev, cell.row_index() * 2 + cell.column_index())
//! }));
//!
//! let html = table.render();
//! assert!(html.contains("<th colspan=\"1\" rowspan=\"1\">Column 2</th>"));
//! assert!(html.contains("<td colspan=\"1\" rowspan=\"1\">5</td>"));
//! ```

/// Core table modules
pub mod core;

/// Data layer - static mappings
pub mod data;

/// Utility modules
pub mod utils;

// Re-export core types
pub use core::entity::{Cell, Column, Element, Row, SectionContext, SectionKind, TableContext};
pub use core::grid::{EntityKind, GridSpace, Scope};
pub use core::options::RenderOptions;
pub use core::render_map::{AttributeFn, ContentFn, Mapping};
pub use core::section::Section;
pub use core::selector::resolve as resolve_selection;
pub use core::table::{Table, TableKind};

// Re-export utilities
pub use utils::error::{TableError, TableResult};
pub use utils::escape::html_entities;
