//! Entity views handed to mapping callbacks
//!
//! Tables, sections, columns, rows and cells are thin views over grid
//! coordinates. They carry identity (indices, spans), back-references to the
//! section and table they belong to, and a lazily evaluated property bag.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::grid::{EntityKind, GridSpace};
use super::properties::{Properties, ResolverRegistry};
use super::render_map::{AttributeChains, AttributeFn};

// ============================================================================
// Table context
// ============================================================================

/// Table-wide state shared by every section of a table.
///
/// Owned by the [`Table`](crate::core::table::Table); sections only keep a weak
/// handle, so there is exactly one logical store per table.
pub struct TableContext {
    props: Properties<TableContext>,
    attributes: RefCell<AttributeChains>,
}

impl TableContext {
    pub(crate) fn new() -> Self {
        TableContext {
            props: Properties::new(),
            attributes: RefCell::new(IndexMap::new()),
        }
    }

    /// Read a table property
    pub fn property(&self, name: &str) -> Option<String> {
        self.props.get(self, name)
    }

    /// Set a table property
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        self.props.set(name, value);
    }

    pub fn properties(&self) -> &Properties<TableContext> {
        &self.props
    }

    /// Append table-scope attribute callbacks
    pub(crate) fn append_attributes(&self, callbacks: &IndexMap<String, AttributeFn>) {
        let mut attributes = self.attributes.borrow_mut();
        for (name, callback) in callbacks {
            attributes
                .entry(name.clone())
                .or_default()
                .push(Rc::clone(callback));
        }
    }

    /// Snapshot of the table-scope attribute chains
    pub(crate) fn attribute_chains(&self) -> AttributeChains {
        self.attributes.borrow().clone()
    }
}

impl std::fmt::Debug for TableContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableContext")
            .field("props", &self.props)
            .field(
                "attributes",
                &self.attributes.borrow().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Section context
// ============================================================================

/// Section flavor, which decides the wrapper and cell tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Body,
    Footer,
}

impl SectionKind {
    /// Wrapper element tag
    pub fn wrapper_tag(&self) -> &'static str {
        match self {
            SectionKind::Header => "thead",
            SectionKind::Body => "tbody",
            SectionKind::Footer => "tfoot",
        }
    }

    /// Cell element tag
    pub fn cell_tag(&self) -> &'static str {
        match self {
            SectionKind::Header | SectionKind::Footer => "th",
            SectionKind::Body => "td",
        }
    }
}

/// Identity of a section as seen from callbacks
pub struct SectionContext {
    kind: SectionKind,
    wrapper_tag: &'static str,
    cell_tag: &'static str,
    grid: GridSpace,
    table: Weak<TableContext>,
    props: Properties<SectionContext>,
}

impl SectionContext {
    pub(crate) fn new(kind: SectionKind, grid: GridSpace, table: Weak<TableContext>) -> Self {
        SectionContext {
            kind,
            wrapper_tag: kind.wrapper_tag(),
            cell_tag: kind.cell_tag(),
            grid,
            table,
            props: Properties::new(),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn wrapper_tag(&self) -> &'static str {
        self.wrapper_tag
    }

    pub fn cell_tag(&self) -> &'static str {
        self.cell_tag
    }

    pub fn grid(&self) -> GridSpace {
        self.grid
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// The owning table, if it is still alive
    pub fn table(&self) -> Option<Rc<TableContext>> {
        self.table.upgrade()
    }

    /// Read a section property
    pub fn property(&self, name: &str) -> Option<String> {
        self.props.get(self, name)
    }

    /// Set a section property
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        self.props.set(name, value);
    }

    pub fn properties(&self) -> &Properties<SectionContext> {
        &self.props
    }
}

impl std::fmt::Debug for SectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionContext")
            .field("kind", &self.kind)
            .field("grid", &self.grid)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Column / Row / Cell
// ============================================================================

/// A whole column of a section
#[derive(Debug)]
pub struct Column {
    index: usize,
    rows: usize,
    section: Rc<SectionContext>,
    props: Properties<Column>,
}

impl Column {
    pub(crate) fn new(
        section: Rc<SectionContext>,
        index: usize,
        resolvers: &ResolverRegistry<Column>,
    ) -> Self {
        Column {
            index,
            rows: section.rows(),
            section,
            props: Properties::from_registry(resolvers),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of rows the column runs through
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn section(&self) -> &SectionContext {
        &self.section
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.props.get(self, name)
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        self.props.set(name, value);
    }
}

/// A whole row of a section
#[derive(Debug)]
pub struct Row {
    index: usize,
    columns: usize,
    section: Rc<SectionContext>,
    props: Properties<Row>,
}

impl Row {
    pub(crate) fn new(
        section: Rc<SectionContext>,
        index: usize,
        resolvers: &ResolverRegistry<Row>,
    ) -> Self {
        Row {
            index,
            columns: section.columns(),
            section,
            props: Properties::from_registry(resolvers),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of columns in the row
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn section(&self) -> &SectionContext {
        &self.section
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.props.get(self, name)
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        self.props.set(name, value);
    }
}

/// One grid cell, possibly spanning several columns and rows
#[derive(Debug)]
pub struct Cell {
    column: Rc<Column>,
    row: Rc<Row>,
    column_span: usize,
    row_span: usize,
    props: Properties<Cell>,
}

impl Cell {
    pub(crate) fn new(column: Rc<Column>, row: Rc<Row>, resolvers: &ResolverRegistry<Cell>) -> Self {
        Cell {
            column,
            row,
            column_span: 1,
            row_span: 1,
            props: Properties::from_registry(resolvers),
        }
    }

    /// Make the cell cover `columns × rows` grid positions.
    ///
    /// Zero spans are coerced to 1. Spans running past the grid are clamped at
    /// render time.
    pub fn expand(&mut self, columns: usize, rows: usize) -> &mut Self {
        self.column_span = columns.max(1);
        self.row_span = rows.max(1);
        self
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn column_index(&self) -> usize {
        self.column.index()
    }

    pub fn row_index(&self) -> usize {
        self.row.index()
    }

    pub fn column_span(&self) -> usize {
        self.column_span
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn section(&self) -> &SectionContext {
        self.column.section()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.props.get(self, name)
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        self.props.set(name, value);
    }
}

// ============================================================================
// Element
// ============================================================================

/// The entity an attribute callback is folded against
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Table(&'a TableContext),
    Section(&'a SectionContext),
    Column(&'a Column),
    Row(&'a Row),
    Cell(&'a Cell),
}

impl<'a> Element<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Element::Table(_) => EntityKind::Table,
            Element::Section(_) => EntityKind::Section,
            Element::Column(_) => EntityKind::Column,
            Element::Row(_) => EntityKind::Row,
            Element::Cell(_) => EntityKind::Cell,
        }
    }

    /// Column index for columns and cells
    pub fn column_index(&self) -> Option<usize> {
        match self {
            Element::Column(column) => Some(column.index()),
            Element::Cell(cell) => Some(cell.column_index()),
            _ => None,
        }
    }

    /// Row index for rows and cells
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Element::Row(row) => Some(row.index()),
            Element::Cell(cell) => Some(cell.row_index()),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&'a Cell> {
        match *self {
            Element::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    /// Read a property of whichever entity this is
    pub fn property(&self, name: &str) -> Option<String> {
        match self {
            Element::Table(table) => table.property(name),
            Element::Section(section) => section.property(name),
            Element::Column(column) => column.property(name),
            Element::Row(row) => row.property(name),
            Element::Cell(cell) => cell.property(name),
        }
    }
}
