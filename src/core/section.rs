//! Sections and the grid render walk
//!
//! A section owns one render map plus lazily created column, row and cell
//! views. Rendering walks the grid row-major and honors cell spans: every
//! coordinate covered by a spanning cell still has its content chain folded
//! (callbacks may have side effects) but emits no markup. A cell whose
//! content fold returns `None` is omitted: no element is written and its span
//! covers nothing.
//!
//! # One-shot rendering
//!
//! Covered coordinates are marked suppressed in the render map while
//! rendering. The mark is not cleared afterwards, so rendering the same
//! section twice after spans were applied leaves covered cells out even if
//! the spans were shrunk in between.

use std::fmt;
use std::rc::{Rc, Weak};

use fxhash::FxHashMap;

use super::entity::{Cell, Column, Element, Row, SectionContext, SectionKind, TableContext};
use super::grid::{EntityKind, GridSpace, Scope};
use super::options::RenderOptions;
use super::properties::ResolverRegistry;
use super::render_map::{
    fold_attributes, fold_content, AttributeValues, ContentChain, Mapping, RenderMap, Slot,
};
use super::selector;
use crate::utils::escape::html_entities;

/// One logical grid of a table (header, body, footer, or the implicit grid
/// of a collapsed table)
pub struct Section {
    context: Rc<SectionContext>,
    map: RenderMap,
    columns: FxHashMap<usize, Rc<Column>>,
    rows: FxHashMap<usize, Rc<Row>>,
    cells: FxHashMap<(usize, usize), Cell>,
    column_resolvers: ResolverRegistry<Column>,
    row_resolvers: ResolverRegistry<Row>,
    cell_resolvers: ResolverRegistry<Cell>,
}

impl Section {
    pub(crate) fn new(
        kind: SectionKind,
        columns: usize,
        rows: usize,
        table: Weak<TableContext>,
    ) -> Self {
        let grid = GridSpace::new(columns, rows);
        Section {
            context: Rc::new(SectionContext::new(kind, grid, table)),
            map: RenderMap::new(grid),
            columns: FxHashMap::default(),
            rows: FxHashMap::default(),
            cells: FxHashMap::default(),
            column_resolvers: FxHashMap::default(),
            row_resolvers: FxHashMap::default(),
            cell_resolvers: FxHashMap::default(),
        }
    }

    pub fn context(&self) -> &SectionContext {
        &self.context
    }

    pub fn kind(&self) -> SectionKind {
        self.context.kind()
    }

    pub fn columns(&self) -> usize {
        self.map.grid().columns()
    }

    pub fn rows(&self) -> usize {
        self.map.grid().rows()
    }

    pub fn render_map(&self) -> &RenderMap {
        &self.map
    }

    /// The column view at `index`, created on first access
    pub fn column(&mut self, index: usize) -> Rc<Column> {
        let context = &self.context;
        let resolvers = &self.column_resolvers;
        let column = self
            .columns
            .entry(index)
            .or_insert_with(|| Rc::new(Column::new(Rc::clone(context), index, resolvers)));
        Rc::clone(column)
    }

    /// The row view at `index`, created on first access
    pub fn row(&mut self, index: usize) -> Rc<Row> {
        let context = &self.context;
        let resolvers = &self.row_resolvers;
        let row = self
            .rows
            .entry(index)
            .or_insert_with(|| Rc::new(Row::new(Rc::clone(context), index, resolvers)));
        Rc::clone(row)
    }

    /// The cell at `(column, row)`, created on first access
    pub fn cell(&mut self, column: usize, row: usize) -> &mut Cell {
        let column_view = self.column(column);
        let row_view = self.row(row);
        let resolvers = &self.cell_resolvers;
        self.cells
            .entry((column, row))
            .or_insert_with(|| Cell::new(column_view, row_view, resolvers))
    }

    /// Register a lazily evaluated property for entities of `kind`.
    ///
    /// Table and section resolvers attach to the live table/section. Column,
    /// row and cell resolvers are copied into each view when it is created,
    /// so views that already exist do not pick them up.
    pub fn callback<F>(&mut self, kind: EntityKind, name: impl Into<String>, f: F)
    where
        F: Fn(Element<'_>) -> String + 'static,
    {
        let name = name.into();
        match kind {
            EntityKind::Table => match self.context.table() {
                Some(table) => table.properties().register(
                    name,
                    Rc::new(move |t: &TableContext| f(Element::Table(t))),
                ),
                None => log::debug!("[section] table is gone, dropping callback {:?}", name),
            },
            EntityKind::Section => self.context.properties().register(
                name,
                Rc::new(move |s: &SectionContext| f(Element::Section(s))),
            ),
            EntityKind::Column => {
                self.column_resolvers
                    .insert(name, Rc::new(move |c: &Column| f(Element::Column(c))));
            }
            EntityKind::Row => {
                self.row_resolvers
                    .insert(name, Rc::new(move |r: &Row| f(Element::Row(r))));
            }
            EntityKind::Cell => {
                self.cell_resolvers
                    .insert(name, Rc::new(move |c: &Cell| f(Element::Cell(c))));
            }
        }
    }

    /// Attach `mapping` to every cell picked by `selector`.
    ///
    /// `selector` is `"<columns>,<rows>"`, each half a selection expression
    /// (see [`selector::resolve`]). Parts after a second comma are ignored. A
    /// selector that picks no cell registers nothing at any scope.
    pub fn map(&mut self, selector: &str, mapping: Mapping) {
        let grid = self.map.grid();
        let mut parts = selector.split(',');
        let column_expr = parts.next().unwrap_or_default();
        let row_expr = parts.next().unwrap_or_default();
        let columns = selector::resolve(grid.max_column(), column_expr);
        let rows = selector::resolve(grid.max_row(), row_expr);

        if columns.is_empty() || rows.is_empty() {
            log::debug!("[section] selector {:?} matches no cells", selector);
            return;
        }

        self.map.assign(&columns, &rows, &mapping);

        if let Some(attributes) = mapping.scope(Scope::Table) {
            match self.context.table() {
                Some(table) => table.append_attributes(attributes),
                None => log::debug!("[section] table is gone, dropping table attributes"),
            }
        }
    }

    /// Write the section wrapper and all of its rows
    pub fn render_to<W: fmt::Write>(&mut self, out: &mut W, options: &RenderOptions) -> fmt::Result {
        let tag = self.context.wrapper_tag();
        let attributes = fold_attributes(
            Element::Section(&self.context),
            self.map.section_slot().attributes(),
            AttributeValues::new(),
        );

        log::debug!(
            "[section] rendering <{}> ({}x{})",
            tag,
            self.columns(),
            self.rows()
        );

        let indent = options.indentation(1);
        write!(
            out,
            "{}<{}{}>{}",
            indent,
            tag,
            render_attributes(&attributes),
            options.newline
        )?;
        self.render_rows(out, options, 2)?;
        write!(out, "{}</{}>{}", indent, tag, options.newline)
    }

    /// Write every row, with `<tr>` elements indented `depth` levels
    pub(crate) fn render_rows<W: fmt::Write>(
        &mut self,
        out: &mut W,
        options: &RenderOptions,
        depth: usize,
    ) -> fmt::Result {
        let row_indent = options.indentation(depth);
        let cell_indent = options.indentation(depth + 1);

        for y in 0..self.rows() {
            let row = self.row(y);
            let attributes = match self.map.row_slot(y) {
                Some(slot) => {
                    fold_attributes(Element::Row(&row), slot.attributes(), AttributeValues::new())
                }
                None => AttributeValues::new(),
            };
            write!(
                out,
                "{}<tr{}>{}",
                row_indent,
                render_attributes(&attributes),
                options.newline
            )?;

            for x in 0..self.columns() {
                if self.map.is_suppressed(x, y) {
                    log::trace!("[section] skipping covered ({}, {})", x, y);
                    continue;
                }
                self.render_cell(out, x, y, &cell_indent, options)?;
            }

            write!(out, "{}</tr>{}", row_indent, options.newline)?;
        }

        Ok(())
    }

    fn render_cell<W: fmt::Write>(
        &mut self,
        out: &mut W,
        x: usize,
        y: usize,
        indent: &str,
        options: &RenderOptions,
    ) -> fmt::Result {
        let column = self.column(x);
        self.cell(x, y);
        let cell = &self.cells[&(x, y)];

        let content = match self.map.slot(x, y).map(Slot::content) {
            Some(ContentChain::Chain(chain)) if !chain.is_empty() => {
                match fold_content(chain, cell) {
                    Some(markup) => markup,
                    None => {
                        log::trace!("[section] cell ({}, {}) omitted", x, y);
                        return Ok(());
                    }
                }
            }
            _ => options.placeholder.clone(),
        };

        // Column scope folds first, cell scope composes on top of it.
        let column_attributes = match self.map.column_slot(x) {
            Some(slot) => fold_attributes(
                Element::Column(&column),
                slot.attributes(),
                AttributeValues::new(),
            ),
            None => AttributeValues::new(),
        };
        let attributes = match self.map.slot(x, y) {
            Some(slot) => fold_attributes(Element::Cell(cell), slot.attributes(), column_attributes),
            None => column_attributes,
        };

        log::trace!("[section] cell ({}, {})", x, y);

        let tag = self.context.cell_tag();
        write!(
            out,
            "{}<{} colspan=\"{}\" rowspan=\"{}\"{}>{}</{}>{}",
            indent,
            tag,
            cell.column_span(),
            cell.row_span(),
            render_attributes(&attributes),
            content,
            tag,
            options.newline
        )?;

        let (column_span, row_span) = (cell.column_span(), cell.row_span());
        self.cover(x, y, column_span, row_span);
        Ok(())
    }

    /// Fold and suppress every coordinate under the span anchored at
    /// `(column, row)`, except the anchor itself
    fn cover(&mut self, column: usize, row: usize, column_span: usize, row_span: usize) {
        let grid = self.map.grid();

        for y in row..grid.row_span_end(row, row_span) {
            for x in column..grid.column_span_end(column, column_span) {
                if (x, y) == (column, row) {
                    continue;
                }

                self.cell(x, y);
                if let Some(ContentChain::Chain(chain)) = self.map.slot(x, y).map(Slot::content) {
                    if !chain.is_empty() {
                        let covered = &self.cells[&(x, y)];
                        let _ = fold_content(chain, covered);
                    }
                }

                self.map.suppress(x, y);
                log::trace!(
                    "[section] ({}, {}) covered by ({}, {})",
                    x,
                    y,
                    column,
                    row
                );
            }
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("context", &self.context)
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

/// Render folded attributes as ` name="value"` pairs, escaping both sides
pub(crate) fn render_attributes(values: &AttributeValues) -> String {
    let mut rendered = String::new();
    for (name, value) in values {
        rendered.push(' ');
        rendered.push_str(&html_entities(name));
        rendered.push_str("=\"");
        rendered.push_str(&html_entities(value));
        rendered.push('"');
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn body(columns: usize, rows: usize) -> Section {
        Section::new(SectionKind::Body, columns, rows, Weak::new())
    }

    fn render(section: &mut Section) -> String {
        let mut out = String::new();
        section
            .render_to(&mut out, &RenderOptions::compact())
            .unwrap();
        out
    }

    #[test]
    fn test_fresh_section_renders_placeholders() {
        let mut section = body(3, 2);
        let out = render(&mut section);
        assert_eq!(
            out.matches("<td colspan=\"1\" rowspan=\"1\">&nbsp;</td>").count(),
            6
        );
        assert_eq!(out.matches("<tr>").count(), 2);
        assert!(out.starts_with("<tbody>"));
        assert!(out.ends_with("</tbody>"));
    }

    #[test]
    fn test_views_are_cached() {
        let mut section = body(2, 2);
        let a = section.column(1);
        let b = section.column(1);
        assert!(Rc::ptr_eq(&a, &b));

        let r = section.row(0);
        assert!(Rc::ptr_eq(&r, &section.row(0)));

        section.cell(1, 0).expand(2, 2);
        assert_eq!(section.cell(1, 0).column_span(), 2);
        assert_eq!(section.cell(1, 0).row_span(), 2);
    }

    #[test]
    fn test_expand_coerces_zero() {
        let mut section = body(2, 2);
        let cell = section.cell(0, 0).expand(0, 0);
        assert_eq!(cell.column_span(), 1);
        assert_eq!(cell.row_span(), 1);
    }

    #[test]
    fn test_views_know_their_section() {
        let mut section = body(4, 3);
        let column = section.column(2);
        assert_eq!(column.index(), 2);
        assert_eq!(column.rows(), 3);
        assert_eq!(column.section().kind(), SectionKind::Body);

        let row = section.row(1);
        assert_eq!(row.columns(), 4);

        let cell = section.cell(2, 1);
        assert_eq!(cell.column_index(), 2);
        assert_eq!(cell.row_index(), 1);
        assert_eq!(cell.section().cell_tag(), "td");
    }

    #[test]
    fn test_out_of_range_selector_is_noop() {
        let mut section = body(6, 2);
        section.map(
            "7,*",
            Mapping::text("x").section_attr("id", |_, _| "s".to_string()),
        );

        let map = section.render_map();
        for c in 0..=6 {
            for r in 0..=2 {
                let slot = map.slot(c, r).unwrap();
                assert_eq!(slot.content_len(), 0);
                assert!(slot.attributes().is_empty());
            }
        }
    }

    #[test]
    fn test_selector_without_row_half_is_noop() {
        let mut section = body(2, 2);
        section.map("*", Mapping::text("x"));
        assert_eq!(section.render_map().slot(0, 0).unwrap().content_len(), 0);
    }

    #[test]
    fn test_span_emits_fewer_cells() {
        let mut section = body(3, 1);
        section.cell(0, 0).expand(2, 1);
        let out = render(&mut section);

        assert_eq!(out.matches("<td ").count(), 2);
        assert!(out.contains("<td colspan=\"2\" rowspan=\"1\">"));
    }

    #[test]
    fn test_covered_content_still_runs() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut section = body(2, 2);
        let seen = Rc::clone(&log);
        section.map(
            "*,*",
            Mapping::content(move |cell, _| {
                seen.borrow_mut()
                    .push((cell.column_index(), cell.row_index()));
                format!("{}:{}", cell.column_index(), cell.row_index())
            }),
        );
        section.cell(0, 0).expand(2, 2);

        let out = render(&mut section);
        assert!(out.contains(">0:0<"));
        assert!(!out.contains(">1:1<"));
        assert_eq!(out.matches("<td ").count(), 1);

        let mut calls = log.borrow().clone();
        calls.sort_unstable();
        assert_eq!(calls, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_skipped_cell_is_omitted() {
        let mut section = body(3, 1);
        section.map("*,*", Mapping::text("x"));
        section.map(
            "1,0",
            Mapping::content_or_skip(|cell, _| (cell.column_index() != 1).then(String::new)),
        );
        section.cell(1, 0).expand(2, 1);

        let out = render(&mut section);
        assert_eq!(out.matches("<td ").count(), 2);
        assert!(!out.contains("colspan=\"2\""));
        assert!(!section.render_map().is_suppressed(0, 0));
        assert!(!section.render_map().is_suppressed(2, 0));
    }

    #[test]
    fn test_content_after_skip_restores_cell() {
        let mut section = body(1, 1);
        section.map("0,0", Mapping::skip());
        section.map("0,0", Mapping::content(|_, prev| format!("[{}]", prev)));
        assert!(render(&mut section).contains(">[]</td>"));
    }

    #[test]
    fn test_extra_selector_parts_ignored() {
        let mut section = body(2, 3);
        section.map("0,1,2", Mapping::text("X"));
        let map = section.render_map();
        assert_eq!(map.slot(0, 1).unwrap().content_len(), 1);
        assert_eq!(map.slot(0, 2).unwrap().content_len(), 0);
    }

    #[test]
    fn test_span_clamped_at_edges() {
        let mut section = body(2, 2);
        section.cell(1, 1).expand(5, 5);
        let out = render(&mut section);
        assert_eq!(out.matches("<td ").count(), 4);
        assert!(out.contains("colspan=\"5\" rowspan=\"5\""));
    }

    #[test]
    fn test_second_render_keeps_suppression() {
        let mut section = body(2, 1);
        section.cell(0, 0).expand(2, 1);
        render(&mut section);

        section.cell(0, 0).expand(1, 1);
        let out = render(&mut section);
        assert_eq!(out.matches("<td ").count(), 1);
    }

    #[test]
    fn test_column_then_cell_attribute_fold() {
        let mut section = body(2, 2);
        section.map(
            "0,*",
            Mapping::new().column_attr("class", |_, _| "a".to_string()),
        );
        section.map(
            "0,1",
            Mapping::new().cell_attr("class", |_, prev| format!("{}-b", prev.unwrap_or_default())),
        );
        let out = render(&mut section);

        assert!(out.contains("<tr><td colspan=\"1\" rowspan=\"1\" class=\"a\">"));
        assert!(out.contains("<tr><td colspan=\"1\" rowspan=\"1\" class=\"a-b\">"));
    }

    #[test]
    fn test_row_and_section_attributes() {
        let mut section = body(3, 2);
        section.map(
            "*,last",
            Mapping::new()
                .row_attr("class", |e, prev| {
                    format!("{}r{}", prev.unwrap_or_default(), e.row_index().unwrap_or(0))
                })
                .section_attr("id", |_, _| "main".to_string()),
        );
        let out = render(&mut section);

        assert!(out.starts_with("<tbody id=\"main\">"));
        assert_eq!(out.matches("<tr class=\"r1\">").count(), 1);
        assert_eq!(out.matches("<tr>").count(), 1);
    }

    #[test]
    fn test_attribute_values_escaped() {
        let mut section = body(1, 1);
        section.map(
            "0,0",
            Mapping::new().cell_attr("title", |_, _| "\"x\" & <y>".to_string()),
        );
        let out = render(&mut section);
        assert!(out.contains("title=\"&quot;x&quot; &amp; &lt;y&gt;\""));
    }

    #[test]
    fn test_cell_property_callbacks() {
        let mut section = body(2, 1);
        section.callback(EntityKind::Cell, "label", |e| {
            format!("c{}", e.column_index().unwrap_or(0))
        });
        section.map(
            "*,0",
            Mapping::content(|cell, _| cell.property("label").unwrap_or_default()),
        );
        let out = render(&mut section);
        assert!(out.contains(">c0<"));
        assert!(out.contains(">c1<"));
    }

    #[test]
    fn test_cell_callback_snapshot() {
        let mut section = body(2, 1);
        section.cell(0, 0);
        section.callback(EntityKind::Cell, "label", |_| "late".to_string());

        assert_eq!(section.cell(0, 0).property("label"), None);
        assert_eq!(section.cell(1, 0).property("label").as_deref(), Some("late"));
    }

    #[test]
    fn test_section_callback_is_live() {
        let mut section = body(1, 1);
        section.callback(EntityKind::Section, "name", |e| {
            format!("{:?}", e.kind())
        });
        assert_eq!(section.context().property("name").as_deref(), Some("Section"));
    }
}
