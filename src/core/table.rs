//! Tables: collapsed and full
//!
//! A collapsed table is a single implicit grid written directly under
//! `<table>`. A full table holds up to three independently sized sections
//! (header, body, footer). Either way the table owns one [`TableContext`]
//! which every section shares for table-scope attributes and properties.

use std::fmt;
use std::io;
use std::rc::Rc;

use super::entity::{Cell, Element, SectionKind, TableContext};
use super::grid::Scope;
use super::options::RenderOptions;
use super::render_map::{fold_attributes, AttributeValues, Mapping};
use super::section::{render_attributes, Section};
use crate::utils::error::TableResult;

/// Which kind of table to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Header/body/footer sections added independently
    Full,
    /// A single implicit grid
    Collapsed { columns: usize, rows: usize },
}

/// An HTML table
pub struct Table {
    context: Rc<TableContext>,
    implicit: Option<Section>,
    header: Option<Section>,
    body: Option<Section>,
    footer: Option<Section>,
}

impl Table {
    /// Build a table of the given kind
    pub fn build(kind: TableKind) -> Self {
        match kind {
            TableKind::Full => Self::full(),
            TableKind::Collapsed { columns, rows } => Self::collapsed(columns, rows),
        }
    }

    /// A table whose sections are added with [`set_header`](Self::set_header),
    /// [`set_body`](Self::set_body) and [`set_footer`](Self::set_footer)
    pub fn full() -> Self {
        Table {
            context: Rc::new(TableContext::new()),
            implicit: None,
            header: None,
            body: None,
            footer: None,
        }
    }

    /// A table made of one `columns × rows` grid
    pub fn collapsed(columns: usize, rows: usize) -> Self {
        let context = Rc::new(TableContext::new());
        let implicit = Section::new(SectionKind::Body, columns, rows, Rc::downgrade(&context));
        Table {
            context,
            implicit: Some(implicit),
            header: None,
            body: None,
            footer: None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.implicit.is_some()
    }

    /// Table-wide store shared by all sections
    pub fn context(&self) -> &TableContext {
        &self.context
    }

    fn new_section(&self, kind: SectionKind, columns: usize, rows: usize) -> Section {
        Section::new(kind, columns, rows, Rc::downgrade(&self.context))
    }

    /// Replace the header section with a fresh `columns × rows` grid
    pub fn set_header(&mut self, columns: usize, rows: usize) -> &mut Section {
        let section = self.new_section(SectionKind::Header, columns, rows);
        self.header.insert(section)
    }

    /// Replace the body section with a fresh `columns × rows` grid
    pub fn set_body(&mut self, columns: usize, rows: usize) -> &mut Section {
        let section = self.new_section(SectionKind::Body, columns, rows);
        self.body.insert(section)
    }

    /// Replace the footer section with a fresh `columns × rows` grid
    pub fn set_footer(&mut self, columns: usize, rows: usize) -> &mut Section {
        let section = self.new_section(SectionKind::Footer, columns, rows);
        self.footer.insert(section)
    }

    pub fn header(&mut self) -> Option<&mut Section> {
        self.header.as_mut()
    }

    pub fn body(&mut self) -> Option<&mut Section> {
        self.body.as_mut()
    }

    pub fn footer(&mut self) -> Option<&mut Section> {
        self.footer.as_mut()
    }

    /// The implicit grid of a collapsed table
    pub fn section(&mut self) -> Option<&mut Section> {
        self.implicit.as_mut()
    }

    /// Map onto the implicit grid of a collapsed table.
    ///
    /// A full table has no grid of its own; only the table-scope attributes of
    /// `mapping` are registered.
    pub fn map(&mut self, selector: &str, mapping: Mapping) {
        match self.implicit.as_mut() {
            Some(section) => section.map(selector, mapping),
            None => {
                if let Some(attributes) = mapping.scope(Scope::Table) {
                    self.context.append_attributes(attributes);
                }
            }
        }
    }

    /// Append a table-scope attribute callback
    pub fn attribute<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        let mapping = Mapping::new().table_attr(name, f);
        if let Some(attributes) = mapping.scope(Scope::Table) {
            self.context.append_attributes(attributes);
        }
    }

    /// Shortcut for `table.section().cell(column, row)` on collapsed tables
    pub fn cell(&mut self, column: usize, row: usize) -> Option<&mut Cell> {
        self.implicit
            .as_mut()
            .map(|section| section.cell(column, row))
    }

    /// Stream the markup of the whole table into `out`
    pub fn render_to<W: fmt::Write>(&mut self, out: &mut W, options: &RenderOptions) -> fmt::Result {
        let attributes = fold_attributes(
            Element::Table(&self.context),
            &self.context.attribute_chains(),
            AttributeValues::new(),
        );
        write!(
            out,
            "<table{}>{}",
            render_attributes(&attributes),
            options.newline
        )?;

        if let Some(section) = self.implicit.as_mut() {
            section.render_rows(out, options, 1)?;
        } else {
            for section in [&mut self.header, &mut self.body, &mut self.footer]
                .into_iter()
                .flatten()
            {
                section.render_to(out, options)?;
            }
        }

        write!(out, "</table>{}", options.newline)
    }

    /// Render with default options
    pub fn render(&mut self) -> String {
        self.render_with(&RenderOptions::default())
    }

    /// Render with the given options
    pub fn render_with(&mut self, options: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_to(&mut out, options);
        out
    }

    /// Render and write the markup into an IO sink
    pub fn write_to<W: io::Write>(&mut self, mut writer: W, options: &RenderOptions) -> TableResult<()> {
        let mut out = String::new();
        self.render_to(&mut out, options)?;
        writer.write_all(out.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("context", &self.context)
            .field("implicit", &self.implicit)
            .field("header", &self.header)
            .field("body", &self.body)
            .field("footer", &self.footer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapsed_shape() {
        let mut table = Table::collapsed(2, 1);
        table.map("0,0", Mapping::text("a"));
        assert_eq!(
            table.render(),
            "<table>\n\
             \t<tr>\n\
             \t\t<td colspan=\"1\" rowspan=\"1\">a</td>\n\
             \t\t<td colspan=\"1\" rowspan=\"1\">&nbsp;</td>\n\
             \t</tr>\n\
             </table>\n"
        );
    }

    #[test]
    fn test_full_shape() {
        let mut table = Table::full();
        table.set_header(1, 1).map("0,0", Mapping::text("H"));
        table.set_body(1, 1);
        assert_eq!(
            table.render(),
            "<table>\n\
             \t<thead>\n\
             \t\t<tr>\n\
             \t\t\t<th colspan=\"1\" rowspan=\"1\">H</th>\n\
             \t\t</tr>\n\
             \t</thead>\n\
             \t<tbody>\n\
             \t\t<tr>\n\
             \t\t\t<td colspan=\"1\" rowspan=\"1\">&nbsp;</td>\n\
             \t\t</tr>\n\
             \t</tbody>\n\
             </table>\n"
        );
    }

    #[test]
    fn test_sections_render_in_order() {
        let mut table = Table::full();
        table.set_footer(1, 1);
        table.set_body(1, 1);
        table.set_header(1, 1);
        let out = table.render_with(&RenderOptions::compact());

        let head = out.find("<thead>").unwrap();
        let body = out.find("<tbody>").unwrap();
        let foot = out.find("<tfoot>").unwrap();
        assert!(head < body && body < foot);
    }

    #[test]
    fn test_table_attributes_shared_across_sections() {
        let mut table = Table::full();
        table
            .set_header(2, 1)
            .map("0,0", Mapping::new().table_attr("class", |_, _| "grid".to_string()));
        table.set_body(2, 2).map(
            "*,*",
            Mapping::new().table_attr("class", |_, prev| {
                format!("{} striped", prev.unwrap_or_default())
            }),
        );

        let out = table.render_with(&RenderOptions::compact());
        assert!(out.starts_with("<table class=\"grid striped\">"));
    }

    #[test]
    fn test_replacing_section() {
        let mut table = Table::full();
        table.set_body(3, 3).map("*,*", Mapping::text("old"));
        table.set_body(1, 1);
        let out = table.render_with(&RenderOptions::compact());
        assert!(!out.contains("old"));
        assert_eq!(out.matches("<td ").count(), 1);
    }

    #[test]
    fn test_build_factory() {
        assert!(Table::build(TableKind::Collapsed { columns: 2, rows: 2 }).is_collapsed());
        let mut full = Table::build(TableKind::Full);
        assert!(!full.is_collapsed());
        assert!(full.body().is_none());
        assert_eq!(full.render(), "<table>\n</table>\n");
    }

    #[test]
    fn test_table_map_on_full_table() {
        let mut table = Table::full();
        table.map(
            "*,*",
            Mapping::text("ignored").table_attr("id", |_, _| "t".to_string()),
        );
        assert_eq!(table.render(), "<table id=\"t\">\n</table>\n");
    }

    #[test]
    fn test_table_property_through_section() {
        let mut table = Table::collapsed(1, 1);
        if let Some(section) = table.section() {
            section.callback(crate::core::grid::EntityKind::Table, "caption", |_| {
                "Totals".to_string()
            });
        }
        table.attribute("summary", |e, _| e.property("caption").unwrap_or_default());
        let out = table.render_with(&RenderOptions::compact());
        assert!(out.starts_with("<table summary=\"Totals\">"));
    }

    #[test]
    fn test_write_to_io() {
        let mut table = Table::collapsed(1, 1);
        let mut buffer: Vec<u8> = Vec::new();
        table
            .write_to(&mut buffer, &RenderOptions::compact())
            .unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "<table><tr><td colspan=\"1\" rowspan=\"1\">&nbsp;</td></tr></table>"
        );
    }
}
