//! Grid coordinate space
//!
//! A section is a `columns × rows` grid. One extra index past the end of each
//! dimension is reserved as a bucket: column index `columns` addresses a whole
//! row, row index `rows` addresses a whole column, and the corner
//! `(columns, rows)` addresses the whole section.

/// Where an attribute mapping lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The individual cell element
    Cell,
    /// The `<tr>` wrapping the cell
    Row,
    /// Every cell in the cell's column
    Column,
    /// The section wrapper (`<thead>`, `<tbody>`, `<tfoot>`)
    Section,
    /// The `<table>` element, shared by all sections
    Table,
}

/// Kind of entity a property resolver is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Table,
    Section,
    Column,
    Row,
    Cell,
}

/// Logical dimensions of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpace {
    columns: usize,
    rows: usize,
}

impl GridSpace {
    /// Create a grid, coercing zero-sized dimensions to 1
    pub fn new(columns: usize, rows: usize) -> Self {
        GridSpace {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Largest real column index
    pub fn max_column(&self) -> usize {
        self.columns - 1
    }

    /// Largest real row index
    pub fn max_row(&self) -> usize {
        self.rows - 1
    }

    /// Synthetic column index used for row-wide slots
    pub fn row_bucket(&self) -> usize {
        self.columns
    }

    /// Synthetic row index used for column-wide slots
    pub fn column_bucket(&self) -> usize {
        self.rows
    }

    /// Number of slots including the synthetic buckets
    pub fn slot_count(&self) -> usize {
        (self.columns + 1) * (self.rows + 1)
    }

    /// Flat slot offset for `(column, row)`, buckets included.
    ///
    /// Returns `None` outside `[0, columns] × [0, rows]`.
    pub fn offset(&self, column: usize, row: usize) -> Option<usize> {
        if column > self.columns || row > self.rows {
            return None;
        }
        Some(column * (self.rows + 1) + row)
    }

    /// Clamp the end of a span starting at `start` along the column axis
    pub fn column_span_end(&self, start: usize, span: usize) -> usize {
        self.columns.min(start.saturating_add(span))
    }

    /// Clamp the end of a span starting at `start` along the row axis
    pub fn row_span_end(&self, start: usize, span: usize) -> usize {
        self.rows.min(start.saturating_add(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_coerced() {
        let grid = GridSpace::new(0, 0);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.slot_count(), 4);
    }

    #[test]
    fn test_offsets_cover_buckets() {
        let grid = GridSpace::new(3, 2);
        let mut seen: Vec<usize> = (0..=3)
            .flat_map(|c| (0..=2).map(move |r| (c, r)))
            .map(|(c, r)| grid.offset(c, r).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..grid.slot_count()).collect::<Vec<_>>());
        assert_eq!(grid.offset(4, 0), None);
        assert_eq!(grid.offset(0, 3), None);
    }

    #[test]
    fn test_span_end_clamped() {
        let grid = GridSpace::new(3, 2);
        assert_eq!(grid.column_span_end(1, 5), 3);
        assert_eq!(grid.row_span_end(1, 1), 2);
        assert_eq!(grid.row_span_end(0, usize::MAX), 2);
    }
}
