//! Render map: layered override slots
//!
//! The render map holds one slot per grid coordinate plus the synthetic
//! row-wide, column-wide and section-wide buckets (see [`GridSpace`]). Each
//! slot keeps an ordered content chain and, per attribute name, an ordered
//! chain of attribute callbacks. Mapping calls only ever append.
//!
//! # Folding
//!
//! ```text
//! value_0 = previous (from a lower-priority scope, or nothing)
//! value_n = callback_n(element, value_{n-1})
//! ```
//!
//! Content chains fold the same way with the markup string as accumulator,
//! starting from an empty string. A content callback may return `None` to
//! omit the cell; the next callback then continues from an empty string, and
//! only the final outcome decides whether the cell is written.

use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use super::entity::{Cell, Element};
use super::grid::{GridSpace, Scope};

/// Produces cell markup from the cell and the markup accumulated so far.
/// `None` omits the cell from the output.
pub type ContentFn = Rc<dyn Fn(&Cell, String) -> Option<String>>;

/// Produces an attribute value from the element and the value so far
pub type AttributeFn = Rc<dyn Fn(Element<'_>, Option<String>) -> String>;

/// Attribute callback chains keyed by attribute name, in registration order
pub type AttributeChains = IndexMap<String, Vec<AttributeFn>>;

/// Folded attribute values, in registration order
pub type AttributeValues = IndexMap<String, String>;

// ============================================================================
// Mapping
// ============================================================================

/// Everything one `map` call registers: an optional content callback and
/// attribute callbacks grouped by scope.
#[derive(Clone, Default)]
pub struct Mapping {
    content: Option<ContentFn>,
    attributes: IndexMap<Scope, IndexMap<String, AttributeFn>>,
}

impl Mapping {
    /// A mapping with no content callback and no attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping whose content callback is `f`
    pub fn content<F>(f: F) -> Self
    where
        F: Fn(&Cell, String) -> String + 'static,
    {
        Self::content_or_skip(move |cell, markup| Some(f(cell, markup)))
    }

    /// A mapping whose content callback may omit the cell by returning `None`.
    ///
    /// An omitted cell writes no element and its span covers nothing.
    pub fn content_or_skip<F>(f: F) -> Self
    where
        F: Fn(&Cell, String) -> Option<String> + 'static,
    {
        Mapping {
            content: Some(Rc::new(f)),
            attributes: IndexMap::new(),
        }
    }

    /// A mapping that omits every cell it is applied to
    pub fn skip() -> Self {
        Self::content_or_skip(|_, _| None)
    }

    /// A mapping that replaces the cell markup with fixed text
    pub fn text(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        Self::content(move |_, _| markup.clone())
    }

    /// Replace the content callback; `None` registers no content
    pub fn with_content(mut self, content: Option<ContentFn>) -> Self {
        self.content = content;
        self
    }

    /// Add an attribute callback for `name` at `scope`.
    ///
    /// One callback per scope and name; a second call for the same pair
    /// replaces the first within this mapping.
    pub fn attribute<F>(mut self, scope: Scope, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attributes
            .entry(scope)
            .or_default()
            .insert(name.into(), Rc::new(f));
        self
    }

    pub fn cell_attr<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attribute(Scope::Cell, name, f)
    }

    pub fn row_attr<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attribute(Scope::Row, name, f)
    }

    pub fn column_attr<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attribute(Scope::Column, name, f)
    }

    pub fn section_attr<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attribute(Scope::Section, name, f)
    }

    pub fn table_attr<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        self.attribute(Scope::Table, name, f)
    }

    pub fn content_callback(&self) -> Option<&ContentFn> {
        self.content.as_ref()
    }

    /// Attribute callbacks registered for `scope`
    pub fn scope(&self, scope: Scope) -> Option<&IndexMap<String, AttributeFn>> {
        self.attributes.get(&scope)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes: Vec<_> = self
            .attributes
            .iter()
            .map(|(scope, names)| (scope, names.keys().collect::<Vec<_>>()))
            .collect();
        f.debug_struct("Mapping")
            .field("content", &self.content.is_some())
            .field("attributes", &scopes)
            .finish()
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Content state of a slot
#[derive(Clone)]
pub enum ContentChain {
    /// Callbacks to fold; an empty chain renders the placeholder
    Chain(Vec<ContentFn>),
    /// Covered by a spanning cell during the current render pass
    Suppressed,
}

/// Overrides registered at one render-map coordinate
#[derive(Clone)]
pub struct Slot {
    content: ContentChain,
    attributes: AttributeChains,
}

impl Slot {
    fn new() -> Self {
        Slot {
            content: ContentChain::Chain(Vec::new()),
            attributes: IndexMap::new(),
        }
    }

    pub fn content(&self) -> &ContentChain {
        &self.content
    }

    pub fn attributes(&self) -> &AttributeChains {
        &self.attributes
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self.content, ContentChain::Suppressed)
    }

    /// Number of content callbacks (zero when suppressed)
    pub fn content_len(&self) -> usize {
        match &self.content {
            ContentChain::Chain(chain) => chain.len(),
            ContentChain::Suppressed => 0,
        }
    }

    /// Number of attribute callbacks registered for `name`
    pub fn attribute_len(&self, name: &str) -> usize {
        self.attributes.get(name).map_or(0, Vec::len)
    }

    fn push_content(&mut self, callback: &ContentFn) {
        // A mapping after a render pass starts a fresh chain.
        if self.is_suppressed() {
            self.content = ContentChain::Chain(Vec::new());
        }
        if let ContentChain::Chain(chain) = &mut self.content {
            chain.push(Rc::clone(callback));
        }
    }

    fn append_attributes(&mut self, callbacks: &IndexMap<String, AttributeFn>) {
        for (name, callback) in callbacks {
            self.attributes
                .entry(name.clone())
                .or_default()
                .push(Rc::clone(callback));
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Slot");
        match &self.content {
            ContentChain::Chain(chain) => s.field("content", &chain.len()),
            ContentChain::Suppressed => s.field("content", &"suppressed"),
        };
        s.field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Render map
// ============================================================================

/// All override slots of one section
#[derive(Debug, Clone)]
pub struct RenderMap {
    grid: GridSpace,
    slots: Vec<Slot>,
}

impl RenderMap {
    /// Create a fully allocated map with every chain empty
    pub fn new(grid: GridSpace) -> Self {
        RenderMap {
            grid,
            slots: (0..grid.slot_count()).map(|_| Slot::new()).collect(),
        }
    }

    pub fn grid(&self) -> GridSpace {
        self.grid
    }

    pub fn slot(&self, column: usize, row: usize) -> Option<&Slot> {
        let i = self.grid.offset(column, row)?;
        Some(&self.slots[i])
    }

    fn slot_mut(&mut self, column: usize, row: usize) -> Option<&mut Slot> {
        let i = self.grid.offset(column, row)?;
        Some(&mut self.slots[i])
    }

    /// Overrides that apply to the whole row `row`
    pub fn row_slot(&self, row: usize) -> Option<&Slot> {
        self.slot(self.grid.row_bucket(), row)
    }

    /// Overrides that apply to the whole column `column`
    pub fn column_slot(&self, column: usize) -> Option<&Slot> {
        self.slot(column, self.grid.column_bucket())
    }

    /// Overrides that apply to the whole section
    pub fn section_slot(&self) -> &Slot {
        let i = self.slots.len() - 1;
        &self.slots[i]
    }

    pub fn is_suppressed(&self, column: usize, row: usize) -> bool {
        self.slot(column, row).is_some_and(Slot::is_suppressed)
    }

    /// Mark a coordinate as covered so the grid walk skips it
    pub fn suppress(&mut self, column: usize, row: usize) {
        if let Some(slot) = self.slot_mut(column, row) {
            slot.content = ContentChain::Suppressed;
        }
    }

    /// Append `mapping` to every `(column, row)` of the cross product.
    ///
    /// Cell-scope attributes go to each coordinate. Row-scope attributes are
    /// appended once per row and column-scope attributes once per column.
    /// Section-scope attributes land in the section bucket. Table-scope
    /// attributes are not stored here.
    pub fn assign(&mut self, columns: &IndexSet<usize>, rows: &IndexSet<usize>, mapping: &Mapping) {
        let row_bucket = self.grid.row_bucket();
        let column_bucket = self.grid.column_bucket();

        let cell_attrs = mapping.scope(Scope::Cell);
        let row_attrs = mapping.scope(Scope::Row);
        let column_attrs = mapping.scope(Scope::Column);
        let mut rows_applied = false;

        for &x in columns {
            for &y in rows {
                if let Some(slot) = self.slot_mut(x, y) {
                    if let Some(content) = mapping.content_callback() {
                        slot.push_content(content);
                    }
                    if let Some(attrs) = cell_attrs {
                        slot.append_attributes(attrs);
                    }
                }

                if !rows_applied {
                    if let (Some(attrs), Some(slot)) = (row_attrs, self.slot_mut(row_bucket, y)) {
                        slot.append_attributes(attrs);
                    }
                }
            }

            // Every row has been visited once by now.
            rows_applied = true;

            if let (Some(attrs), Some(slot)) = (column_attrs, self.slot_mut(x, column_bucket)) {
                slot.append_attributes(attrs);
            }
        }

        if let (Some(attrs), Some(slot)) = (
            mapping.scope(Scope::Section),
            self.slot_mut(row_bucket, column_bucket),
        ) {
            slot.append_attributes(attrs);
        }
    }
}

// ============================================================================
// Folding
// ============================================================================

/// Fold a content chain for `cell`, starting from an empty string.
///
/// Every callback runs. `None` means the last callback omitted the cell.
pub fn fold_content(chain: &[ContentFn], cell: &Cell) -> Option<String> {
    chain.iter().fold(Some(String::new()), |markup, callback| {
        callback(cell, markup.unwrap_or_default())
    })
}

/// Fold attribute chains for `element` on top of `previous`.
///
/// Each attribute's first callback sees the value `previous` holds for that
/// name (if any). Names already present keep their position.
pub fn fold_attributes(
    element: Element<'_>,
    chains: &AttributeChains,
    previous: AttributeValues,
) -> AttributeValues {
    let mut values = previous;

    for (name, callbacks) in chains {
        if callbacks.is_empty() {
            continue;
        }
        let seed = values.get(name).cloned();
        let folded = callbacks
            .iter()
            .fold(seed, |value, callback| Some(callback(element, value)));
        if let Some(value) = folded {
            values.insert(name.clone(), value);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{SectionContext, SectionKind};
    use std::rc::Weak;

    fn attr<F>(f: F) -> AttributeFn
    where
        F: Fn(Element<'_>, Option<String>) -> String + 'static,
    {
        Rc::new(f)
    }

    fn set(indices: &[usize]) -> IndexSet<usize> {
        indices.iter().copied().collect()
    }

    fn class_mapping(scope: Scope) -> Mapping {
        Mapping::new().attribute(scope, "class", |_, prev| prev.unwrap_or_default() + "x")
    }

    #[test]
    fn test_new_map_is_empty() {
        let map = RenderMap::new(GridSpace::new(3, 2));
        for c in 0..=3 {
            for r in 0..=2 {
                let slot = map.slot(c, r).unwrap();
                assert_eq!(slot.content_len(), 0);
                assert!(slot.attributes().is_empty());
                assert!(!slot.is_suppressed());
            }
        }
        assert!(map.slot(4, 0).is_none());
    }

    #[test]
    fn test_assign_content_cross_product() {
        let mut map = RenderMap::new(GridSpace::new(3, 3));
        map.assign(&set(&[0, 2]), &set(&[1]), &Mapping::text("x"));

        assert_eq!(map.slot(0, 1).unwrap().content_len(), 1);
        assert_eq!(map.slot(2, 1).unwrap().content_len(), 1);
        assert_eq!(map.slot(1, 1).unwrap().content_len(), 0);
        assert_eq!(map.slot(0, 0).unwrap().content_len(), 0);
    }

    #[test]
    fn test_assign_without_content_registers_nothing() {
        let mut map = RenderMap::new(GridSpace::new(2, 2));
        map.assign(&set(&[0, 1]), &set(&[0, 1]), &Mapping::new());
        for c in 0..2 {
            for r in 0..2 {
                assert_eq!(map.slot(c, r).unwrap().content_len(), 0);
            }
        }
    }

    #[test]
    fn test_row_attributes_once_per_row() {
        let mut map = RenderMap::new(GridSpace::new(4, 2));
        map.assign(&set(&[0, 1, 2, 3]), &set(&[0, 1]), &class_mapping(Scope::Row));

        assert_eq!(map.row_slot(0).unwrap().attribute_len("class"), 1);
        assert_eq!(map.row_slot(1).unwrap().attribute_len("class"), 1);
    }

    #[test]
    fn test_column_attributes_once_per_column() {
        let mut map = RenderMap::new(GridSpace::new(2, 5));
        map.assign(&set(&[1]), &set(&[0, 1, 2, 3, 4]), &class_mapping(Scope::Column));

        assert_eq!(map.column_slot(1).unwrap().attribute_len("class"), 1);
        assert_eq!(map.column_slot(0).unwrap().attribute_len("class"), 0);
    }

    #[test]
    fn test_section_attributes_and_repeat_growth() {
        let mut map = RenderMap::new(GridSpace::new(2, 2));
        let mapping = class_mapping(Scope::Section);
        map.assign(&set(&[0]), &set(&[0]), &mapping);
        map.assign(&set(&[1]), &set(&[1]), &mapping);

        assert_eq!(map.section_slot().attribute_len("class"), 2);
    }

    #[test]
    fn test_suppress_and_remap() {
        let mut map = RenderMap::new(GridSpace::new(2, 1));
        map.suppress(1, 0);
        assert!(map.is_suppressed(1, 0));

        map.assign(&set(&[1]), &set(&[0]), &Mapping::text("again"));
        assert!(!map.is_suppressed(1, 0));
        assert_eq!(map.slot(1, 0).unwrap().content_len(), 1);
    }

    #[test]
    fn test_with_content_replaces_callback() {
        let replacement: ContentFn = Rc::new(|_: &Cell, markup: String| Some(markup + "y"));
        let mapping = Mapping::text("x").with_content(Some(replacement));
        let mut map = RenderMap::new(GridSpace::new(1, 1));
        map.assign(&set(&[0]), &set(&[0]), &mapping);
        assert_eq!(map.slot(0, 0).unwrap().content_len(), 1);

        let cleared = Mapping::text("x").with_content(None);
        assert!(cleared.content_callback().is_none());
    }

    #[test]
    fn test_skip_registers_content() {
        let mut map = RenderMap::new(GridSpace::new(2, 1));
        map.assign(&set(&[1]), &set(&[0]), &Mapping::skip());
        assert_eq!(map.slot(1, 0).unwrap().content_len(), 1);
        assert!(!map.is_suppressed(1, 0));
    }

    #[test]
    fn test_fold_attributes_threads_previous() {
        let section = SectionContext::new(SectionKind::Body, GridSpace::new(1, 1), Weak::new());

        let mut chains: AttributeChains = IndexMap::new();
        chains.insert(
            "class".to_string(),
            vec![
                attr(|_, prev| prev.unwrap_or_default() + "-b"),
                attr(|_, prev| prev.unwrap_or_default() + "-c"),
            ],
        );

        let mut previous = AttributeValues::new();
        previous.insert("id".to_string(), "t".to_string());
        previous.insert("class".to_string(), "a".to_string());

        let values = fold_attributes(Element::Section(&section), &chains, previous);
        assert_eq!(values.get("class").map(String::as_str), Some("a-b-c"));
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["id", "class"]);
    }
}
