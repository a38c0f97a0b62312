//! Lazily evaluated named properties
//!
//! Every entity (table, section, column, row, cell) carries a bag of named
//! text properties. A property is either set explicitly or produced on first
//! access by a registered resolver, after which the result is cached for the
//! lifetime of the entity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fxhash::FxHashMap;

/// Computes a property value from its owning entity
pub type Resolver<T> = Rc<dyn Fn(&T) -> String>;

/// Resolvers keyed by property name, waiting to be copied into new entities
pub type ResolverRegistry<T> = FxHashMap<String, Resolver<T>>;

enum LazyValue<T> {
    /// Not computed yet
    Deferred(Resolver<T>),
    /// Computed or explicitly set
    Resolved(String),
}

/// Property store owned by an entity of type `T`
pub struct Properties<T> {
    entries: RefCell<FxHashMap<String, LazyValue<T>>>,
}

impl<T> Properties<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Properties {
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    /// Create a store seeded with a snapshot of the given resolvers
    pub fn from_registry(registry: &ResolverRegistry<T>) -> Self {
        let entries = registry
            .iter()
            .map(|(name, resolver)| (name.clone(), LazyValue::Deferred(Rc::clone(resolver))))
            .collect();
        Properties {
            entries: RefCell::new(entries),
        }
    }

    /// Read a property, computing and caching it if a resolver is pending.
    ///
    /// Returns `None` when the property was never set and has no resolver.
    pub fn get(&self, owner: &T, name: &str) -> Option<String> {
        let resolver = {
            let entries = self.entries.borrow();
            match entries.get(name)? {
                LazyValue::Resolved(value) => return Some(value.clone()),
                LazyValue::Deferred(resolver) => Rc::clone(resolver),
            }
        };

        // The borrow is released so the resolver may read sibling properties.
        let value = resolver(owner);
        self.entries
            .borrow_mut()
            .insert(name.to_string(), LazyValue::Resolved(value.clone()));
        Some(value)
    }

    /// Set a property explicitly, overriding any resolver
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .borrow_mut()
            .insert(name.into(), LazyValue::Resolved(value.into()));
    }

    /// Register a resolver. A value that is already resolved is kept.
    pub fn register(&self, name: impl Into<String>, resolver: Resolver<T>) {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(name.into())
            .or_insert_with(|| LazyValue::Deferred(Rc::clone(&resolver)));
        if let LazyValue::Deferred(pending) = entry {
            *pending = resolver;
        }
    }

    /// Whether the property currently holds a computed or explicit value
    pub fn is_resolved(&self, name: &str) -> bool {
        matches!(
            self.entries.borrow().get(name),
            Some(LazyValue::Resolved(_))
        )
    }
}

impl<T> Default for Properties<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Properties<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let mut map = f.debug_map();
        for (name, value) in entries.iter() {
            match value {
                LazyValue::Resolved(v) => map.entry(name, v),
                LazyValue::Deferred(_) => map.entry(name, &"<deferred>"),
            };
        }
        map.finish()
    }
}
