//! Rendering options

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// One level of indentation
    /// Default: `"\t"`
    pub indent: String,

    /// Line terminator written after every element line
    /// Default: `"\n"`
    pub newline: String,

    /// Markup for cells that have no content callbacks
    /// Default: `"&nbsp;"`
    pub placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            newline: "\n".to_string(),
            placeholder: "&nbsp;".to_string(),
        }
    }
}

impl RenderOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-indented, one element per line
    pub fn pretty() -> Self {
        Self::default()
    }

    /// Everything on one line
    pub fn compact() -> Self {
        Self {
            indent: String::new(),
            newline: String::new(),
            ..Default::default()
        }
    }

    /// Use a different placeholder for empty cells
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub(crate) fn indentation(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}
