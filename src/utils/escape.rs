//! Markup escaping

use std::borrow::Cow;

use crate::data::entities::entity_for;

/// Replace every character that has an HTML entity with that entity.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use matrix_tables::utils::escape::html_entities;
///
/// assert_eq!(html_entities("plain"), "plain");
/// assert_eq!(html_entities("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// assert_eq!(html_entities("café"), "caf&eacute;");
/// ```
pub fn html_entities(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| entity_for(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match entity_for(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}
