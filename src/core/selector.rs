//! Selection expression parsing
//!
//! A selection expression picks indices along one grid dimension. It is a
//! `;`-separated list of tokens, each of which is one of:
//!
//! - `*`: every index
//! - `first` / `last`
//! - `odd`: positions 0, 2, 4, ... (the 1st, 3rd, ... entries)
//! - `even`: positions 1, 3, 5, ...
//! - `N`: a single index, ignored when out of range
//! - `A-B`: an inclusive range, clamped into the dimension
//!
//! Tokens that match none of these are skipped without complaint, so callers
//! can mix valid and exploratory selectors freely.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INDEX_TOKEN: Regex = Regex::new(r"^(\d+)$").unwrap();
    static ref RANGE_TOKEN: Regex = Regex::new(r"^(\d+)-(\d+)$").unwrap();
}

/// Resolve a selection expression against a dimension whose largest valid
/// index is `max`.
///
/// The result is deduplicated and keeps first-seen order.
///
/// # Examples
///
/// ```
/// use matrix_tables::core::selector::resolve;
///
/// let picked: Vec<usize> = resolve(5, "2-8").into_iter().collect();
/// assert_eq!(picked, vec![2, 3, 4, 5]);
/// assert!(resolve(5, "7").is_empty());
/// ```
pub fn resolve(max: usize, expression: &str) -> IndexSet<usize> {
    let mut selected = IndexSet::new();

    for token in expression.split(';') {
        match resolve_token(max, token.trim()) {
            Some(indices) => selected.extend(indices),
            None => log::debug!("[selector] ignoring token {:?}", token),
        }
    }

    selected
}

/// Resolve a single token. `None` means the token is malformed.
fn resolve_token(max: usize, token: &str) -> Option<Vec<usize>> {
    let indices = match token {
        "*" => (0..=max).collect(),
        "first" => vec![0],
        "last" => vec![max],
        "odd" => (0..=max).step_by(2).collect(),
        "even" => (1..=max).step_by(2).collect(),
        _ => {
            if let Some(caps) = RANGE_TOKEN.captures(token) {
                let start = parse_bound(&caps[1]);
                let stop = parse_bound(&caps[2]);
                let start = start.min(max);
                let stop = stop.clamp(start, max);
                (start..=stop).collect()
            } else if INDEX_TOKEN.is_match(token) {
                let index = parse_bound(token);
                if index <= max {
                    vec![index]
                } else {
                    Vec::new()
                }
            } else {
                return None;
            }
        }
    };

    Some(indices)
}

/// Digits that overflow `usize` saturate, which the caller clamps anyway
fn parse_bound(digits: &str) -> usize {
    digits.parse().unwrap_or(usize::MAX)
}
