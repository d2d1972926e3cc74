//! Link input parsing and work-list planning

use std::collections::HashSet;

use crate::error::Result;
use crate::types::Link;

/// Separator between links in the input text
pub const LINK_SEPARATOR: &str = ", ";

/// Parse comma-space separated links
///
/// One trailing newline is stripped. Empty input yields no links.
///
/// # Errors
///
/// Returns [`Error::InvalidLink`](crate::Error::InvalidLink) for the first entry
/// shorter than `identifier_length`. This aborts the run before any fetch.
///
/// # Examples
///
/// ```
/// use album_art_dl::planner::parse_links;
///
/// let links = parse_links("https://a.example/AAAAAAAAAAA, https://b.example/BBBBBBBBBBB\n", 11).unwrap();
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[1].identifier(), "BBBBBBBBBBB");
/// ```
pub fn parse_links(text: &str, identifier_length: usize) -> Result<Vec<Link>> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(LINK_SEPARATOR)
        .map(|raw| Link::new(raw, identifier_length))
        .collect()
}

/// Select the links whose identifier is not already on disk
///
/// Input order is preserved. A link repeated in the input is planned once.
pub fn plan(links: &[Link], existing: &HashSet<String>) -> Vec<Link> {
    let mut seen: HashSet<&str> = HashSet::new();
    links
        .iter()
        .filter(|link| !existing.contains(link.identifier()))
        .filter(|link| seen.insert(link.identifier()))
        .cloned()
        .collect()
}
