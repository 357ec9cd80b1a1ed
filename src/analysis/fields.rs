//! Single-purpose field extractors: HTML version, title, heading histogram

use crate::document::{Document, NodeData};
use std::collections::BTreeMap;

/// Version reported when there is no doctype or it carries no identifiers
pub const IMPLIED_HTML5: &str = "HTML5 (implied)";

const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Derives the HTML version from the first doctype in the document
pub fn html_version(doc: &Document) -> String {
    doc.root()
        .descendants()
        .find_map(|node| match node.data() {
            NodeData::Doctype {
                public_id,
                system_id,
                ..
            } => Some(classify_doctype(public_id, system_id)),
            _ => None,
        })
        .unwrap_or_else(|| IMPLIED_HTML5.to_string())
}

/// Maps doctype identifiers to a version label
///
/// The public identifier is consulted first, falling back to the system
/// identifier. Identifiers that match no known family are returned verbatim.
///
/// # Examples
///
/// ```
/// use webpage_analyzer::analysis::classify_doctype;
///
/// assert_eq!(classify_doctype("", ""), "HTML5 (implied)");
/// assert_eq!(classify_doctype("-//W3C//DTD HTML 4.01//EN", ""), "HTML4");
/// assert_eq!(classify_doctype("-//W3C//DTD XHTML 1.0 Strict//EN", ""), "XHTML");
/// assert_eq!(classify_doctype("", "about:legacy-compat"), "about:legacy-compat");
/// ```
pub fn classify_doctype(public_id: &str, system_id: &str) -> String {
    let identifier = if public_id.is_empty() { system_id } else { public_id };
    if identifier.is_empty() {
        return IMPLIED_HTML5.to_string();
    }

    let lower = identifier.to_lowercase();
    if lower.contains("html5") || lower.contains("html 5") {
        "HTML5".to_string()
    } else if lower.contains("html4") || lower.contains("html 4") {
        "HTML4".to_string()
    } else if lower.contains("xhtml") {
        "XHTML".to_string()
    } else {
        identifier.to_string()
    }
}

/// Trimmed text of the first `<title>` element, or an empty string
pub fn page_title(doc: &Document) -> String {
    doc.root()
        .find_first(|n| n.is_element("title"))
        .map(|title| title.text_content().trim().to_string())
        .unwrap_or_default()
}

/// Counts `h1`..`h6` elements by lower-case tag name
///
/// Levels that never occur are absent rather than present with zero.
pub fn heading_histogram(doc: &Document) -> BTreeMap<String, usize> {
    let mut headings = BTreeMap::new();
    for node in doc.root().descendants() {
        if let Some(name) = node.element_name() {
            let name = name.to_ascii_lowercase();
            if HEADING_LEVELS.contains(&name.as_str()) {
                *headings.entry(name).or_insert(0) += 1;
            }
        }
    }
    headings
}
