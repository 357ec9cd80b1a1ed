//! Parse collaborator: fetched bytes to `Document`
//!
//! The markup itself is handled by `scraper` (html5ever underneath), which
//! repairs malformed input the way browsers do. Its tree is not `Sync`, so the
//! result is copied into the owned arena that extraction passes share across
//! worker threads.

use super::{Document, DocumentBuilder, NodeData, NodeId};
use scraper::Html;
use thiserror::Error;

/// Number of leading bytes inspected when sniffing for binary content
const SNIFF_LEN: usize = 1024;

/// Errors produced when content cannot become a document tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,

    #[error("content is not markup (binary data detected)")]
    Binary,
}

/// Turns raw response bytes into a document tree
pub trait DocumentParser: Send + Sync {
    fn parse(&self, content: &[u8]) -> Result<Document, ParseError>;
}

/// `DocumentParser` backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentParser;

impl HtmlDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for HtmlDocumentParser {
    /// Parses `content` as HTML
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected. Content that
    /// is blank, or that carries NUL bytes near the start, is refused.
    fn parse(&self, content: &[u8]) -> Result<Document, ParseError> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::Empty);
        }

        if content.iter().take(SNIFF_LEN).any(|&b| b == 0) {
            return Err(ParseError::Binary);
        }

        let text = String::from_utf8_lossy(content);
        let html = Html::parse_document(&text);
        if !html.errors.is_empty() {
            tracing::trace!("Parser recovered from {} markup errors", html.errors.len());
        }

        Ok(build_document(&html))
    }
}

/// Copies a scraper tree into an owned `Document`
pub(super) fn build_document(html: &Html) -> Document {
    let mut builder = DocumentBuilder::new();

    // (source node, parent in the new arena); popped in document order
    let mut stack: Vec<_> = html
        .tree
        .root()
        .children()
        .map(|child| (child, Document::ROOT))
        .collect();
    stack.reverse();

    while let Some((source, parent)) = stack.pop() {
        let data = match source.value() {
            scraper::Node::Doctype(doctype) => NodeData::Doctype {
                name: doctype.name().to_string(),
                public_id: doctype.public_id().to_string(),
                system_id: doctype.system_id().to_string(),
            },
            scraper::Node::Element(element) => NodeData::Element {
                name: element.name().to_ascii_lowercase(),
                attrs: element
                    .attrs()
                    .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
                    .collect(),
            },
            scraper::Node::Text(text) => NodeData::Text(String::from(&**text)),
            scraper::Node::Comment(comment) => NodeData::Comment(String::from(&**comment)),
            _ => continue,
        };

        let id: NodeId = builder.append(parent, data);
        let mark = stack.len();
        stack.extend(source.children().map(|child| (child, id)));
        stack[mark..].reverse();
    }

    builder.finish()
}
