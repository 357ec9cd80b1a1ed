//! Parsed document handle
//!
//! This module owns the read-only tree every extraction pass works on:
//! - `Document`: an immutable arena of nodes, `Send + Sync`, shared by `Arc`
//! - `NodeRef`: a cheap borrowed cursor into the arena
//! - Tree walking primitives (see `walker`)
//! - The parse collaborator that turns fetched bytes into a `Document`

mod parser;
mod walker;

pub use parser::{DocumentParser, HtmlDocumentParser, ParseError};
pub use walker::Descendants;

/// Index of a node inside its `Document`
pub type NodeId = usize;

/// The payload of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The synthetic root of the tree
    Document,

    /// A `<!DOCTYPE ...>` declaration
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },

    /// An element with its lower-case local name and attributes in source order
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },

    /// A run of character data
    Text(String),

    /// An HTML comment
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable parsed markup tree
///
/// Nodes are stored in document (pre-)order, so the root is always at
/// `Document::ROOT` and a forward scan of the arena visits nodes in the same
/// order as a depth-first walk.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Id of the synthetic document root
    pub const ROOT: NodeId = 0;

    /// Parses an HTML string into a document without any content checks
    ///
    /// # Example
    ///
    /// ```
    /// use webpage_analyzer::document::Document;
    ///
    /// let doc = Document::parse_html("<title>Hi</title><h1>One</h1>");
    /// assert!(doc.root().find_first(|n| n.is_element("h1")).is_some());
    /// ```
    pub fn parse_html(html: &str) -> Self {
        parser::build_document(&scraper::Html::parse_document(html))
    }

    /// Returns a cursor to the root node
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: Self::ROOT,
        }
    }

    /// Returns a cursor to the node with the given id, if it exists
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.nodes.len()).then_some(NodeRef { doc: self, id })
    }

    /// Number of nodes in the tree, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Incrementally assembles a `Document`
#[derive(Debug)]
pub(crate) struct DocumentBuilder {
    nodes: Vec<Node>,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends `data` as the last child of `parent` and returns its id
    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn finish(self) -> Document {
        Document { nodes: self.nodes }
    }
}

/// A borrowed cursor to one node of a `Document`
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.id].data
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.nodes[self.id].parent.map(|id| NodeRef { doc: self.doc, id })
    }

    /// Iterates over the direct children in document order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.nodes[self.id]
            .children
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    /// The lower-case tag name if this node is an element
    pub fn element_name(&self) -> Option<&'a str> {
        match self.data() {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns true if this is an element whose tag name matches `name`
    /// case-insensitively
    pub fn is_element(&self, name: &str) -> bool {
        self.element_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    /// Attributes of an element in source order; empty for other node kinds
    pub fn attrs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let attrs: &'a [(String, String)] = match self.data() {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        };
        attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the first attribute whose name matches case-insensitively
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data(), NodeData::Text(_))
    }
}
