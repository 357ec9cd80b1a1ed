//! Depth-first traversal primitives
//!
//! Every extraction pass is a walk over the same immutable tree. These helpers
//! use an explicit stack so pathological nesting cannot overflow the worker
//! thread's stack.

use super::{NodeData, NodeRef};

/// Pre-order depth-first iterator over a node and all of its descendants
pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(node.children());
        // Children were pushed in document order; reverse so the first child pops first
        self.stack[mark..].reverse();
        Some(node)
    }
}

impl<'a> NodeRef<'a> {
    /// Visits this node and every descendant in document order
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants { stack: vec![*self] }
    }

    /// Returns the first node in document order satisfying `predicate`
    pub fn find_first<P>(&self, mut predicate: P) -> Option<NodeRef<'a>>
    where
        P: FnMut(&NodeRef<'a>) -> bool,
    {
        self.descendants().find(|node| predicate(node))
    }

    /// Returns true if any node in this subtree satisfies `predicate`
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&NodeRef<'a>) -> bool,
    {
        self.descendants().any(|node| predicate(&node))
    }

    /// Counts the nodes in this subtree satisfying `predicate`
    pub fn count<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&NodeRef<'a>) -> bool,
    {
        self.descendants().filter(|node| predicate(node)).count()
    }

    /// Concatenated character data of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in self.descendants() {
            if let NodeData::Text(chunk) = node.data() {
                text.push_str(chunk);
            }
        }
        text
    }
}
