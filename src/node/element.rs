//! Element type - composite nodes of the description tree
//!
//! The core building block of a description. Built once per render pass and
//! never mutated afterwards.

use compact_str::CompactString;

use crate::attr::{PropKey, PropValue, Props, PropsExt};

use super::{Children, IntoChild, Node};

/// Element tag name.
pub type Tag = CompactString;

// =============================================================================
// Element
// =============================================================================

/// Composite node with a tag, ordered properties and positional child slots
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name; empty means the description is malformed
    pub tag: Tag,
    /// Properties, assigned directly onto the live node
    pub props: Props,
    /// Child slots; `None` marks an absent child
    pub children: Children,
}

impl Element {
    /// Create an element without props or children
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace all props. Later duplicates of a key overwrite earlier ones.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Props::with_capacity(props.len());
        for (name, value) in props {
            self.props.set_prop(name, value);
        }
        self
    }

    /// Set a single prop
    pub fn prop(mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        self.props.set_prop(name, value);
        self
    }

    /// Append a child slot (node, primitive or `Option` of either)
    pub fn child(mut self, child: impl IntoChild) -> Self {
        self.children.push(child.into_child());
        self
    }

    /// Append several child slots
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoChild,
    {
        self.children
            .extend(children.into_iter().map(IntoChild::into_child));
        self
    }

    /// Append a string leaf
    pub fn text(self, content: impl Into<CompactString>) -> Self {
        self.child(super::Text::new(content))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether the tag is present
    #[inline]
    pub fn has_tag(&self) -> bool {
        !self.tag.is_empty()
    }

    /// Get property value by name
    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get_prop(name)
    }

    /// Get the child description at a slot, if present
    pub fn slot(&self, index: usize) -> Option<&Node> {
        self.children.get(index).and_then(Option::as_ref)
    }

    /// Number of child slots, absent ones included
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if element has no child slots
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated content of all descendant leaves, in document order
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().flatten().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(t) => buf.push_str(&t.content()),
                Node::Element(e) => stack.extend(e.children.iter().rev().flatten()),
            }
        }
        buf
    }
}

// Descriptions may be arbitrarily deep; unlink children iteratively so that
// dropping a tree never recurses per level.
impl Drop for Element {
    fn drop(&mut self) {
        let mut stack: Vec<Node> = self.children.drain(..).flatten().collect();
        while let Some(node) = stack.pop() {
            if let Node::Element(mut elem) = node {
                stack.extend(elem.children.drain(..).flatten());
            }
        }
    }
}
