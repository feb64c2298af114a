//! In-memory host rendering surface
//!
//! An arena of live nodes addressed by copyable [`NodeId`] handles. Every
//! mutating capability call is recorded in a journal, which makes "nothing
//! happened" observable in tests. Detached nodes stay in the arena.

use std::fmt;

use compact_str::CompactString;
use thiserror::Error;

use crate::attr::{PropValue, Props, PropsExt};
use crate::node::{Tag, Text};

use super::{Host, LiveChildren};

// =============================================================================
// NodeId / HostError
// =============================================================================

/// Handle to a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Get the raw arena index
    #[inline]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability failures of a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Handle does not belong to this host
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Operation needs an element but got a text or placeholder node
    #[error("`{0}` is only supported on element nodes")]
    NotAnElement(&'static str),

    /// Operation needs a parent but the node is detached
    #[error("node {0} has no parent")]
    Detached(NodeId),

    /// Property name is empty or contains whitespace
    #[error("invalid property name {0:?}")]
    InvalidProp(CompactString),

    /// No handle left to give out
    #[error("node arena is full")]
    Exhausted,

    /// Appending would make a node its own ancestor
    #[error("cannot append {child} under its own descendant {parent}")]
    Cycle { parent: NodeId, child: NodeId },
}

/// One recorded capability call that changed the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateElement { node: NodeId, tag: Tag },
    CreateText { node: NodeId },
    CreatePlaceholder { node: NodeId },
    SetProp { node: NodeId, name: CompactString },
    RemoveProp { node: NodeId, name: CompactString },
    Append { parent: NodeId, child: NodeId },
    Replace { old: NodeId, new: NodeId },
    Remove { node: NodeId },
    SetText { node: NodeId },
}

impl Mutation {
    /// Check if this records node creation
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Self::CreateElement { .. } | Self::CreateText { .. } | Self::CreatePlaceholder { .. }
        )
    }
}

// =============================================================================
// MemoryHost
// =============================================================================

#[derive(Debug, Clone)]
enum Kind {
    Element { tag: Tag, props: Props },
    Text(CompactString),
    Placeholder,
}

#[derive(Debug, Clone)]
struct Data {
    kind: Kind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed host with a mutation journal
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<Data>,
    journal: Vec<Mutation>,
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was ever created
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Journal
    // ─────────────────────────────────────────────────────────────────────────

    /// Mutations recorded since the last `take_journal`
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Drain the journal
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Tag of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).ok()?.kind {
            Kind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Properties of an element node
    pub fn props(&self, id: NodeId) -> Option<&Props> {
        match &self.data(id).ok()?.kind {
            Kind::Element { props, .. } => Some(props),
            _ => None,
        }
    }

    /// Single property of an element node
    pub fn prop(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        self.props(id)?.get_prop(name)
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).ok()?.kind {
            Kind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if a node is a placeholder
    pub fn is_placeholder(&self, id: NodeId) -> bool {
        self.data(id)
            .is_ok_and(|d| matches!(d.kind, Kind::Placeholder))
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).ok()?.parent
    }

    /// Children of a node
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// Concatenated descendant text, in document order
    pub fn text_content(&self, id: NodeId) -> String {
        let mut buf = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Ok(data) = self.data(id) else { continue };
            if let Kind::Text(s) = &data.kind {
                buf.push_str(s);
            }
            stack.extend(data.children.iter().rev());
        }
        buf
    }

    /// Serialize a subtree to HTML-like markup.
    ///
    /// Callback props are skipped, `true` booleans render bare, `false` ones
    /// are omitted, placeholders render as `<!---->`.
    pub fn outer_html(&self, id: NodeId) -> String {
        enum Visit {
            Open(NodeId),
            Close(NodeId),
        }

        let mut output = String::new();
        let mut stack = vec![Visit::Open(id)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Open(id) => {
                    let Ok(data) = self.data(id) else { continue };
                    match &data.kind {
                        Kind::Text(s) => output.push_str(&escape_html(s)),
                        Kind::Placeholder => output.push_str("<!---->"),
                        Kind::Element { tag, props } => {
                            output.push('<');
                            output.push_str(tag);
                            render_props(props, &mut output);
                            output.push('>');
                            stack.push(Visit::Close(id));
                            stack.extend(data.children.iter().rev().map(|c| Visit::Open(*c)));
                        }
                    }
                }
                Visit::Close(id) => {
                    if let Some(tag) = self.tag(id) {
                        output.push_str("</");
                        output.push_str(tag);
                        output.push('>');
                    }
                }
            }
        }
        output
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn data(&self, id: NodeId) -> Result<&Data, HostError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(HostError::UnknownNode(id))
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut Data, HostError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(HostError::UnknownNode(id))
    }

    fn alloc(&mut self, kind: Kind) -> Result<NodeId, HostError> {
        let id = next_id(self.nodes.len())?;
        self.nodes.push(Data {
            kind,
            parent: None,
            children: Vec::new(),
        });
        Ok(id)
    }

    fn element_props_mut(&mut self, id: NodeId, op: &'static str) -> Result<&mut Props, HostError> {
        match &mut self.data_mut(id)?.kind {
            Kind::Element { props, .. } => Ok(props),
            _ => Err(HostError::NotAnElement(op)),
        }
    }

    /// Unlink a node from its parent, returning the slot it occupied.
    fn detach(&mut self, id: NodeId) -> Result<Option<(NodeId, usize)>, HostError> {
        let Some(parent) = self.data_mut(id)?.parent.take() else {
            return Ok(None);
        };
        let siblings = &mut self.data_mut(parent)?.children;
        let pos = siblings.iter().position(|c| *c == id);
        if let Some(pos) = pos {
            siblings.remove(pos);
        }
        Ok(pos.map(|pos| (parent, pos)))
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> Result<bool, HostError> {
        loop {
            if id == ancestor {
                return Ok(true);
            }
            match self.data(id)?.parent {
                Some(parent) => id = parent,
                None => return Ok(false),
            }
        }
    }
}

impl Host for MemoryHost {
    type Node = NodeId;
    type Error = HostError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        let tag = Tag::from(tag);
        let node = self.alloc(Kind::Element {
            tag: tag.clone(),
            props: Props::new(),
        })?;
        self.journal.push(Mutation::CreateElement { node, tag });
        Ok(node)
    }

    fn create_text(&mut self, text: &Text) -> Result<NodeId, HostError> {
        let node = self.alloc(Kind::Text(text.content()))?;
        self.journal.push(Mutation::CreateText { node });
        Ok(node)
    }

    fn create_placeholder(&mut self) -> Result<NodeId, HostError> {
        let node = self.alloc(Kind::Placeholder)?;
        self.journal.push(Mutation::CreatePlaceholder { node });
        Ok(node)
    }

    fn set_prop(&mut self, node: &NodeId, name: &str, value: &PropValue) -> Result<(), HostError> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(HostError::InvalidProp(name.into()));
        }
        self.element_props_mut(*node, "setProperty")?
            .set_prop(name, value.clone());
        self.journal.push(Mutation::SetProp {
            node: *node,
            name: name.into(),
        });
        Ok(())
    }

    fn remove_prop(&mut self, node: &NodeId, name: &str) -> Result<(), HostError> {
        self.element_props_mut(*node, "removeAttribute")?
            .remove_prop(name);
        self.journal.push(Mutation::RemoveProp {
            node: *node,
            name: name.into(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        if !matches!(self.data(*parent)?.kind, Kind::Element { .. }) {
            return Err(HostError::NotAnElement("appendChild"));
        }
        // A childless node can only be its own ancestor.
        let has_children = !self.data(*child)?.children.is_empty();
        if *child == *parent || (has_children && self.is_ancestor(*child, *parent)?) {
            return Err(HostError::Cycle {
                parent: *parent,
                child: *child,
            });
        }
        self.detach(*child)?;
        self.data_mut(*child)?.parent = Some(*parent);
        self.data_mut(*parent)?.children.push(*child);
        self.journal.push(Mutation::Append {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn replace(&mut self, old: &NodeId, new: &NodeId) -> Result<(), HostError> {
        if old == new {
            return Ok(());
        }
        let Some(parent) = self.data(*old)?.parent else {
            return Err(HostError::Detached(*old));
        };
        if self.is_ancestor(*new, parent)? {
            return Err(HostError::Cycle {
                parent,
                child: *new,
            });
        }
        self.detach(*new)?;
        let Some((parent, pos)) = self.detach(*old)? else {
            return Err(HostError::Detached(*old));
        };
        self.data_mut(*new)?.parent = Some(parent);
        self.data_mut(parent)?.children.insert(pos, *new);
        self.journal.push(Mutation::Replace {
            old: *old,
            new: *new,
        });
        Ok(())
    }

    fn remove(&mut self, node: &NodeId) -> Result<(), HostError> {
        if self.detach(*node)?.is_none() {
            return Err(HostError::Detached(*node));
        }
        self.journal.push(Mutation::Remove { node: *node });
        Ok(())
    }

    fn children(&self, node: &NodeId) -> Result<LiveChildren<NodeId>, HostError> {
        Ok(self.data(*node)?.children.iter().copied().collect())
    }

    fn set_text(&mut self, node: &NodeId, text: &Text) -> Result<(), HostError> {
        let content = text.content();
        let is_text = match self.data(*node)?.kind {
            Kind::Text(_) => true,
            Kind::Element { .. } => false,
            Kind::Placeholder => return Err(HostError::NotAnElement("textContent")),
        };
        if is_text {
            self.data_mut(*node)?.kind = Kind::Text(content);
        } else {
            // Like `textContent`: children collapse into one text node.
            let old = std::mem::take(&mut self.data_mut(*node)?.children);
            for child in old {
                self.data_mut(child)?.parent = None;
                self.journal.push(Mutation::Remove { node: child });
            }
            let child = self.alloc(Kind::Text(content))?;
            self.journal.push(Mutation::CreateText { node: child });
            self.data_mut(child)?.parent = Some(*node);
            self.data_mut(*node)?.children.push(child);
            self.journal.push(Mutation::Append {
                parent: *node,
                child,
            });
        }
        self.journal.push(Mutation::SetText { node: *node });
        Ok(())
    }
}

/// Handle for the arena slot at `index`.
fn next_id(index: usize) -> Result<NodeId, HostError> {
    u32::try_from(index)
        .map(NodeId)
        .map_err(|_| HostError::Exhausted)
}

// =============================================================================
// Markup helpers
// =============================================================================

fn render_props(props: &Props, output: &mut String) {
    for (name, value) in props {
        match value {
            PropValue::Callback(_) | PropValue::Bool(false) => continue,
            PropValue::Bool(true) => {
                output.push(' ');
                output.push_str(name);
            }
            PropValue::Str(_) | PropValue::Num(_) => {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&escape_attr(&value.to_string()));
                output.push('"');
            }
        }
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Text {
        Text::new(s)
    }

    #[test]
    fn test_build_and_serialize() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        let t = host.create_text(&text("a < b")).unwrap();
        let gap = host.create_placeholder().unwrap();
        host.set_prop(&div, "id", &PropValue::from("x")).unwrap();
        host.set_prop(&div, "hidden", &PropValue::from(true)).unwrap();
        host.set_prop(&div, "onclick", &PropValue::from(crate::attr::Callback::new(|_| {}))).unwrap();
        host.append_child(&div, &t).unwrap();
        host.append_child(&div, &gap).unwrap();

        assert_eq!(host.outer_html(div), r#"<div id="x" hidden>a &lt; b<!----></div>"#);
        assert_eq!(host.text_content(div), "a < b");
        assert_eq!(host.parent(t), Some(div));
        assert!(host.is_placeholder(gap));
        assert_eq!(host.journal().len(), 8);
        assert_eq!(host.journal().iter().filter(|m| m.is_create()).count(), 3);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut host = MemoryHost::new();
        let root = host.create_element("ul").unwrap();
        let items: Vec<_> = (0..3).map(|_| host.create_element("li").unwrap()).collect();
        for item in &items {
            host.append_child(&root, item).unwrap();
        }
        let fresh = host.create_element("p").unwrap();
        host.replace(&items[1], &fresh).unwrap();

        assert_eq!(host.child_ids(root), &[items[0], fresh, items[2]]);
        assert_eq!(host.parent(items[1]), None);
    }

    #[test]
    fn test_remove_and_detached_errors() {
        let mut host = MemoryHost::new();
        let root = host.create_element("div").unwrap();
        let child = host.create_element("span").unwrap();
        host.append_child(&root, &child).unwrap();
        host.remove(&child).unwrap();

        assert!(host.child_ids(root).is_empty());
        assert_eq!(host.remove(&child), Err(HostError::Detached(child)));
        assert_eq!(host.replace(&root, &child), Err(HostError::Detached(root)));
    }

    #[test]
    fn test_append_moves_and_rejects_cycles() {
        let mut host = MemoryHost::new();
        let a = host.create_element("div").unwrap();
        let b = host.create_element("div").unwrap();
        let c = host.create_element("span").unwrap();
        host.append_child(&a, &c).unwrap();
        host.append_child(&b, &c).unwrap();
        assert!(host.child_ids(a).is_empty());
        assert_eq!(host.child_ids(b), &[c]);

        host.append_child(&a, &b).unwrap();
        assert_eq!(host.append_child(&b, &a), Err(HostError::Cycle { parent: b, child: a }));
    }

    #[test]
    fn test_capability_errors() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        let t = host.create_text(&text("x")).unwrap();

        assert_eq!(host.append_child(&t, &div), Err(HostError::NotAnElement("appendChild")));
        assert_eq!(
            host.set_prop(&div, "bad name", &PropValue::from(1)),
            Err(HostError::InvalidProp("bad name".into()))
        );
        assert_eq!(
            host.set_prop(&t, "id", &PropValue::from("x")),
            Err(HostError::NotAnElement("setProperty"))
        );
        let ghost = NodeId(99);
        assert_eq!(host.children(&ghost), Err(HostError::UnknownNode(ghost)));
    }

    #[test]
    fn test_handles_stop_at_u32() {
        assert_eq!(next_id(7), Ok(NodeId(7)));
        assert_eq!(next_id(u32::MAX as usize), Ok(NodeId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(next_id(u32::MAX as usize + 1), Err(HostError::Exhausted));
    }

    #[test]
    fn test_set_text() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        let span = host.create_element("span").unwrap();
        host.append_child(&div, &span).unwrap();

        host.take_journal();
        host.set_text(&div, &Text::num(3.0)).unwrap();
        assert_eq!(host.outer_html(div), "<div>3</div>");
        assert_eq!(host.parent(span), None);

        let t = host.child_ids(div)[0];
        assert_eq!(
            host.take_journal(),
            vec![
                Mutation::Remove { node: span },
                Mutation::CreateText { node: t },
                Mutation::Append { parent: div, child: t },
                Mutation::SetText { node: div },
            ]
        );

        host.set_text(&t, &text("4")).unwrap();
        assert_eq!(host.text(t), Some("4"));
    }
}
