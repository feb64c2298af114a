//! Node description types.
//!
//! A description is an immutable value tree: `Node` is either an `Element`
//! (tag, props, child slots) or a primitive `Text` leaf. Child slots are
//! `Option<Node>`; `None` marks an absent child and keeps later siblings at
//! their position.

mod element;
mod text;

pub use element::{Element, Tag};
pub use text::{Text, TextKind};

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::Props;

/// Node in a description tree - either Element or Text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

/// One positional child slot; `None` is an absent child.
pub type Slot = Option<Node>;

/// Type alias for children collection.
pub type Children = SmallVec<[Slot; 8]>;

/// Shape of a node. Nodes of different shape are never patched into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    Element(&'a str),
    Text(TextKind),
}

impl Node {
    /// Create a string leaf.
    pub fn text(content: impl Into<CompactString>) -> Self {
        Node::Text(Text::new(content))
    }

    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get as element reference.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the node's shape (tag for elements, kind for leaves).
    pub fn shape(&self) -> Shape<'_> {
        match self {
            Node::Element(e) => Shape::Element(&e.tag),
            Node::Text(t) => Shape::Text(t.kind()),
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

// =============================================================================
// IntoChild
// =============================================================================

/// Conversion into a child slot.
///
/// Implemented for nodes, elements, primitives and `Option` of any of them,
/// so `h!` can take a heterogeneous child list.
pub trait IntoChild {
    fn into_child(self) -> Slot;
}

impl IntoChild for Node {
    fn into_child(self) -> Slot {
        Some(self)
    }
}

impl IntoChild for Element {
    fn into_child(self) -> Slot {
        Some(self.into())
    }
}

impl IntoChild for Text {
    fn into_child(self) -> Slot {
        Some(Node::Text(self))
    }
}

impl IntoChild for &str {
    fn into_child(self) -> Slot {
        Some(Node::text(self))
    }
}

impl IntoChild for String {
    fn into_child(self) -> Slot {
        Some(Node::text(self))
    }
}

impl IntoChild for CompactString {
    fn into_child(self) -> Slot {
        Some(Node::text(self))
    }
}

impl<T: IntoChild> IntoChild for Option<T> {
    fn into_child(self) -> Slot {
        self.and_then(IntoChild::into_child)
    }
}

macro_rules! impl_num_child {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoChild for $ty {
                fn into_child(self) -> Slot {
                    Some(Node::Text(Text::Num(self as f64)))
                }
            }
        )*
    };
}

impl_num_child!(f64, f32, i32, i64, u32, u64, usize);

// =============================================================================
// Constructor
// =============================================================================

/// Build an element description from a tag, props and ordered children.
///
/// Pure; a malformed (empty) tag is only reported when the description is
/// realized. See [`h!`](crate::h) for the variadic form.
pub fn h<I>(tag: impl Into<Tag>, props: Props, children: I) -> Node
where
    I: IntoIterator,
    I::Item: IntoChild,
{
    Element::new(tag).with_props(props).children(children).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{PropValue, PropsExt};

    #[test]
    fn test_h_builds_element() {
        let mut props = Props::new();
        props.set_prop("id", "x");
        let node = h("div", props, ["hello", "world"]);

        let elem = node.as_element().unwrap();
        assert_eq!(elem.tag, "div");
        assert_eq!(elem.get_prop("id"), Some(&PropValue::from("x")));
        assert_eq!(elem.child_count(), 2);
        assert_eq!(elem.slot(1), Some(&Node::text("world")));
    }

    #[test]
    fn test_duplicate_props_keep_last_value() {
        let props: Props = vec![
            ("a".into(), PropValue::from(1)),
            ("b".into(), PropValue::from(true)),
            ("a".into(), PropValue::from(2)),
        ];
        let node = h("div", props, ["x"]);

        let elem = node.as_element().unwrap();
        assert_eq!(elem.props.len(), 2);
        assert_eq!(elem.get_prop("a"), Some(&PropValue::from(2)));
        assert!(crate::algo::diff(Some(&node), Some(&node)).is_noop());
    }

    #[test]
    fn test_compare_by_value() {
        let a = h("p", Props::new(), [1, 2]);
        let b = h("p", Props::new(), [1, 2]);
        assert_eq!(a, b);
        assert_ne!(a, h("p", Props::new(), [2, 1]));
    }

    #[test]
    fn test_shape() {
        assert_eq!(Node::text("a").shape(), Shape::Text(TextKind::Str));
        assert_eq!(Node::from(Text::num(1.0)).shape(), Shape::Text(TextKind::Num));
        assert_eq!(h("div", Props::new(), [None::<Node>]).shape(), Shape::Element("div"));
        assert_ne!(Node::text("a").shape(), Shape::Element(""));
    }

    #[test]
    fn test_option_children() {
        let shown = true;
        let node = h("ul", Props::new(), [shown.then_some("a"), None, Some("c")]);
        let elem = node.as_element().unwrap();
        assert_eq!(elem.child_count(), 3);
        assert!(elem.slot(1).is_none());
    }
}
