//! Realizer
//!
//! Turns a description into a fresh live subtree. Walks the description
//! with an explicit stack, so tree depth is not bounded by the call stack.

use std::slice;

use crate::error::{ReconcileError, ReconcileResult, StructuralError};
use crate::host::Host;
use crate::node::{Node, Slot};

/// Create a live subtree for `node`.
///
/// - `None` becomes a placeholder node
/// - a leaf becomes a text node
/// - an element gets every prop assigned and every child slot realized and
///   appended in order; absent slots become placeholders so live children
///   line up with description slots
///
/// Absent children are realized rather than skipped: a live child exists
/// for every slot, `None` included.
///
/// Fails with [`StructuralError::MissingTag`] on an element with an empty tag.
pub fn create_element<H: Host>(
    host: &mut H,
    node: Option<&Node>,
) -> ReconcileResult<H::Node, H::Error> {
    let root = realize_shallow(host, node)?;

    let mut stack: Vec<(H::Node, slice::Iter<'_, Slot>)> = Vec::new();
    if let Some(Node::Element(elem)) = node
        && !elem.children.is_empty()
    {
        stack.push((root.clone(), elem.children.iter()));
    }

    while let Some((parent, slots)) = stack.last_mut() {
        let Some(slot) = slots.next() else {
            stack.pop();
            continue;
        };
        let parent = parent.clone();
        let child = realize_shallow(host, slot.as_ref())?;
        host.append_child(&parent, &child)
            .map_err(ReconcileError::Host)?;

        if let Some(Node::Element(elem)) = slot
            && !elem.children.is_empty()
        {
            stack.push((child, elem.children.iter()));
        }
    }

    Ok(root)
}

/// Create one live node with its props, without children.
fn realize_shallow<H: Host>(host: &mut H, node: Option<&Node>) -> ReconcileResult<H::Node, H::Error> {
    match node {
        None => host.create_placeholder().map_err(ReconcileError::Host),
        Some(Node::Text(text)) => host.create_text(text).map_err(ReconcileError::Host),
        Some(Node::Element(elem)) => {
            if !elem.has_tag() {
                return Err(StructuralError::MissingTag.into());
            }
            let live = host.create_element(&elem.tag).map_err(ReconcileError::Host)?;
            for (name, value) in &elem.props {
                host.set_prop(&live, name, value)
                    .map_err(ReconcileError::Host)?;
            }
            Ok(live)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Callback, PropValue};
    use crate::host::{HostError, MemoryHost};
    use crate::node::Element;

    #[test]
    fn test_realize_tree() {
        let mut host = MemoryHost::new();
        let desc = h!("div", { "id" => "x", "checked" => true },
            h!("span", {}, "hello"),
            3,
        );
        let live = create_element(&mut host, Some(&desc)).unwrap();

        assert_eq!(host.outer_html(live), r#"<div id="x" checked><span>hello</span>3</div>"#);
        assert_eq!(host.prop(live, "checked"), Some(&PropValue::Bool(true)));
    }

    #[test]
    fn test_rich_values_assigned_directly() {
        let mut host = MemoryHost::new();
        let cb = Callback::new(|_| {});
        let desc = h!("button", { "onclick" => cb.clone(), "disabled" => false });
        let live = create_element(&mut host, Some(&desc)).unwrap();

        let assigned = host.prop(live, "onclick").and_then(PropValue::as_callback).unwrap();
        assert!(assigned.ptr_eq(&cb));
        assert_eq!(host.prop(live, "disabled"), Some(&PropValue::Bool(false)));
    }

    #[test]
    fn test_absent_becomes_placeholder() {
        let mut host = MemoryHost::new();
        let live = create_element(&mut host, None).unwrap();
        assert!(host.is_placeholder(live));

        let desc = h!("ul", {}, "a", None::<Node>, "c");
        let live = create_element(&mut host, Some(&desc)).unwrap();
        assert_eq!(host.child_ids(live).len(), 3);
        assert_eq!(host.outer_html(live), "<ul>a<!---->c</ul>");
    }

    #[test]
    fn test_missing_tag_is_structural_error() {
        let mut host = MemoryHost::new();
        let desc = h!("div", {}, h!("", {}, "orphan"));
        let err = create_element(&mut host, Some(&desc)).unwrap_err();
        assert!(matches!(err, ReconcileError::Structural(StructuralError::MissingTag)));
    }

    #[test]
    fn test_host_error_propagates_unchanged() {
        let mut host = MemoryHost::new();
        let desc = h!("div", { "bad name" => 1 });
        let err = create_element(&mut host, Some(&desc)).unwrap_err();
        assert_eq!(err.into_host(), Some(HostError::InvalidProp("bad name".into())));
    }

    #[test]
    fn test_deep_tree_realizes_without_recursion() {
        let mut desc = Element::new("leaf");
        for _ in 0..50_000 {
            desc = Element::new("div").child(desc);
        }
        let desc = Node::from(desc);

        let mut host = MemoryHost::new();
        let live = create_element(&mut host, Some(&desc)).unwrap();
        assert_eq!(host.len(), 50_001);
        assert_eq!(host.child_ids(live).len(), 1);
    }
}
