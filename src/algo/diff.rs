//! Differ
//!
//! Compares an old and a new description and produces a [`Patch`]: a flat,
//! pre-order list of [`PatchOp`]s borrowing the new description. Nothing
//! touches the host until the patch is applied.
//!
//! # Algorithm
//!
//! First match wins:
//!
//! 1. both absent: keep
//! 2. old absent: realize new, append under the target
//! 3. new absent: remove the target
//! 4. different shape (leaf vs element, leaf kind, or tag): realize new,
//!    replace the target in its slot
//! 5. equal leaves: keep; different leaves: overwrite text content
//! 6. same tag: sync props, then walk child slots by index
//!
//! Children are matched purely by position. Inserting in the middle of a
//! list shifts every later sibling onto a mismatched counterpart.
//!
//! # Stack usage
//!
//! Both the differ and the patch applier run on explicit work stacks;
//! recursion depth does not grow with tree depth.

use crate::node::{Element, Node, Text};

use super::props::{PropChange, PropDelta, prop_delta};

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for the differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffConfig {
    /// Deepest element pair that is still diffed structurally.
    /// Deeper pairs are replaced wholesale. Default: unbounded.
    pub max_depth: Option<usize>,
}

impl DiffConfig {
    /// Create config with an optional depth bound.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }

    /// Create config that replaces element pairs deeper than `max_depth`.
    pub fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    fn exceeds(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth > max)
    }
}

/// Statistics from a diff, counting planned work.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Number of element pairs compared
    pub elements_compared: usize,
    /// Number of leaf pairs compared
    pub texts_compared: usize,
    /// Number of nodes reused in place
    pub nodes_kept: usize,
    /// Number of nodes replaced by a fresh subtree
    pub nodes_replaced: usize,
    /// Number of text overwrites
    pub text_updates: usize,
    /// Number of property assignments
    pub props_set: usize,
    /// Number of property removals
    pub props_removed: usize,
    /// Number of child slots realized (appended or filled)
    pub children_appended: usize,
    /// Number of child slots emptied (removed or cleared)
    pub children_removed: usize,
}

/// One patch instruction.
///
/// Node ops (`Keep` to `Update`) act on the current target: the node passed
/// to [`Patch::apply`], or the live child picked by the preceding `Child`.
/// Scope ops (`Child` to `End`) act on the children of the innermost
/// `Update`, indexed into a snapshot taken when that `Update` ran.
#[derive(Debug, Clone)]
pub enum PatchOp<'a> {
    /// Leave the target as it is
    Keep,
    /// Realize the node and append it under the target
    Append(&'a Node),
    /// Detach the target
    Remove,
    /// Realize the node and put it in the target's slot
    Replace(&'a Node),
    /// Overwrite the target's text content
    SetText(&'a Text),
    /// Apply prop changes to the target and open its child scope
    Update(PropDelta<'a>),
    /// Make live child `index` the target of the next `len` ops.
    /// Without such a child, `node` is realized and appended instead.
    Child {
        index: usize,
        node: &'a Node,
        len: usize,
    },
    /// Realize the node (a placeholder for `None`) and append it to the
    /// scope parent
    AppendChild(Option<&'a Node>),
    /// Detach live child `index`
    RemoveChild(usize),
    /// Realize the node into the placeholder at `index`, or append it if
    /// the slot has no live child
    Fill { index: usize, node: &'a Node },
    /// Swap live child `index` for a placeholder
    Clear(usize),
    /// Close the child scope
    End,
}

impl PatchOp<'_> {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Append(_) => "append",
            Self::Remove => "remove",
            Self::Replace(_) => "replace",
            Self::SetText(_) => "set_text",
            Self::Update(_) => "update",
            Self::Child { .. } => "child",
            Self::AppendChild(_) => "append_child",
            Self::RemoveChild(_) => "remove_child",
            Self::Fill { .. } => "fill",
            Self::Clear(_) => "clear",
            Self::End => "end",
        }
    }
}

/// Deferred, single-use reconciliation of one live node.
///
/// Produced by [`diff`]; consumed by [`Patch::apply`].
#[derive(Debug, Clone)]
#[must_use]
pub struct Patch<'a> {
    pub(super) ops: Vec<PatchOp<'a>>,
    stats: DiffStats,
}

impl<'a> Patch<'a> {
    /// Instructions in application order
    pub fn ops(&self) -> &[PatchOp<'a>] {
        &self.ops
    }

    /// Statistics collected while diffing
    pub fn stats(&self) -> DiffStats {
        self.stats
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the patch has no instructions at all
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Check if applying the patch leaves the live tree untouched
    pub fn is_noop(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, PatchOp::Keep))
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two descriptions. `None` stands for an absent description.
///
/// # Example
///
/// ```ignore
/// let patch = diff(Some(&old), Some(&new));
/// let live = patch.apply(&mut host, live)?;
/// ```
pub fn diff<'a>(old: Option<&'a Node>, new: Option<&'a Node>) -> Patch<'a> {
    diff_with_config(old, new, DiffConfig::default())
}

/// Diff two descriptions with custom configuration.
pub fn diff_with_config<'a>(
    old: Option<&'a Node>,
    new: Option<&'a Node>,
    config: DiffConfig,
) -> Patch<'a> {
    let mut ctx = DiffContext::new(config);
    ctx.run(old, new);
    let patch = ctx.into_patch();
    tracing::debug!(ops = patch.len(), stats = ?patch.stats, "computed patch");
    patch
}

// =============================================================================
// Internal Context
// =============================================================================

enum Work<'a> {
    /// Diff a pair against the current target
    Pair {
        old: Option<&'a Node>,
        new: Option<&'a Node>,
        depth: usize,
    },
    /// Diff child slot `index` inside the current scope
    Slot {
        index: usize,
        old: Option<&'a Node>,
        new: Option<&'a Node>,
        old_len: usize,
        new_len: usize,
        depth: usize,
    },
    /// Record the op span of the `Child` header at this position
    Seal(usize),
    /// Close the scope opened by the `Update` at this position
    End(usize),
}

struct DiffContext<'a> {
    ops: Vec<PatchOp<'a>>,
    stack: Vec<Work<'a>>,
    stats: DiffStats,
    config: DiffConfig,
}

impl<'a> DiffContext<'a> {
    fn new(config: DiffConfig) -> Self {
        Self {
            ops: Vec::new(),
            stack: Vec::new(),
            stats: DiffStats::default(),
            config,
        }
    }

    fn into_patch(self) -> Patch<'a> {
        Patch {
            ops: self.ops,
            stats: self.stats,
        }
    }

    fn run(&mut self, old: Option<&'a Node>, new: Option<&'a Node>) {
        self.stack.push(Work::Pair { old, new, depth: 0 });
        while let Some(work) = self.stack.pop() {
            match work {
                Work::Pair { old, new, depth } => self.diff_pair(old, new, depth),
                Work::Slot {
                    index,
                    old,
                    new,
                    old_len,
                    new_len,
                    depth,
                } => self.diff_slot(index, old, new, old_len, new_len, depth),
                Work::Seal(header) => self.seal(header),
                Work::End(update) => self.close(update),
            }
        }
    }

    /// Cases 1-6 against the current target
    fn diff_pair(&mut self, old: Option<&'a Node>, new: Option<&'a Node>, depth: usize) {
        let (old, new) = match (old, new) {
            (None, None) => {
                self.ops.push(PatchOp::Keep);
                return;
            }
            (None, Some(new)) => {
                self.ops.push(PatchOp::Append(new));
                self.stats.children_appended += 1;
                return;
            }
            (Some(_), None) => {
                self.ops.push(PatchOp::Remove);
                self.stats.children_removed += 1;
                return;
            }
            (Some(old), Some(new)) => (old, new),
        };

        if old.shape() != new.shape() {
            self.replace(new);
            return;
        }

        match (old, new) {
            (Node::Text(old_text), Node::Text(new_text)) => {
                self.stats.texts_compared += 1;
                if old_text == new_text {
                    self.stats.nodes_kept += 1;
                    self.ops.push(PatchOp::Keep);
                } else {
                    self.stats.text_updates += 1;
                    self.ops.push(PatchOp::SetText(new_text));
                }
            }
            (Node::Element(old_elem), Node::Element(new_elem)) => {
                if self.config.exceeds(depth) {
                    tracing::debug!(depth, tag = %new_elem.tag, "depth bound reached, replacing subtree");
                    self.replace(new);
                } else {
                    self.diff_element(old_elem, new_elem, depth);
                }
            }
            // Equal shapes imply equal variants.
            _ => self.replace(new),
        }
    }

    /// Case 6: same tag
    fn diff_element(&mut self, old: &'a Element, new: &'a Element, depth: usize) {
        self.stats.elements_compared += 1;
        self.stats.nodes_kept += 1;

        let delta = prop_delta(&old.props, &new.props);
        for change in &delta {
            match change {
                PropChange::Set(..) => self.stats.props_set += 1,
                PropChange::Remove(_) => self.stats.props_removed += 1,
            }
        }

        let update = self.ops.len();
        self.ops.push(PatchOp::Update(delta));
        self.stack.push(Work::End(update));

        let old_len = old.children.len();
        let new_len = new.children.len();
        for index in (0..old_len.max(new_len)).rev() {
            self.stack.push(Work::Slot {
                index,
                old: old.slot(index),
                new: new.slot(index),
                old_len,
                new_len,
                depth: depth + 1,
            });
        }
    }

    /// One child slot of a same-tag update
    fn diff_slot(
        &mut self,
        index: usize,
        old: Option<&'a Node>,
        new: Option<&'a Node>,
        old_len: usize,
        new_len: usize,
        depth: usize,
    ) {
        match (old, new) {
            // Holes are live placeholders: drop them past the new end, add
            // them past the old end.
            (None, None) if index >= new_len => {
                self.stats.children_removed += 1;
                self.ops.push(PatchOp::RemoveChild(index));
            }
            (None, None) if index >= old_len => {
                self.stats.children_appended += 1;
                self.ops.push(PatchOp::AppendChild(None));
            }
            (None, None) => {}
            (Some(_), None) => {
                self.stats.children_removed += 1;
                if index >= new_len {
                    self.ops.push(PatchOp::RemoveChild(index));
                } else {
                    // Interior hole: keep the slot occupied.
                    self.ops.push(PatchOp::Clear(index));
                }
            }
            (None, Some(node)) => {
                self.stats.children_appended += 1;
                if index >= old_len {
                    self.ops.push(PatchOp::AppendChild(Some(node)));
                } else {
                    self.ops.push(PatchOp::Fill { index, node });
                }
            }
            (Some(old), Some(new)) => {
                let header = self.ops.len();
                self.ops.push(PatchOp::Child {
                    index,
                    node: new,
                    len: 0,
                });
                self.stack.push(Work::Seal(header));
                self.stack.push(Work::Pair {
                    old: Some(old),
                    new: Some(new),
                    depth,
                });
            }
        }
    }

    /// Fix the span of a `Child` header; drop it if the child is kept as is.
    fn seal(&mut self, header: usize) {
        let span = self.ops.len() - header - 1;
        if span == 1 && matches!(self.ops[header + 1], PatchOp::Keep) {
            self.ops.truncate(header);
            return;
        }
        if let PatchOp::Child { len, .. } = &mut self.ops[header] {
            *len = span;
        }
    }

    /// Close a child scope; an update that changed nothing collapses to `Keep`.
    fn close(&mut self, update: usize) {
        let untouched = self.ops.len() == update + 1
            && matches!(&self.ops[update], PatchOp::Update(delta) if delta.is_empty());
        if untouched {
            self.ops[update] = PatchOp::Keep;
        } else {
            self.ops.push(PatchOp::End);
        }
    }

    fn replace(&mut self, new: &'a Node) {
        self.stats.nodes_replaced += 1;
        self.ops.push(PatchOp::Replace(new));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(patch: &Patch<'_>) -> Vec<&'static str> {
        patch.ops().iter().map(PatchOp::name).collect()
    }

    #[test]
    fn test_absent_pair_is_noop() {
        let patch = diff(None, None);
        assert!(patch.is_noop());
        assert_eq!(kinds(&patch), ["keep"]);
    }

    #[test]
    fn test_presence_changes() {
        let node = h!("div");
        assert_eq!(kinds(&diff(None, Some(&node))), ["append"]);
        assert_eq!(kinds(&diff(Some(&node), None)), ["remove"]);
    }

    #[test]
    fn test_leaf_equality_short_circuit() {
        let a = Node::text("a");
        let b = Node::text("b");
        assert!(diff(Some(&a), Some(&a.clone())).is_noop());

        let patch = diff(Some(&a), Some(&b));
        assert!(matches!(patch.ops(), [PatchOp::SetText(t)] if **t == Text::new("b")));
        assert_eq!(patch.stats().text_updates, 1);
    }

    #[test]
    fn test_shape_changes_replace() {
        let div = h!("div", {}, "same");
        let span = h!("span", {}, "same");
        let text = Node::text("1");
        let num = Node::from(Text::num(1.0));

        assert_eq!(kinds(&diff(Some(&div), Some(&span))), ["replace"]);
        assert_eq!(kinds(&diff(Some(&div), Some(&text))), ["replace"]);
        assert_eq!(kinds(&diff(Some(&text), Some(&num))), ["replace"]);
        assert_eq!(diff(Some(&div), Some(&span)).stats().nodes_replaced, 1);
    }

    #[test]
    fn test_identical_trees_collapse_to_keep() {
        let tree = h!("div", { "id" => "x" },
            h!("h1", {}, "Title"),
            h!("ul", {}, h!("li", {}, 1), h!("li", {}, 2)),
        );
        let patch = diff(Some(&tree), Some(&tree));
        assert!(patch.is_noop());
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.stats().elements_compared, 5);
    }

    #[test]
    fn test_child_growth_and_shrink() {
        let ab = h!("ul", {}, "A", "B");
        let abc = h!("ul", {}, "A", "B", "C");
        let a = h!("ul", {}, "A");

        assert_eq!(kinds(&diff(Some(&ab), Some(&abc))), ["update", "append_child", "end"]);
        assert_eq!(
            kinds(&diff(Some(&abc), Some(&a))),
            ["update", "remove_child", "remove_child", "end"]
        );
    }

    #[test]
    fn test_child_span_is_recorded() {
        let old = h!("div", {}, h!("p", {}, "a"), "tail");
        let new = h!("div", {}, h!("p", { "class" => "x" }, "b"), "tail");
        let patch = diff(Some(&old), Some(&new));

        assert_eq!(
            kinds(&patch),
            ["update", "child", "update", "child", "set_text", "end", "end"]
        );
        assert!(matches!(patch.ops()[1], PatchOp::Child { index: 0, len: 4, .. }));
        assert!(matches!(patch.ops()[3], PatchOp::Child { index: 0, len: 1, .. }));
    }

    #[test]
    fn test_holes() {
        let old = h!("div", {}, "a", None::<Node>, "c");
        let new = h!("div", {}, None::<Node>, "b", "c");
        let patch = diff(Some(&old), Some(&new));

        assert_eq!(kinds(&patch), ["update", "clear", "fill", "end"]);
        assert!(matches!(patch.ops()[1], PatchOp::Clear(0)));
        assert!(matches!(patch.ops()[2], PatchOp::Fill { index: 1, .. }));

        let same_holes = h!("div", {}, None::<Node>, "b");
        assert!(diff(Some(&same_holes), Some(&same_holes)).is_noop());

        let grown = h!("div", {}, "a", None::<Node>, "c");
        let short = h!("div", {}, "a");
        assert_eq!(
            kinds(&diff(Some(&short), Some(&grown))),
            ["update", "append_child", "append_child", "end"]
        );
        assert!(matches!(diff(Some(&short), Some(&grown)).ops()[1], PatchOp::AppendChild(None)));

        let trailing = h!("div", {}, "a", None::<Node>);
        let trimmed = h!("div", {}, "a");
        assert_eq!(kinds(&diff(Some(&trailing), Some(&trimmed))), ["update", "remove_child", "end"]);
    }

    #[test]
    fn test_prop_stats() {
        let old = h!("a", { "a" => 1, "b" => 2 });
        let new = h!("a", { "b" => 2, "c" => 3 });
        let stats = diff(Some(&old), Some(&new)).stats();
        assert_eq!(stats.props_set, 1);
        assert_eq!(stats.props_removed, 1);
    }

    #[test]
    fn test_positional_matching_cascades() {
        let old = h!("ul", {}, h!("li", {}, "a"), h!("p", {}, "b"));
        let new = h!("ul", {}, h!("p", {}, "new"), h!("li", {}, "a"), h!("p", {}, "b"));
        let patch = diff(Some(&old), Some(&new));

        let stats = patch.stats();
        assert_eq!(stats.nodes_replaced, 2);
        assert_eq!(stats.children_appended, 1);
    }

    #[test]
    fn test_depth_bound_replaces() {
        let old = h!("div", {}, h!("section", {}, h!("p", {}, "a")));
        let new = h!("div", {}, h!("section", {}, h!("p", {}, "b")));

        let unbounded = diff(Some(&old), Some(&new));
        assert_eq!(unbounded.stats().nodes_replaced, 0);

        let bounded = diff_with_config(Some(&old), Some(&new), DiffConfig::bounded(1));
        assert_eq!(
            kinds(&bounded),
            ["update", "child", "update", "child", "replace", "end", "end"]
        );
        assert_eq!(bounded.stats().nodes_replaced, 1);
    }

    #[test]
    fn test_deep_tree_diff_without_recursion() {
        fn chain(leaf: &str) -> Node {
            let mut node = Element::new("i").text(leaf);
            for _ in 0..50_000 {
                node = Element::new("div").child(node);
            }
            node.into()
        }
        let old = chain("a");
        let new = chain("b");
        let patch = diff(Some(&old), Some(&new));

        assert_eq!(patch.stats().elements_compared, 50_001);
        assert_eq!(patch.stats().text_updates, 1);
        assert!(!patch.is_noop());
    }
}
