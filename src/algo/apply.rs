//! Patch application
//!
//! Runs a [`Patch`] against a live node. Child scopes are kept on an
//! explicit stack; each scope snapshots the live children of its parent
//! when opened, so indices always refer to the order the previous render
//! produced, regardless of removals earlier in the same scope.

use crate::error::{ReconcileError, ReconcileResult};
use crate::host::{Host, LiveChildren};
use crate::node::Node;

use super::diff::{Patch, PatchOp, diff};
use super::props::apply_prop_delta;
use super::realize::create_element;

/// Children of an updated node, as they were before the update touched them.
struct Scope<N> {
    parent: N,
    live: LiveChildren<N>,
}

impl<'a> Patch<'a> {
    /// Apply to `target` and return the node now standing in its place.
    ///
    /// Returns `None` when the target was removed. Host failures abort the
    /// patch and are returned unchanged; the live tree is left as far as the
    /// patch got.
    pub fn apply<H: Host>(
        self,
        host: &mut H,
        target: H::Node,
    ) -> ReconcileResult<Option<H::Node>, H::Error> {
        let mut scopes: Vec<Scope<H::Node>> = Vec::new();
        let mut target = Some(target);
        let mut root: Option<Option<H::Node>> = None;
        let mut ops = self.ops.iter();

        while let Some(op) = ops.next() {
            tracing::trace!(op = op.name(), depth = scopes.len(), "apply");

            // Ops are only built by `diff`: node ops always have a target and
            // scope ops always have an open scope.
            let result = match op {
                PatchOp::Keep
                | PatchOp::Append(_)
                | PatchOp::Remove
                | PatchOp::Replace(_)
                | PatchOp::SetText(_)
                | PatchOp::Update(_) => {
                    let Some(node) = target.take() else { continue };
                    Some(apply_node_op(host, op, node, &mut scopes)?)
                }
                scope_op => {
                    let Some(scope) = scopes.last() else { continue };
                    match scope_op {
                        PatchOp::Child { index, node, len } => match scope.live.get(*index) {
                            Some(live) => target = Some(live.clone()),
                            None => {
                                tracing::warn!(
                                    index,
                                    live = scope.live.len(),
                                    "live child missing, realizing fresh"
                                );
                                append_fresh(host, &scope.parent, Some(*node))?;
                                if *len > 0 {
                                    ops.nth(*len - 1);
                                }
                            }
                        },
                        PatchOp::AppendChild(node) => append_fresh(host, &scope.parent, *node)?,
                        PatchOp::RemoveChild(index) => match scope.live.get(*index) {
                            Some(live) => host.remove(live).map_err(ReconcileError::Host)?,
                            None => tracing::warn!(index, "live child missing, nothing to remove"),
                        },
                        PatchOp::Fill { index, node } => {
                            let fresh = create_element(host, Some(*node))?;
                            let placed = match scope.live.get(*index) {
                                Some(live) => host.replace(live, &fresh),
                                None => host.append_child(&scope.parent, &fresh),
                            };
                            placed.map_err(ReconcileError::Host)?;
                        }
                        PatchOp::Clear(index) => {
                            if let Some(live) = scope.live.get(*index) {
                                let placeholder = create_element(host, None)?;
                                host.replace(live, &placeholder)
                                    .map_err(ReconcileError::Host)?;
                            }
                        }
                        PatchOp::End => {
                            scopes.pop();
                        }
                        _ => {}
                    }
                    None
                }
            };

            if root.is_none() {
                root = result;
            }
        }

        Ok(root.flatten())
    }
}

fn apply_node_op<H: Host>(
    host: &mut H,
    op: &PatchOp<'_>,
    node: H::Node,
    scopes: &mut Vec<Scope<H::Node>>,
) -> ReconcileResult<Option<H::Node>, H::Error> {
    match op {
        PatchOp::Append(new) => {
            let fresh = create_element(host, Some(*new))?;
            host.append_child(&node, &fresh)
                .map_err(ReconcileError::Host)?;
            Ok(Some(fresh))
        }
        PatchOp::Remove => {
            host.remove(&node).map_err(ReconcileError::Host)?;
            Ok(None)
        }
        PatchOp::Replace(new) => {
            let fresh = create_element(host, Some(*new))?;
            host.replace(&node, &fresh)
                .map_err(ReconcileError::Host)?;
            Ok(Some(fresh))
        }
        PatchOp::SetText(text) => {
            host.set_text(&node, text).map_err(ReconcileError::Host)?;
            Ok(Some(node))
        }
        PatchOp::Update(delta) => {
            apply_prop_delta(host, &node, delta)?;
            let live = host.children(&node).map_err(ReconcileError::Host)?;
            scopes.push(Scope {
                parent: node.clone(),
                live,
            });
            Ok(Some(node))
        }
        _ => Ok(Some(node)),
    }
}

fn append_fresh<H: Host>(
    host: &mut H,
    parent: &H::Node,
    node: Option<&Node>,
) -> ReconcileResult<(), H::Error> {
    let fresh = create_element(host, node)?;
    host.append_child(parent, &fresh)
        .map_err(ReconcileError::Host)
}

/// Diff `old` against `new` and apply the result to `target` in one step.
pub fn reconcile<H: Host>(
    host: &mut H,
    target: H::Node,
    old: Option<&Node>,
    new: Option<&Node>,
) -> ReconcileResult<Option<H::Node>, H::Error> {
    diff(old, new).apply(host, target)
}
