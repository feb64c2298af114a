//! Reconciliation algorithms.
//!
//! - `diff`: old/new description comparison producing a `Patch`
//! - `apply`: running a `Patch` against a live node
//! - `props`: property synchronizer
//! - `realize`: fresh live subtrees from descriptions

mod apply;
mod diff;
mod props;
mod realize;

pub use apply::reconcile;
pub use diff::{DiffConfig, DiffStats, Patch, PatchOp, diff, diff_with_config};
pub use props::{PropChange, PropDelta, apply_prop_delta, prop_delta, update_props};
pub use realize::create_element;
