//! tola-reconcile - Positional virtual tree reconciliation
//!
//! ## Core Concepts
//!
//! **Descriptions, not nodes**: views return plain [`Node`] values. The
//! reconciler diffs the previous description against the new one and
//! patches the live tree of a [`Host`] with the minimal set of mutations.
//!
//! **Positional matching**: children are matched by index. A matching tag
//! (or text kind) updates in place; anything else is replaced.
//!
//! **Bounded stack**: diffing, patching, realizing and dropping all run on
//! explicit work lists, so arbitrarily deep trees are safe.
//!
//! ## Modules
//! - `node`: Node/Element/Text description types
//! - `attr`: Property values and property lists
//! - `algo`: Diff, patch application, property deltas, realization
//! - `host`: The `Host` capability trait and the in-memory `MemoryHost`
//! - `render`: Render-cycle controller with explicit dependencies
//!
//! ## Usage
//!
//! ```ignore
//! use tola_reconcile::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let root = host.create_element("main")?;
//!
//! let old = h!("p", {}, "Hello");
//! let live = reconcile(&mut host, root, None, Some(&old))?.unwrap();
//!
//! let new = h!("p", { "class" => "greeting" }, "Hello, world");
//! reconcile(&mut host, live, Some(&old), Some(&new))?;
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Node types: Element, Node, Text
pub mod node;

/// Property types
pub mod attr;

/// Algorithms: diff, apply, props, realize
pub mod algo;

/// Host rendering surface
pub mod host;

/// Error types
pub mod error;

/// Render-cycle controller
pub mod render;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Element, IntoChild, Node, Shape, Slot, Tag, Text, TextKind, h};

// Property types
pub use attr::{Callback, PropKey, PropValue, Props, PropsExt};

// Algorithms
pub use algo::{
    DiffConfig, DiffStats, Patch, PatchOp, PropChange, PropDelta, create_element, diff,
    diff_with_config, reconcile,
};

// Host
pub use host::{Host, HostError, LiveChildren, MemoryHost, Mutation, NodeId};

// Error types
pub use error::{ReconcileError, ReconcileResult, StructuralError};

// Render
pub use render::{Renderer, RendererConfig, Teardown, View};

// =============================================================================
// Tests
// =============================================================================
