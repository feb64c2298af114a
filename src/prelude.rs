//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_reconcile::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Element, IntoChild, Node, Slot, Tag, Text, TextKind};

// Properties
pub use crate::attr::{Callback, PropValue, Props, PropsExt};

// Algorithms
pub use crate::algo::{DiffConfig, DiffStats, Patch, PatchOp, diff, diff_with_config, reconcile};

// Host
pub use crate::host::{Host, HostError, MemoryHost, NodeId};

// Error
pub use crate::error::{ReconcileError, ReconcileResult, StructuralError};

// Render
pub use crate::render::{Renderer, RendererConfig, View};

// Macros
// `h` is both the builder function and the variadic macro
pub use crate::{h, props};
