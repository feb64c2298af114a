//! Host rendering surface.
//!
//! The reconciler never owns live nodes. It asks a [`Host`] to create,
//! mutate and remove them through this capability set and only holds
//! handles for the duration of one call.
//!
//! - `Host`: the capability trait
//! - `MemoryHost`: arena-backed implementation with a mutation journal

mod memory;

pub use memory::{HostError, MemoryHost, Mutation, NodeId};

use std::fmt;

use smallvec::SmallVec;

use crate::attr::PropValue;
use crate::node::Text;

/// Live children of a node, in order.
pub type LiveChildren<N> = SmallVec<[N; 8]>;

/// Node-manipulation capabilities of a host rendering surface.
///
/// Errors are returned as-is to the caller of the reconciler.
pub trait Host {
    /// Handle to a live node. Cloning a handle never clones the node.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Failure raised by any capability.
    type Error: std::error::Error;

    /// Create an element of the given tag.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Create a text node from a primitive.
    fn create_text(&mut self, text: &Text) -> Result<Self::Node, Self::Error>;

    /// Create a marker node standing in for an absent description.
    fn create_placeholder(&mut self) -> Result<Self::Node, Self::Error>;

    /// Assign a named property.
    fn set_prop(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), Self::Error>;

    /// Remove a named property.
    fn remove_prop(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Put `new` into the parent slot occupied by `old`, detaching `old`.
    fn replace(&mut self, old: &Self::Node, new: &Self::Node) -> Result<(), Self::Error>;

    /// Detach a node from its parent.
    fn remove(&mut self, node: &Self::Node) -> Result<(), Self::Error>;

    /// Current live children, in order.
    fn children(&self, node: &Self::Node) -> Result<LiveChildren<Self::Node>, Self::Error>;

    /// Overwrite the text content of a node.
    fn set_text(&mut self, node: &Self::Node, text: &Text) -> Result<(), Self::Error>;
}
