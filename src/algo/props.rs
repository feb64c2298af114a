//! Property synchronizer
//!
//! Computes the assignments and removals that turn one prop list into
//! another and applies them to a live node. Values compare with `==`, so a
//! callback rebuilt on every render is reassigned every time.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::attr::{PropValue, Props};
use crate::error::{ReconcileError, ReconcileResult};
use crate::host::Host;

/// Lists longer than this get a hashed lookup instead of a linear scan.
const SCAN_LIMIT: usize = 16;

/// One property change on a live node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropChange<'a> {
    /// Assign `value` to `name`
    Set(&'a str, &'a PropValue),
    /// Remove `name`
    Remove(&'a str),
}

impl PropChange<'_> {
    /// Property name touched by this change
    pub fn name(&self) -> &str {
        match self {
            Self::Set(name, _) | Self::Remove(name) => name,
        }
    }
}

/// Ordered prop changes: assignments in new-list order, then removals in
/// old-list order.
pub type PropDelta<'a> = SmallVec<[PropChange<'a>; 4]>;

enum Lookup<'a> {
    Scan(&'a Props),
    Index(FxHashMap<&'a str, &'a PropValue>),
}

impl<'a> Lookup<'a> {
    fn new(props: &'a Props) -> Self {
        if props.len() <= SCAN_LIMIT {
            Self::Scan(props)
        } else {
            Self::Index(props.iter().map(|(k, v)| (k.as_str(), v)).collect())
        }
    }

    fn get(&self, name: &str) -> Option<&'a PropValue> {
        match self {
            Self::Scan(props) => props.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            Self::Index(map) => map.get(name).copied(),
        }
    }
}

/// Compute the changes from `old` to `new`.
pub fn prop_delta<'a>(old: &'a Props, new: &'a Props) -> PropDelta<'a> {
    let mut delta = PropDelta::new();
    let old_lookup = Lookup::new(old);
    for (name, value) in new {
        if old_lookup.get(name) != Some(value) {
            delta.push(PropChange::Set(name, value));
        }
    }

    let new_lookup = Lookup::new(new);
    for (name, _) in old {
        if new_lookup.get(name).is_none() {
            delta.push(PropChange::Remove(name));
        }
    }
    delta
}

/// Apply precomputed changes to a live node.
pub fn apply_prop_delta<H: Host>(
    host: &mut H,
    node: &H::Node,
    delta: &[PropChange<'_>],
) -> ReconcileResult<(), H::Error> {
    for change in delta {
        let result = match change {
            PropChange::Set(name, value) => host.set_prop(node, name, value),
            PropChange::Remove(name) => host.remove_prop(node, name),
        };
        result.map_err(ReconcileError::Host)?;
    }
    Ok(())
}

/// Bring the props of `node` from `old` to `new`.
///
/// Keys whose value is unchanged are not touched; keys missing from `new`
/// are removed.
pub fn update_props<H: Host>(
    host: &mut H,
    node: &H::Node,
    old: &Props,
    new: &Props,
) -> ReconcileResult<(), H::Error> {
    apply_prop_delta(host, node, &prop_delta(old, new))
}
