//! Property system for node descriptions
//!
//! Properties are assigned directly onto live nodes, so values are an open
//! union rather than serialized attribute strings:
//! - `Props` keeps insertion order (deterministic patch generation)
//! - keys are unique, enforced by `PropsExt::set_prop`

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;

/// Property name.
pub type PropKey = CompactString;

/// Node properties as ordered key-value pairs.
pub type Props = Vec<(PropKey, PropValue)>;

// =============================================================================
// Callback
// =============================================================================

/// Handler value that a host may invoke with an event payload of its choosing.
///
/// Two callbacks are equal only when they share the same allocation.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&dyn Any)>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&dyn Any) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &dyn Any) {
        (self.0)(event)
    }

    /// Check whether both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// Value assigned to a named property of a live node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(CompactString),
    Num(f64),
    Bool(bool),
    Callback(Callback),
}

impl PropValue {
    /// Get as string slice, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number, if this is a numeric value.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as bool, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as callback, if this is a handler value.
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Self::Callback(cb) => Some(cb),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Callback(_) => f.write_str("[callback]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<CompactString> for PropValue {
    fn from(s: CompactString) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Callback> for PropValue {
    fn from(cb: Callback) -> Self {
        Self::Callback(cb)
    }
}

macro_rules! impl_num_prop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PropValue {
                fn from(n: $ty) -> Self {
                    Self::Num(n as f64)
                }
            }
        )*
    };
}

impl_num_prop!(f64, f32, i32, i64, u32, u64, usize);

// =============================================================================
// PropsExt
// =============================================================================

/// Extension trait for property operations on Props
pub trait PropsExt {
    /// Get a property value by name
    fn get_prop(&self, name: &str) -> Option<&PropValue>;

    /// Check if a property exists
    fn has_prop(&self, name: &str) -> bool;

    /// Set a property value (insert or update)
    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>);

    /// Remove a property by name, returning the old value if present
    fn remove_prop(&mut self, name: &str) -> Option<PropValue>;
}

impl PropsExt for Props {
    fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_prop(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(prop) = self.iter_mut().find(|(k, _)| *k == name) {
            prop.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_prop(&mut self, name: &str) -> Option<PropValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_props_operations() {
        let mut props: Props = Vec::new();

        props.set_prop("id", "main");
        props.set_prop("tabIndex", 3);
        assert_eq!(props.len(), 2);

        assert_eq!(props.get_prop("id"), Some(&PropValue::from("main")));
        assert_eq!(props.get_prop("tabIndex").and_then(PropValue::as_num), Some(3.0));
        assert_eq!(props.get_prop("href"), None);

        assert!(props.has_prop("id"));
        assert!(!props.has_prop("href"));

        // Update keeps position and uniqueness
        props.set_prop("id", "wrapper");
        assert_eq!(props.get_prop("id").and_then(PropValue::as_str), Some("wrapper"));
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].0, "id");

        let removed = props.remove_prop("id");
        assert_eq!(removed, Some(PropValue::from("wrapper")));
        assert!(!props.has_prop("id"));
        assert_eq!(props.remove_prop("id"), None);
    }

    #[test]
    fn test_callback_reference_equality() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let cb = Callback::new(move |_| counter.set(counter.get() + 1));
        let same = cb.clone();
        let other = Callback::new(|_| {});

        assert_eq!(PropValue::from(cb.clone()), PropValue::from(same));
        assert_ne!(PropValue::from(cb.clone()), PropValue::from(other));

        cb.call(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_prop_value_display() {
        assert_eq!(PropValue::from("x").to_string(), "x");
        assert_eq!(PropValue::from(2).to_string(), "2");
        assert_eq!(PropValue::from(true).to_string(), "true");
        assert_eq!(PropValue::from(Callback::new(|_| {})).to_string(), "[callback]");
    }
}
