//! Text node type
//!
//! Primitive leaves in the description tree.

use std::fmt;

use compact_str::{CompactString, format_compact};

// =============================================================================
// Text
// =============================================================================

/// Primitive leaf: a string or a number standing in place of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Text {
    Str(CompactString),
    Num(f64),
}

/// Kind of a primitive leaf. Leaves of different kinds never patch each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Str,
    Num,
}

impl Text {
    /// Create a string leaf
    pub fn new(content: impl Into<CompactString>) -> Self {
        Self::Str(content.into())
    }

    /// Create a numeric leaf
    pub fn num(value: f64) -> Self {
        Self::Num(value)
    }

    /// Get the leaf kind
    #[inline]
    pub fn kind(&self) -> TextKind {
        match self {
            Self::Str(_) => TextKind::Str,
            Self::Num(_) => TextKind::Num,
        }
    }

    /// Text content as the host should display it
    pub fn content(&self) -> CompactString {
        match self {
            Self::Str(s) => s.clone(),
            Self::Num(n) => format_compact!("{n}"),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}
