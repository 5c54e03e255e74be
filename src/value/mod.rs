//! Deserialized configuration tree.
//!
//! Every parser output is normalized into three shapes:
//!
//! | Shape      | Rust type                     |
//! |------------|-------------------------------|
//! | mapping    | [`Mapping`] (`IndexMap`)      |
//! | sequence   | [`Sequence`] (`Vec<Value>`)   |
//! | scalar     | [`Scalar`] (opaque leaf)      |
//!
//! Trackers dispatch on the [`Value`] tag only and never look inside a
//! [`Scalar`].

mod convert;

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Key → value mapping, kept in document order.
pub type Mapping = IndexMap<String, Value>;

/// Ordered sequence of values.
pub type Sequence = Vec<Value>;

/// A node of a deserialized configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(Scalar),
}

/// Leaf payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Only used for integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    /// TOML datetime in its textual form.
    Datetime(String),
}

/// Shape of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Mapping,
    Sequence,
    Scalar,
}

impl Kind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Value {
    #[inline]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Scalar(_) => Kind::Scalar,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Self::Sequence(seq)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) | Self::Datetime(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

// ============================================================================
// tests
// ============================================================================
