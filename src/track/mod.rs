//! Access-tracking wrappers over a [`Value`] tree.
//!
//! # Module Structure
//!
//! ```text
//! track/
//! ├── mapping    # TrackedMapping
//! ├── sequence   # TrackedSequence
//! ├── path       # dotted path formatting
//! └── mod.rs     # Tracked handle, track() (this file)
//! ```
//!
//! Reads go through [`TrackedMapping::get`] / [`TrackedSequence::get`], which
//! mark the key or index and hand out a [`Tracked`]. Container values come
//! back as child wrappers that are created on first access and cached, so
//! reading the same key twice yields the same `Rc`.
//!
//! # Threading
//!
//! Wrappers keep their state in `RefCell`s and hand out `Rc` handles, so they
//! are neither `Send` nor `Sync`. Use one tracker per thread.

mod mapping;
pub mod path;
mod sequence;


pub use mapping::{Keys, TrackedMapping};
pub use sequence::TrackedSequence;

use crate::error::TrackError;
use crate::value::{Kind, Scalar, Value};
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Wrap a deserialized root for tracked access.
///
/// The root may be a mapping or a sequence; a scalar root is rejected.
pub fn track(value: &Value) -> Result<Tracked<'_>, TrackError> {
    match value {
        Value::Scalar(_) => Err(TrackError::type_mismatch(
            "",
            "mapping or sequence",
            Kind::Scalar,
        )),
        _ => Ok(Tracked::new_child(value, String::new())),
    }
}

// ============================================================================
// Tracked
// ============================================================================

/// Result of a tracked read.
#[derive(Debug, Clone)]
pub enum Tracked<'a> {
    Mapping(Rc<TrackedMapping<'a>>),
    Sequence(Rc<TrackedSequence<'a>>),
    /// Leaf values are handed out untouched.
    Scalar(&'a Scalar),
}

impl<'a> Tracked<'a> {
    /// Build a wrapper for `value` located at `path`.
    fn new_child(value: &'a Value, path: String) -> Self {
        match value {
            Value::Mapping(raw) => Self::Mapping(Rc::new(TrackedMapping::from_parts(raw, path))),
            Value::Sequence(raw) => {
                Self::Sequence(Rc::new(TrackedSequence::from_parts(raw, path)))
            }
            Value::Scalar(scalar) => Self::Scalar(scalar),
        }
    }

    pub const fn kind(&self) -> Kind {
        match self {
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Scalar(_) => Kind::Scalar,
        }
    }

    pub fn as_mapping(&self) -> Option<&Rc<TrackedMapping<'a>>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Rc<TrackedSequence<'a>>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&'a Scalar> {
        match self {
            Self::Scalar(scalar) => Some(*scalar),
            _ => None,
        }
    }

    /// Sorted paths that were never read below this node.
    ///
    /// Always empty for a scalar.
    pub fn unaccessed(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_unaccessed(&mut out);
        out.sort_unstable();
        out
    }

    fn collect_unaccessed(&self, out: &mut Vec<String>) {
        match self {
            Self::Mapping(map) => map.collect_unaccessed(out),
            Self::Sequence(seq) => seq.collect_unaccessed(out),
            Self::Scalar(_) => {}
        }
    }
}

impl<'a> From<&'a Scalar> for Tracked<'a> {
    fn from(scalar: &'a Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl PartialEq<Scalar> for Tracked<'_> {
    fn eq(&self, other: &Scalar) -> bool {
        self.as_scalar() == Some(other)
    }
}

// ============================================================================
// shared helpers
// ============================================================================

/// Wrap a child value, reusing the cached wrapper when one exists.
///
/// Scalars are never cached. `path` is only evaluated when a new wrapper is
/// built.
fn wrap_child<'a, K>(
    cache: &RefCell<FxHashMap<K, Tracked<'a>>>,
    key: K,
    value: &'a Value,
    path: impl FnOnce() -> String,
) -> Tracked<'a>
where
    K: Eq + Hash,
{
    if let Value::Scalar(scalar) = value {
        return Tracked::Scalar(scalar);
    }

    cache
        .borrow_mut()
        .entry(key)
        .or_insert_with(|| {
            let path = path();
            crate::debug!("track"; "wrapping {} at `{}`", value.kind(), path);
            Tracked::new_child(value, path)
        })
        .clone()
}

/// Build the error for a typed read that found the wrong shape.
fn expect_kind(path: String, expected: Kind, found: &Tracked<'_>) -> TrackError {
    TrackError::type_mismatch(path, expected.label(), found.kind())
}
