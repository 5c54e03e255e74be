//! Tracked view over a [`Mapping`].

use super::{Tracked, TrackedSequence, expect_kind, path, wrap_child};
use crate::error::TrackError;
use crate::value::{Kind, Mapping, Scalar, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Mapping wrapper that records which keys are read.
///
/// | Operation                                 | Marks        |
/// |-------------------------------------------|--------------|
/// | `get`, `get_opt`, `get_or` (key present)  | that key     |
/// | `mapping`, `sequence`, `scalar`           | that key     |
/// | `values`, `items`                         | every key    |
/// | `mark_accessed`, `mark_all_accessed`      | given / all  |
/// | `contains_key`, `len`, `keys`, `iter`     | nothing      |
///
/// Marks are never removed.
#[derive(Debug)]
pub struct TrackedMapping<'a> {
    raw: &'a Mapping,
    path: String,
    accessed: RefCell<FxHashSet<&'a str>>,
    children: RefCell<FxHashMap<&'a str, Tracked<'a>>>,
}

impl<'a> TrackedMapping<'a> {
    /// Wrap a root value, which must be a mapping.
    pub fn new(value: &'a Value) -> Result<Self, TrackError> {
        Self::with_path(value, String::new())
    }

    /// Wrap a value located at `path` in some larger tree.
    pub fn with_path(value: &'a Value, path: impl Into<String>) -> Result<Self, TrackError> {
        let path = path.into();
        match value {
            Value::Mapping(raw) => Ok(Self::from_parts(raw, path)),
            other => Err(TrackError::type_mismatch(
                path,
                Kind::Mapping.label(),
                other.kind(),
            )),
        }
    }

    /// Wrap a mapping the caller already holds, as a root. Cannot fail.
    pub fn from_mapping(raw: &'a Mapping) -> Self {
        Self::from_parts(raw, String::new())
    }

    pub(super) fn from_parts(raw: &'a Mapping, path: String) -> Self {
        Self {
            raw,
            path,
            accessed: RefCell::default(),
            children: RefCell::default(),
        }
    }

    // ========================================================================
    // tracked reads
    // ========================================================================

    /// Read `key`, failing if it is absent.
    pub fn get(&self, key: &str) -> Result<Tracked<'a>, TrackError> {
        self.get_opt(key).ok_or_else(|| TrackError::KeyNotFound {
            path: path::child_key(&self.path, key),
        })
    }

    /// Read `key` if present. A missing key is not marked.
    pub fn get_opt(&self, key: &str) -> Option<Tracked<'a>> {
        let raw: &'a Mapping = self.raw;
        let (key, value) = raw.get_key_value(key)?;
        self.accessed.borrow_mut().insert(key.as_str());
        Some(self.wrap(key, value))
    }

    /// Read `key`, falling back to `default` without marking anything.
    pub fn get_or(&self, key: &str, default: Tracked<'a>) -> Tracked<'a> {
        self.get_opt(key).unwrap_or(default)
    }

    /// Read `key` and require a mapping.
    pub fn mapping(&self, key: &str) -> Result<Rc<TrackedMapping<'a>>, TrackError> {
        match self.get(key)? {
            Tracked::Mapping(map) => Ok(map),
            other => Err(expect_kind(self.child_path(key), Kind::Mapping, &other)),
        }
    }

    /// Read `key` and require a sequence.
    pub fn sequence(&self, key: &str) -> Result<Rc<TrackedSequence<'a>>, TrackError> {
        match self.get(key)? {
            Tracked::Sequence(seq) => Ok(seq),
            other => Err(expect_kind(self.child_path(key), Kind::Sequence, &other)),
        }
    }

    /// Read `key` and require a scalar.
    pub fn scalar(&self, key: &str) -> Result<&'a Scalar, TrackError> {
        match self.get(key)? {
            Tracked::Scalar(scalar) => Ok(scalar),
            other => Err(expect_kind(self.child_path(key), Kind::Scalar, &other)),
        }
    }

    /// Wrapped values in raw order.
    ///
    /// Every key is marked when this is called, whether or not the iterator
    /// is drained.
    pub fn values(&self) -> impl Iterator<Item = Tracked<'a>> + '_ {
        self.mark_all_accessed();
        let raw: &'a Mapping = self.raw;
        raw.iter().map(move |(key, value)| self.wrap(key, value))
    }

    /// `(key, wrapped value)` pairs in raw order. Marks like [`Self::values`].
    pub fn items(&self) -> impl Iterator<Item = (&'a str, Tracked<'a>)> + '_ {
        self.mark_all_accessed();
        let raw: &'a Mapping = self.raw;
        raw.iter()
            .map(move |(key, value)| (key.as_str(), self.wrap(key, value)))
    }

    // ========================================================================
    // inspection (never marks)
    // ========================================================================

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn keys(&self) -> Keys<'a> {
        let raw: &'a Mapping = self.raw;
        raw.keys().map(String::as_str as fn(&String) -> &str)
    }

    /// Same as [`Self::keys`].
    pub fn iter(&self) -> Keys<'a> {
        self.keys()
    }

    /// Underlying mapping. Reads through it are not tracked.
    pub fn raw(&self) -> &'a Mapping {
        self.raw
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Keys marked at this level.
    pub fn accessed_keys(&self) -> BTreeSet<&'a str> {
        self.accessed.borrow().iter().copied().collect()
    }

    // ========================================================================
    // explicit marking
    // ========================================================================

    /// Mark keys as consumed without reading them, e.g. for a section that is
    /// forwarded wholesale to another subsystem.
    ///
    /// Keys that do not exist are ignored.
    pub fn mark_accessed<I>(&self, keys: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let raw: &'a Mapping = self.raw;
        let mut accessed = self.accessed.borrow_mut();
        for key in keys {
            let key = key.as_ref();
            match raw.get_key_value(key) {
                Some((key, _)) => {
                    accessed.insert(key.as_str());
                }
                None => {
                    crate::debug!("track"; "ignoring unknown key `{}`", self.child_path(key));
                }
            }
        }
    }

    /// Mark every key at this level. Children are not touched.
    pub fn mark_all_accessed(&self) {
        let raw: &'a Mapping = self.raw;
        self.accessed
            .borrow_mut()
            .extend(raw.keys().map(String::as_str));
    }

    // ========================================================================
    // report
    // ========================================================================

    /// Sorted dotted paths of every entry that was never read.
    ///
    /// - unmarked key: reported as a whole, without descending
    /// - marked key with a cached wrapper: that wrapper's report
    /// - marked key without a wrapper: fully consumed
    ///
    /// The last rule also covers container values marked through
    /// [`Self::mark_accessed`] and never read, so their contents are not
    /// reported.
    pub fn unaccessed(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_unaccessed(&mut out);
        out.sort_unstable();
        out
    }

    pub(super) fn collect_unaccessed(&self, out: &mut Vec<String>) {
        let accessed = self.accessed.borrow();
        let children = self.children.borrow();
        for key in self.raw.keys() {
            let key = key.as_str();
            if !accessed.contains(key) {
                out.push(self.child_path(key));
            } else if let Some(child) = children.get(key) {
                child.collect_unaccessed(out);
            }
        }
    }

    // ========================================================================
    // internals
    // ========================================================================

    fn child_path(&self, key: &str) -> String {
        path::child_key(&self.path, key)
    }

    fn wrap(&self, key: &'a str, value: &'a Value) -> Tracked<'a> {
        wrap_child(&self.children, key, value, || self.child_path(key))
    }
}

/// Key iterator of a [`TrackedMapping`].
pub type Keys<'a> = std::iter::Map<indexmap::map::Keys<'a, String, Value>, fn(&String) -> &str>;

impl<'a> IntoIterator for &TrackedMapping<'a> {
    type Item = &'a str;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

impl fmt::Display for TrackedMapping<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackedMapping({}/{} keys accessed, path={:?})",
            self.accessed.borrow().len(),
            self.raw.len(),
            self.path
        )
    }
}

impl PartialEq for TrackedMapping<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialEq<Mapping> for TrackedMapping<'_> {
    fn eq(&self, other: &Mapping) -> bool {
        self.raw == other
    }
}

// ============================================================================
// tests
// ============================================================================
