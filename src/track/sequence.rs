//! Tracked view over a [`Sequence`].

use super::{Tracked, TrackedMapping, expect_kind, path, wrap_child};
use crate::error::TrackError;
use crate::value::{Kind, Scalar, Sequence, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Sequence wrapper that records which indices are read.
///
/// Plain iteration (`iter`, `for item in &seq`) yields raw elements and marks
/// nothing. Use [`Self::values`] to consume every element with tracking.
#[derive(Debug)]
pub struct TrackedSequence<'a> {
    raw: &'a Sequence,
    path: String,
    accessed: RefCell<FxHashSet<usize>>,
    children: RefCell<FxHashMap<usize, Tracked<'a>>>,
}

impl<'a> TrackedSequence<'a> {
    /// Wrap a root value, which must be a sequence.
    pub fn new(value: &'a Value) -> Result<Self, TrackError> {
        Self::with_path(value, String::new())
    }

    /// Wrap a value located at `path` in some larger tree.
    pub fn with_path(value: &'a Value, path: impl Into<String>) -> Result<Self, TrackError> {
        let path = path.into();
        match value {
            Value::Sequence(raw) => Ok(Self::from_parts(raw, path)),
            other => Err(TrackError::type_mismatch(
                path,
                Kind::Sequence.label(),
                other.kind(),
            )),
        }
    }

    /// Wrap a sequence the caller already holds, as a root. Cannot fail.
    pub fn from_sequence(raw: &'a Sequence) -> Self {
        Self::from_parts(raw, String::new())
    }

    pub(super) fn from_parts(raw: &'a Sequence, path: String) -> Self {
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

    /// Read element `index`, failing if it is out of range.
    pub fn get(&self, index: usize) -> Result<Tracked<'a>, TrackError> {
        self.get_opt(index)
            .ok_or_else(|| TrackError::IndexOutOfRange {
                path: self.child_path(index),
                index,
                len: self.raw.len(),
            })
    }

    /// Read element `index` if in range. Out-of-range reads mark nothing.
    pub fn get_opt(&self, index: usize) -> Option<Tracked<'a>> {
        let raw: &'a Sequence = self.raw;
        let value = raw.get(index)?;
        self.accessed.borrow_mut().insert(index);
        Some(self.wrap(index, value))
    }

    pub fn mapping(&self, index: usize) -> Result<Rc<TrackedMapping<'a>>, TrackError> {
        match self.get(index)? {
            Tracked::Mapping(map) => Ok(map),
            other => Err(expect_kind(self.child_path(index), Kind::Mapping, &other)),
        }
    }

    pub fn sequence(&self, index: usize) -> Result<Rc<TrackedSequence<'a>>, TrackError> {
        match self.get(index)? {
            Tracked::Sequence(seq) => Ok(seq),
            other => Err(expect_kind(self.child_path(index), Kind::Sequence, &other)),
        }
    }

    pub fn scalar(&self, index: usize) -> Result<&'a Scalar, TrackError> {
        match self.get(index)? {
            Tracked::Scalar(scalar) => Ok(scalar),
            other => Err(expect_kind(self.child_path(index), Kind::Scalar, &other)),
        }
    }

    /// Wrapped elements in order. Every index is marked when this is called.
    pub fn values(&self) -> impl Iterator<Item = Tracked<'a>> + '_ {
        self.mark_all_accessed();
        let raw: &'a Sequence = self.raw;
        raw.iter()
            .enumerate()
            .map(move |(index, value)| self.wrap(index, value))
    }

    // ========================================================================
    // inspection (never marks)
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw elements, unwrapped and unmarked.
    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        let raw: &'a Sequence = self.raw;
        raw.iter()
    }

    /// Underlying sequence. Reads through it are not tracked.
    pub fn raw(&self) -> &'a Sequence {
        self.raw
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn accessed_indices(&self) -> BTreeSet<usize> {
        self.accessed.borrow().iter().copied().collect()
    }

    // ========================================================================
    // explicit marking
    // ========================================================================

    /// Mark indices as consumed without reading them. Out-of-range indices
    /// are ignored.
    pub fn mark_accessed(&self, indices: impl IntoIterator<Item = usize>) {
        let len = self.raw.len();
        let mut accessed = self.accessed.borrow_mut();
        for index in indices {
            if index < len {
                accessed.insert(index);
            } else {
                crate::debug!("track"; "ignoring out of range index `{}`", self.child_path(index));
            }
        }
    }

    pub fn mark_all_accessed(&self) {
        self.accessed.borrow_mut().extend(0..self.raw.len());
    }

    // ========================================================================
    // report
    // ========================================================================

    /// Sorted paths of every element that was never read, with the same rules
    /// as [`TrackedMapping::unaccessed`].
    pub fn unaccessed(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_unaccessed(&mut out);
        out.sort_unstable();
        out
    }

    pub(super) fn collect_unaccessed(&self, out: &mut Vec<String>) {
        let accessed = self.accessed.borrow();
        let children = self.children.borrow();
        for index in 0..self.raw.len() {
            if !accessed.contains(&index) {
                out.push(self.child_path(index));
            } else if let Some(child) = children.get(&index) {
                child.collect_unaccessed(out);
            }
        }
    }

    // ========================================================================
    // internals
    // ========================================================================

    fn child_path(&self, index: usize) -> String {
        path::child_index(&self.path, index)
    }

    fn wrap(&self, index: usize, value: &'a Value) -> Tracked<'a> {
        wrap_child(&self.children, index, value, || self.child_path(index))
    }
}

impl<'a> IntoIterator for &TrackedSequence<'a> {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for TrackedSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackedSequence({} items, {} accessed, path={:?})",
            self.raw.len(),
            self.accessed.borrow().len(),
            self.path
        )
    }
}

impl PartialEq for TrackedSequence<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialEq<Sequence> for TrackedSequence<'_> {
    fn eq(&self, other: &Sequence) -> bool {
        self.raw == other
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> Value {
        Value::Sequence(vec![
            Scalar::Integer(10).into(),
            Scalar::Integer(20).into(),
            Scalar::Integer(30).into(),
        ])
    }

    #[test]
    fn test_new_rejects_non_sequence() {
        let value = Value::Scalar(Scalar::Null);
        let err = TrackedSequence::new(&value).unwrap_err();
        assert!(matches!(
            err,
            TrackError::TypeMismatch {
                expected: "sequence",
                found: Kind::Scalar,
                ..
            }
        ));
    }

    #[test]
    fn test_from_sequence_root() {
        let value = numbers();
        let raw = value.as_sequence().unwrap();
        let seq = TrackedSequence::from_sequence(raw);

        assert_eq!(seq.path(), "");
        assert_eq!(seq.unaccessed(), ["[0]", "[1]", "[2]"]);

        assert_eq!(seq.get(1).unwrap(), Scalar::Integer(20));
        assert_eq!(seq.unaccessed(), ["[0]", "[2]"]);
    }

    #[test]
    fn test_get_scalar() {
        let value = numbers();
        let seq = TrackedSequence::new(&value).unwrap();
        assert_eq!(seq.get(0).unwrap(), Scalar::Integer(10));
        assert_eq!(seq.scalar(2).unwrap(), &Scalar::Integer(30));
        assert_eq!(seq.unaccessed(), ["[1]"]);
    }

    #[test]
    fn test_get_out_of_range() {
        let value = numbers();
        let seq = TrackedSequence::with_path(&value, "ports").unwrap();
        let err = seq.get(3).unwrap_err();
        assert_eq!(
            err,
            TrackError::IndexOutOfRange {
                path: "ports[3]".into(),
                index: 3,
                len: 3,
            }
        );
        assert!(seq.get_opt(7).is_none());
        assert!(seq.accessed_indices().is_empty());
    }

    #[test]
    fn test_iteration_does_not_mark() {
        let value = numbers();
        let seq = TrackedSequence::new(&value).unwrap();

        assert_eq!(seq.len(), 3);
        assert!(!seq.is_empty());
        let items: Vec<&Value> = seq.iter().collect();
        assert_eq!(items[1], &Value::Scalar(Scalar::Integer(20)));
        for _ in &seq {}

        assert_eq!(seq.unaccessed(), ["[0]", "[1]", "[2]"]);
    }

    #[test]
    fn test_values_marks_all() {
        let value = numbers();
        let seq = TrackedSequence::new(&value).unwrap();
        let values: Vec<_> = seq.values().collect();
        assert_eq!(values.len(), 3);
        assert!(seq.unaccessed().is_empty());
    }

    #[test]
    fn test_mark_accessed() {
        let value = numbers();
        let seq = TrackedSequence::with_path(&value, "ports").unwrap();
        seq.mark_accessed([0, 2, 9]);
        assert_eq!(seq.accessed_indices(), BTreeSet::from([0, 2]));
        assert_eq!(seq.unaccessed(), ["ports[1]"]);

        seq.mark_all_accessed();
        assert!(seq.unaccessed().is_empty());
    }

    #[test]
    fn test_nested_wrapping_is_stable() {
        let value = Value::from(serde_json::json!([{"a": 1}, [1]]));
        let seq = TrackedSequence::new(&value).unwrap();

        let first = seq.mapping(0).unwrap();
        let again = seq.mapping(0).unwrap();
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(first.path(), "[0]");

        let inner = seq.sequence(1).unwrap();
        assert_eq!(inner.path(), "[1]");
        assert_eq!(seq.unaccessed(), ["[0].a", "[1][0]"]);
    }

    #[test]
    fn test_display_and_eq() {
        let value = numbers();
        let seq = TrackedSequence::with_path(&value, "plugins").unwrap();
        seq.get(1).unwrap();
        assert_eq!(
            seq.to_string(),
            "TrackedSequence(3 items, 1 accessed, path=\"plugins\")"
        );
        assert!(seq == *value.as_sequence().unwrap());
        assert!(seq != vec![Value::Scalar(Scalar::Integer(3))]);
    }
}
