//! The diff result type.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::value::Value;

const MISMATCHED_TYPES: &str = "mismatched types";
const ERROR: &str = "error";

/// Diff describes where two compared values disagree.
///
/// Container variants are sparse: a field, index or key whose comparison came
/// out equal is never stored, so a missing entry means "equal". An empty
/// container is never produced either; it collapses to [`Diff::Equal`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Diff {
    /// No difference.
    #[default]
    Equal,
    /// Two unequal leaves, `(a, b)`.
    Changed(Value, Value),
    /// Present only on the `a` side: `(a, absent)`.
    Removed(Value),
    /// Present only on the `b` side: `(absent, b)`.
    Added(Value),
    /// Differing fields of a record, by field name.
    Record(BTreeMap<String, Diff>),
    /// Differing positions of a sequence, by index.
    Sequence(BTreeMap<usize, Diff>),
    /// Differing or one-sided entries of a map, by key.
    Map(BTreeMap<Value, Diff>),
    /// The two sides have different types; nothing below was compared.
    TypeMismatch { left: String, right: String },
    /// A nested value could not be inspected, so it was not compared.
    Error(String),
}

impl Diff {
    pub fn type_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Diff::TypeMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Builds a record diff, or `Equal` when no field differs.
    pub fn record(fields: BTreeMap<String, Diff>) -> Self {
        if fields.is_empty() {
            Diff::Equal
        } else {
            Diff::Record(fields)
        }
    }

    /// Builds a sequence diff, or `Equal` when no position differs.
    pub fn sequence(items: BTreeMap<usize, Diff>) -> Self {
        if items.is_empty() {
            Diff::Equal
        } else {
            Diff::Sequence(items)
        }
    }

    /// Builds a map diff, or `Equal` when no key differs.
    pub fn map(entries: BTreeMap<Value, Diff>) -> Self {
        if entries.is_empty() {
            Diff::Equal
        } else {
            Diff::Map(entries)
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Diff::Equal)
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Diff::TypeMismatch { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Diff::Error(_))
    }

    /// Returns the diff recorded for a record field.
    pub fn field(&self, name: &str) -> Option<&Diff> {
        match self {
            Diff::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Returns the diff recorded for a sequence position.
    pub fn index(&self, index: usize) -> Option<&Diff> {
        match self {
            Diff::Sequence(items) => items.get(&index),
            _ => None,
        }
    }

    /// Returns the diff recorded for a map key.
    pub fn key(&self, key: impl Into<Value>) -> Option<&Diff> {
        match self {
            Diff::Map(entries) => entries.get(&key.into()),
            _ => None,
        }
    }

    /// Returns the two sides of a leaf diff. Absent sides are `None`.
    pub fn sides(&self) -> Option<(Option<&Value>, Option<&Value>)> {
        match self {
            Diff::Changed(a, b) => Some((Some(a), Some(b))),
            Diff::Removed(a) => Some((Some(a), None)),
            Diff::Added(b) => Some((None, Some(b))),
            _ => None,
        }
    }

    /// Counts the entries directly under a container diff. Leaf diffs count
    /// as one, `Equal` as zero.
    pub fn len(&self) -> usize {
        match self {
            Diff::Equal => 0,
            Diff::Record(fields) => fields.len(),
            Diff::Sequence(items) => items.len(),
            Diff::Map(entries) => entries.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Diff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Diff::Equal => serializer.serialize_unit(),
            Diff::Changed(a, b) => serialize_pair(serializer, Some(a), Some(b)),
            Diff::Removed(a) => serialize_pair(serializer, Some(a), None),
            Diff::Added(b) => serialize_pair(serializer, None, Some(b)),
            Diff::Record(fields) => serializer.collect_map(fields),
            Diff::Sequence(items) => serializer.collect_map(items),
            Diff::Map(entries) => serializer.collect_map(entries),
            Diff::TypeMismatch { left, right } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(MISMATCHED_TYPES, &[left, right])?;
                map.end()
            }
            Diff::Error(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ERROR, message)?;
                map.end()
            }
        }
    }
}

fn serialize_pair<S: Serializer>(
    serializer: S,
    a: Option<&Value>,
    b: Option<&Value>,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(&a)?;
    seq.serialize_element(&b)?;
    seq.end()
}
