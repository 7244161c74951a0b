//! The structural diff engine.

use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use serde::Serialize;

use super::error::DiffError;
use super::model::Diff;
use crate::inspect::{Inspector, Kind, Node};
use crate::value::Value;

/// Named types compared by value instead of field by field: a timestamp and
/// a UUID. Their fields are representation details, not diff targets.
pub const DIRECTLY_COMPARABLE: &[&str] = &["SystemTime", "Uuid"];

static DEFAULT_DIFFER: Lazy<Differ> = Lazy::new(Differ::new);

/// Diffs two values with the default directly-comparable list.
///
/// See [`Differ::diff`].
pub fn diff<A, B>(a: &A, b: &B) -> Result<Diff, DiffError>
where
    A: ?Sized + Serialize,
    B: ?Sized + Serialize,
{
    DEFAULT_DIFFER.diff(a, b)
}

/// Diffs two records with the default directly-comparable list.
///
/// See [`Differ::diff_record`].
pub fn diff_record<A, B>(a: &A, b: &B) -> Result<Diff, DiffError>
where
    A: ?Sized + Serialize,
    B: ?Sized + Serialize,
{
    DEFAULT_DIFFER.diff_record(a, b)
}

/// DifferBuilder configures a [`Differ`].
#[derive(Debug, Clone)]
pub struct DifferBuilder {
    comparable: BTreeSet<String>,
}

impl Default for DifferBuilder {
    fn default() -> Self {
        DifferBuilder {
            comparable: DIRECTLY_COMPARABLE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DifferBuilder {
    /// Creates a builder seeded with [`DIRECTLY_COMPARABLE`].
    pub fn new() -> Self {
        DifferBuilder::default()
    }

    /// Adds a type name to compare by value instead of decomposing it.
    pub fn directly_comparable(mut self, name: impl Into<String>) -> Self {
        self.comparable.insert(name.into());
        self
    }

    /// Drops every directly-comparable name added so far, defaults included.
    pub fn without_defaults(mut self) -> Self {
        self.comparable.clear();
        self
    }

    pub fn build(self) -> Differ {
        Differ {
            comparable: self.comparable,
        }
    }
}

/// Differ compares two values of the same type and describes where they
/// disagree.
#[derive(Debug, Clone)]
pub struct Differ {
    comparable: BTreeSet<String>,
}

impl Default for Differ {
    fn default() -> Self {
        Differ::new()
    }
}

impl Differ {
    pub fn new() -> Self {
        DifferBuilder::new().build()
    }

    pub fn builder() -> DifferBuilder {
        DifferBuilder::new()
    }

    pub fn is_directly_comparable(&self, name: &str) -> bool {
        self.comparable.contains(name)
    }

    /// Recursively compares `a` and `b`.
    ///
    /// Returns [`Diff::Equal`] when nothing differs. When the two values have
    /// different types the result is `Err(DiffError::TypeMismatch)`, whose
    /// [`DiffError::diff`] carries the matching [`Diff::TypeMismatch`].
    /// Mismatches further down the tree do not fail the call; they are
    /// recorded as entries next to the other differences.
    pub fn diff<A, B>(&self, a: &A, b: &B) -> Result<Diff, DiffError>
    where
        A: ?Sized + Serialize,
        B: ?Sized + Serialize,
    {
        check_types::<A, B>()?;
        let a = self.inspect(a)?;
        let b = self.inspect(b)?;
        top_level(self.compare(&a, &b))
    }

    /// Like [`Differ::diff`], but `a` must be a record (a struct, or an
    /// `Option` of one that is present).
    pub fn diff_record<A, B>(&self, a: &A, b: &B) -> Result<Diff, DiffError>
    where
        A: ?Sized + Serialize,
        B: ?Sized + Serialize,
    {
        check_types::<A, B>()?;
        let a = self.inspect(a)?;
        let b = self.inspect(b)?;

        let record = a.some().unwrap_or(&a);
        if !matches!(record.kind, Kind::Record(_) | Kind::Opaque(_)) {
            return Err(DiffError::NotARecord {
                type_name: type_name::<A>().to_string(),
            });
        }
        top_level(self.compare(&a, &b))
    }

    fn inspect<T: ?Sized + Serialize>(&self, value: &T) -> Result<Node, DiffError> {
        Inspector::new(&self.comparable)
            .inspect(value)
            .map_err(|source| DiffError::Inspect {
                type_name: type_name::<T>().to_string(),
                source,
            })
    }

    /// Type gate, then one level of optional indirection, then kind dispatch.
    fn compare(&self, a: &Node, b: &Node) -> Diff {
        if let Some(message) = a.failure().or_else(|| b.failure()) {
            return Diff::Error(message.to_string());
        }
        if a.type_name != b.type_name {
            return Diff::type_mismatch(a.type_name, b.type_name);
        }
        match (&a.kind, &b.kind) {
            (Kind::Optional(Some(x)), Kind::Optional(Some(y))) => {
                if x.type_name != y.type_name {
                    return Diff::type_mismatch(x.type_name, y.type_name);
                }
                self.dispatch(x, y)
            }
            (Kind::Optional(None), Kind::Optional(None)) => Diff::Equal,
            (Kind::Optional(_), Kind::Optional(_)) => Diff::Changed(a.to_value(), b.to_value()),
            _ => self.dispatch(a, b),
        }
    }

    fn dispatch(&self, a: &Node, b: &Node) -> Diff {
        match (&a.kind, &b.kind) {
            (Kind::Record(x), Kind::Record(y)) => self.diff_fields(x, y),
            (Kind::Sequence(x), Kind::Sequence(y)) => self.diff_sequence(x, y),
            (Kind::Map(x), Kind::Map(y)) => self.diff_map(x, y),
            (
                Kind::Variant {
                    variant: va,
                    payload: pa,
                },
                Kind::Variant {
                    variant: vb,
                    payload: pb,
                },
            ) if va == vb => self.compare(pa, pb),
            // Opaque types, leaves, nested options and differing variants.
            _ => compare_values(a.to_value(), b.to_value()),
        }
    }

    fn diff_fields(&self, a: &[(&'static str, Node)], b: &[(&'static str, Node)]) -> Diff {
        let mut diff = BTreeMap::new();
        for (name, a_field) in a {
            let entry = match b.iter().find(|(n, _)| n == name) {
                Some((_, b_field)) => self.compare_field(a_field, b_field),
                None => removed(a_field),
            };
            if !entry.is_equal() {
                diff.insert(name.to_string(), entry);
            }
        }
        // Fields skipped on one side only (skip_serializing_if).
        for (name, b_field) in b {
            if !a.iter().any(|(n, _)| n == name) {
                diff.insert(name.to_string(), added(b_field));
            }
        }
        Diff::record(diff)
    }

    /// Fields get one level of indirection unwrapped before the regular
    /// comparison, which may unwrap one more.
    fn compare_field(&self, a: &Node, b: &Node) -> Diff {
        match (a.some(), b.some()) {
            (Some(x), Some(y)) if a.type_name == b.type_name => self.compare(x, y),
            _ => self.compare(a, b),
        }
    }

    fn diff_sequence(&self, a: &[Node], b: &[Node]) -> Diff {
        let mut diff = BTreeMap::new();
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            let entry = self.compare(x, y);
            if !entry.is_equal() {
                diff.insert(i, entry);
            }
        }

        let shared = a.len().min(b.len());
        for (i, x) in a.iter().enumerate().skip(shared) {
            diff.insert(i, removed(x));
        }
        for (i, y) in b.iter().enumerate().skip(shared) {
            diff.insert(i, added(y));
        }
        Diff::sequence(diff)
    }

    fn diff_map(&self, a: &[(Value, Node)], b: &[(Value, Node)]) -> Diff {
        // Start from "everything in a is missing from b" and settle each of
        // b's keys against it.
        let mut diff: BTreeMap<Value, Diff> = a
            .iter()
            .map(|(key, value)| (key.clone(), removed(value)))
            .collect();
        let a_entries: BTreeMap<&Value, &Node> = a.iter().map(|(k, v)| (k, v)).collect();

        for (key, b_value) in b {
            match a_entries.get(key) {
                Some(a_value) => match self.compare(a_value, b_value) {
                    Diff::Equal => {
                        diff.remove(key);
                    }
                    entry => {
                        diff.insert(key.clone(), entry);
                    }
                },
                None => {
                    diff.insert(key.clone(), added(b_value));
                }
            }
        }
        Diff::map(diff)
    }
}

fn check_types<A: ?Sized, B: ?Sized>() -> Result<(), DiffError> {
    let (left, right) = (type_name::<A>(), type_name::<B>());
    if left == right {
        Ok(())
    } else {
        Err(DiffError::type_mismatch(left, right))
    }
}

/// A mismatch at the root is both the result and an error.
fn top_level(diff: Diff) -> Result<Diff, DiffError> {
    match diff {
        Diff::TypeMismatch { left, right } => Err(DiffError::TypeMismatch { left, right }),
        diff => Ok(diff),
    }
}

fn removed(node: &Node) -> Diff {
    match node.failure() {
        Some(message) => Diff::Error(message.to_string()),
        None => Diff::Removed(node.to_value()),
    }
}

fn added(node: &Node) -> Diff {
    match node.failure() {
        Some(message) => Diff::Error(message.to_string()),
        None => Diff::Added(node.to_value()),
    }
}

fn compare_values(a: Value, b: Value) -> Diff {
    if a == b {
        Diff::Equal
    } else {
        Diff::Changed(a, b)
    }
}
