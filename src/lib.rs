//! # structdiff
//!
//! Structural diff of arbitrary Rust values.
//!
//! Given two values of the same type, [`diff()`] recursively works out whether
//! they are equal and, if not, returns a [`Diff`] tree describing exactly
//! where and how they differ: per record field, per sequence index, per map
//! key. Only the places that differ appear in the tree.
//!
//! ```
//! use serde::Serialize;
//! use structdiff::{diff, Diff};
//!
//! #[derive(Serialize)]
//! struct Item {
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let a = Item { name: "x".into(), tags: vec!["a".into(), "b".into()] };
//! let b = Item { name: "y".into(), tags: vec!["a".into(), "c".into()] };
//!
//! let result = diff(&a, &b).unwrap();
//! assert_eq!(result.to_json().unwrap(), r#"{"name":["x","y"],"tags":{"1":["b","c"]}}"#);
//! assert_eq!(diff(&a, &a).unwrap(), Diff::Equal);
//! ```
//!
//! ## Modules
//!
//! - [`diff`](mod@diff) - The diff engine, its result type and text renderers
//! - [`inspect`] - Turns `Serialize` values into a tree of structural kinds
//! - [`value`] - Owned snapshots of leaf values carried by diff results
//! - [`mock`] - In-memory store test double whose contents tests check with the diff engine

pub mod diff;
pub mod inspect;
pub mod mock;
pub mod value;

pub use diff::{
    diff, diff_as_indented_json, diff_as_json, diff_as_yaml, diff_record, Diff, DiffError,
    Differ, DifferBuilder, RenderError,
};
pub use mock::{MockDb, MockTx, Model, StoreError};
pub use value::Value;
