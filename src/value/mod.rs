//! Value module - owned snapshots of inspected values.
//!
//! Diff results carry these as the two sides of a difference.

mod value;

pub use value::*;
