//! Inspect module - turns any `Serialize` value into a tree of structural kinds.
//!
//! The diff engine never sees user types directly. Values are first walked
//! through serde into [`Node`]s, which carry a type name and one of a closed
//! set of kinds (record, sequence, map, optional, variant, scalar, opaque).

mod inspector;
mod node;

pub use inspector::*;
pub use node::*;
