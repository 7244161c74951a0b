//! Diff module - recursive structural comparison of two values.
//!
//! [`diff`] compares two values of the same type and returns a sparse
//! [`Diff`] tree describing only the places where they disagree. The
//! renderers turn that tree into JSON or YAML text.

mod engine;
mod error;
mod model;
mod render;

#[cfg(test)]
mod diff_test;

pub use engine::*;
pub use error::*;
pub use model::*;
pub use render::*;
