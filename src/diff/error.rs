//! Diff and render errors.

use thiserror::Error;

use super::model::Diff;
use crate::inspect::InspectError;

/// DiffError is returned when two values could not be diffed normally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    /// The two values have different types. The mismatch itself is the
    /// payload: see [`DiffError::diff`].
    #[error("types don't match -- {left}/{right}")]
    TypeMismatch { left: String, right: String },

    /// A record-only comparison was given a value that is not a record.
    #[error("{type_name} is not a record")]
    NotARecord { type_name: String },

    /// A value's `Serialize` impl failed while it was being inspected.
    #[error("failed to inspect {type_name}: {source}")]
    Inspect {
        type_name: String,
        #[source]
        source: InspectError,
    },
}

impl DiffError {
    pub fn type_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        DiffError::TypeMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Returns the diff that accompanies this error, if any.
    ///
    /// A type mismatch is reported both as an error and as a
    /// [`Diff::TypeMismatch`] result; callers that render or record diffs
    /// should use this rather than dropping the result.
    pub fn diff(&self) -> Option<Diff> {
        match self {
            DiffError::TypeMismatch { left, right } => {
                Some(Diff::type_mismatch(left.clone(), right.clone()))
            }
            _ => None,
        }
    }
}

/// RenderError is returned by the text renderers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The diff failed but still produced a result, which was rendered.
    #[error("{source}")]
    Diff { text: String, source: DiffError },

    /// The diff failed without producing a result.
    #[error(transparent)]
    Failed(#[from] DiffError),

    #[error("failed to encode diff as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode diff as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RenderError {
    /// Returns the rendered text carried alongside the error, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            RenderError::Diff { text, .. } => Some(text),
            _ => None,
        }
    }
}
