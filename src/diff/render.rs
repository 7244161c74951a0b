//! Text renderings of diff results.

use serde::Serialize;

use super::engine::diff;
use super::error::{DiffError, RenderError};
use super::model::Diff;

impl Diff {
    /// Renders the diff as compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Renders the diff as indented JSON.
    ///
    /// Every line after the first starts with `prefix`, followed by one copy
    /// of `indent` per nesting level.
    pub fn to_json_indented(&self, prefix: &str, indent: &str) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8.
        let text = String::from_utf8_lossy(&out);
        if prefix.is_empty() {
            return Ok(text.into_owned());
        }
        // Newlines inside strings are escaped, so every raw newline is a line break.
        Ok(text.replace('\n', &format!("\n{}", prefix)))
    }

    /// Renders the diff as YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Diffs `a` and `b` and renders the result as compact JSON.
///
/// On a type mismatch the rendered mismatch is returned inside
/// [`RenderError::Diff`] together with the error.
pub fn diff_as_json<A, B>(a: &A, b: &B) -> Result<String, RenderError>
where
    A: ?Sized + Serialize,
    B: ?Sized + Serialize,
{
    render(diff(a, b), |d| Ok(d.to_json()?))
}

/// Diffs `a` and `b` and renders the result as indented JSON.
pub fn diff_as_indented_json<A, B>(
    a: &A,
    b: &B,
    prefix: &str,
    indent: &str,
) -> Result<String, RenderError>
where
    A: ?Sized + Serialize,
    B: ?Sized + Serialize,
{
    render(diff(a, b), |d| Ok(d.to_json_indented(prefix, indent)?))
}

/// Diffs `a` and `b` and renders the result as YAML.
pub fn diff_as_yaml<A, B>(a: &A, b: &B) -> Result<String, RenderError>
where
    A: ?Sized + Serialize,
    B: ?Sized + Serialize,
{
    render(diff(a, b), |d| Ok(d.to_yaml()?))
}

/// Renders a diff outcome. A failed diff that still carries a result is
/// rendered and returned with its error.
pub fn render<F>(outcome: Result<Diff, DiffError>, encode: F) -> Result<String, RenderError>
where
    F: Fn(&Diff) -> Result<String, RenderError>,
{
    match outcome {
        Ok(diff) => encode(&diff),
        Err(source) => match source.diff() {
            Some(diff) => {
                let text = encode(&diff)?;
                Err(RenderError::Diff { text, source })
            }
            None => Err(RenderError::Failed(source)),
        },
    }
}
