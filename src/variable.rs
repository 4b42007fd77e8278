//! Variables referenced from curl text as `$key` or `${key}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names that always resolve: the previous response of the cell.
pub const GLOBAL_VARIABLES: [&str; 2] = ["res_body", "res_headers"];

/// Where a variable's value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    /// Entered by the user.
    #[default]
    Manual,
    /// Extracted from a response by a post-request script.
    Response,
}

/// A named value available to curl cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub source: VariableSource,
}

/// Reason a user-supplied variable key is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableKeyError {
    #[error("variable name is empty")]
    Empty,
    #[error("variable name `{0}` starts with `_`, which is reserved")]
    Reserved(String),
    #[error("variable name `{key}` contains `{ch}`")]
    InvalidCharacter { key: String, ch: char },
}

impl Variable {
    /// A user-defined variable.
    pub fn manual(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            source: VariableSource::Manual,
        }
    }

    /// A variable extracted from a response.
    pub fn response(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            source: VariableSource::Response,
        }
    }

    /// Whether `text` is exactly `$key` or `${key}`.
    #[must_use]
    pub fn is_referenced_by(&self, text: &str) -> bool {
        reference_name(text) == Some(self.key.as_str())
    }

    /// The value as it is spliced into a command: strings verbatim,
    /// everything else as JSON, nothing for a missing value.
    #[must_use]
    pub fn display_value(&self) -> String {
        match &self.value {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Check a key a user is about to create.
    ///
    /// # Errors
    ///
    /// Rejects empty keys, keys with the reserved `_` prefix, and keys
    /// that could not be written as a `$key` reference.
    pub fn validate_key(key: &str) -> Result<(), VariableKeyError> {
        if key.is_empty() {
            return Err(VariableKeyError::Empty);
        }
        if key.starts_with('_') {
            return Err(VariableKeyError::Reserved(key.to_string()));
        }
        if let Some(ch) = key.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            return Err(VariableKeyError::InvalidCharacter {
                key: key.to_string(),
                ch,
            });
        }
        Ok(())
    }
}

/// The name inside a `$name` or `${name}` reference.
#[must_use]
pub fn reference_name(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('$')?;
    let name = match rest.strip_prefix('{') {
        Some(braced) => braced.strip_suffix('}')?,
        None => rest,
    };
    (!name.is_empty()).then_some(name)
}

/// Find the variable a part's text refers to
/// (`findVariableFromCurlPartValue`). First match wins.
#[must_use]
pub fn find_variable<'a>(text: &str, variables: &'a [Variable]) -> Option<&'a Variable> {
    variables.iter().find(|v| v.is_referenced_by(text))
}

/// Whether a reference resolves against `variables` or the globals.
#[must_use]
pub fn is_defined(text: &str, variables: &[Variable]) -> bool {
    find_variable(text, variables).is_some()
        || reference_name(text).is_some_and(|name| GLOBAL_VARIABLES.contains(&name))
}

/// Collapse variables sharing a key; the last definition wins and keeps
/// the position of the first.
#[must_use]
pub fn dedupe_variables(variables: impl IntoIterator<Item = Variable>) -> Vec<Variable> {
    let mut out: Vec<Variable> = Vec::new();
    for variable in variables {
        match out.iter_mut().find(|v| v.key == variable.key) {
            Some(existing) => *existing = variable,
            None => out.push(variable),
        }
    }
    out
}
