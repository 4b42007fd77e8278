//! Replacing variable references with their values.

use crate::formatter::{FormatCurlOptions, format_curl};
use crate::grouper::group;
use crate::lexer::lex;
use crate::platform::Platform;
use crate::token::{CurlPart, PartKind};
use crate::variable::{Variable, find_variable, reference_name};

/// Error produced while resolving a command for execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstituteError {
    /// A bare reference has no value, so the request cannot be sent.
    #[error("Variable not found: {0}")]
    VariableNotFound(String),
}

/// Where and how an executable command is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Replaces the leading `curl` keyword.
    pub curl_path: String,
    /// File the response body is written to.
    pub output_path: String,
    pub continuation: char,
}

impl ExecOptions {
    /// Options for `platform`, writing the body to `output_path`.
    #[must_use]
    pub fn new(platform: Platform, output_path: impl Into<String>) -> Self {
        Self {
            curl_path: platform.curl_binary().to_string(),
            output_path: output_path.into(),
            continuation: platform.continuation(),
        }
    }

    #[must_use]
    pub fn with_curl_path(mut self, path: impl Into<String>) -> Self {
        self.curl_path = path.into();
        self
    }
}

/// Substitute variable values into a command (`getCurlWithValue`).
///
/// Bare references become single-quoted literals; references inside
/// double quotes become escaped text. Unknown references are left as
/// written.
#[must_use]
pub fn curl_with_values(text: &str, variables: &[Variable]) -> String {
    let parts = lex(text)
        .into_iter()
        .map(|part| match resolve_part(&part, variables) {
            Some(resolved) => resolved,
            None => {
                if matches!(part.kind, PartKind::Variable | PartKind::EscapedVariable) {
                    tracing::debug!(variable = %part.value, "leaving unresolved variable in place");
                }
                part
            }
        })
        .collect::<Vec<_>>();
    join(&parts)
}

/// Like [`curl_with_values`], but a bare reference without a value is
/// an error.
///
/// The response globals (`res_body`, `res_headers`) pass validation
/// without a definition, but here they resolve only when the caller
/// includes them in `variables` with the previous response at send time.
///
/// # Errors
///
/// Returns `SubstituteError::VariableNotFound` for the first unresolved
/// bare reference.
pub fn curl_with_values_strict(text: &str, variables: &[Variable]) -> Result<String, SubstituteError> {
    let mut parts = Vec::new();
    for part in lex(text) {
        match resolve_part(&part, variables) {
            Some(resolved) => parts.push(resolved),
            None if part.kind == PartKind::Variable => {
                let name = reference_name(&part.value).unwrap_or(&part.value);
                return Err(SubstituteError::VariableNotFound(name.to_string()));
            }
            None => parts.push(part),
        }
    }
    Ok(join(&parts))
}

/// Build the command handed to the process runner.
///
/// Values are substituted strictly, comments dropped, `-s -v
/// --compressed --output <path>` injected, and the `curl` keyword
/// replaced with the configured executable.
///
/// # Errors
///
/// Returns `SubstituteError` when a bare reference cannot be resolved,
/// including a response global the caller did not supply.
pub fn build_exec_command(
    text: &str,
    variables: &[Variable],
    options: &ExecOptions,
) -> Result<String, SubstituteError> {
    let resolved = curl_with_values_strict(text, variables)?;
    let format_options = FormatCurlOptions::new()
        .without_comments()
        .with_continuation(options.continuation)
        .with_option("-s", "")
        .with_option("-v", "")
        .with_option("--compressed", "")
        .with_option("--output", &options.output_path);
    let formatted = format_curl(&resolved, &format_options);

    let command = match formatted.strip_prefix("curl") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            format!("{}{rest}", options.curl_path)
        }
        _ => formatted,
    };
    tracing::debug!(command = %command, "built exec command");
    Ok(command)
}

fn resolve_part(part: &CurlPart, variables: &[Variable]) -> Option<CurlPart> {
    let value = match part.kind {
        PartKind::Variable => single_quote(&find_variable(&part.value, variables)?.display_value()),
        PartKind::EscapedVariable => {
            escape_double_quoted(&find_variable(&part.value, variables)?.display_value())
        }
        _ => return None,
    };
    Some(CurlPart {
        kind: PartKind::Value,
        value,
        ..part.clone()
    })
}

fn join(parts: &[CurlPart]) -> String {
    group(parts).into_iter().map(|p| p.value).collect()
}

/// Quote `value` as one shell word, closing and reopening around `'`.
#[must_use]
pub fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Escape `value` for the inside of a double-quoted string.
#[must_use]
pub fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
