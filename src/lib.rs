//! cURL command lexer, validators, formatter, and variable substitution.
//!
//! The text processing core of a cell-based REST client: each cell holds
//! a curl command that may span lines and reference variables as `$name`
//! or `${name}`. This crate classifies that text into positioned parts,
//! reports problems as data for editor markers, re-formats it into
//! canonical multi-line form, and resolves or inserts variable
//! references.
//!
//! # Quick start
//!
//! ## Format a command
//!
//! ```
//! use curlcell::{FormatCurlOptions, format_curl};
//!
//! let output = format_curl("curl -X POST 'https://api.test/users' -v", &FormatCurlOptions::new());
//! assert_eq!(output, "curl \\\n  -X POST 'https://api.test/users' \\\n  -v");
//! ```
//!
//! ## Validate and resolve variables
//!
//! ```
//! use curlcell::{Platform, Variable, curl_with_values, validate};
//!
//! let vars = [Variable::manual("id", "42")];
//! let text = "curl 'https://api.test/users/'$id";
//!
//! assert!(validate(text, &vars, Platform::Unix).is_empty());
//! assert_eq!(curl_with_values(text, &vars), "curl 'https://api.test/users/42'");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod formatter;
pub mod grouper;
pub mod insert;
pub mod json;
pub mod lexer;
pub mod options;
pub mod platform;
pub mod substitute;
pub mod token;
pub mod tokenizer;
pub mod validator;
pub mod variable;

pub use formatter::{FormatCurlOptions, format_curl};
pub use grouper::group;
pub use insert::{InsertError, Insertion, insert_variable};
pub use json::{JsonFormatError, format_bash_json_string};
pub use lexer::{lex, lex_words};
pub use platform::Platform;
pub use substitute::{
    ExecOptions, SubstituteError, build_exec_command, curl_with_values, curl_with_values_strict,
};
pub use token::{CurlPart, PartKind, Token};
pub use validator::{
    MissingVariableError, SyntaxError, SyntaxErrorKind, UnsupportedOptionError, ValidationError,
    validate,
};
pub use variable::{Variable, VariableKeyError, VariableSource, dedupe_variables, find_variable};

/// Unified error type covering variable checks and exec substitution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A variable could not be resolved for execution.
    #[error("{0}")]
    Substitute(#[from] SubstituteError),
    /// A variable key was rejected.
    #[error("{0}")]
    VariableKey(#[from] VariableKeyError),
}

/// Check the keys of user-defined variables and build the command handed
/// to the process runner in one step.
pub fn prepare_exec(
    text: &str,
    variables: &[Variable],
    options: &ExecOptions,
) -> Result<String, Error> {
    for variable in variables
        .iter()
        .filter(|v| v.source == VariableSource::Manual)
    {
        Variable::validate_key(&variable.key)?;
    }
    Ok(build_exec_command(text, variables, options)?)
}
