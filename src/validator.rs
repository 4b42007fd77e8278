//! Validators reporting problems in a curl command as data.
//!
//! Each validator walks lexed parts and returns positioned errors for
//! editor markers. None of them fail: malformed input only produces
//! more errors.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::grouper::join_values;
use crate::lexer::lex;
use crate::options;
use crate::platform::Platform;
use crate::token::{CurlPart, PartKind};
use crate::variable::{Variable, is_defined};

/// A reference to a variable that is not defined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Variable not found: {variable} at line {line}, column {column}")]
pub struct MissingVariableError {
    /// The reference as written, `$name` or `${name}`.
    pub variable: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

/// A flag outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported option: {option} at line {line}, column {column}")]
pub struct UnsupportedOptionError {
    pub option: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

/// Classifies a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Arguments appear before the `curl` keyword.
    MissingCurl,
    /// Browser-hosted requests cannot reach loopback or private hosts.
    LocalAddress,
    /// More than one positional URL.
    MultipleUrls,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCurl => write!(f, "curl command is missing"),
            Self::LocalAddress => write!(
                f,
                "local IP addresses cannot be reached from the browser, \
                 use the desktop app instead"
            ),
            Self::MultipleUrls => write!(f, "multiple URLs are not supported"),
        }
    }
}

/// A structural problem with the command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// The offending text.
    pub value: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SyntaxError {
    /// Human-readable message without the position.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.kind.to_string()
    }
}

/// Any validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    MissingVariable(#[from] MissingVariableError),
    #[error(transparent)]
    UnsupportedOption(#[from] UnsupportedOptionError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ValidationError {
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::MissingVariable(e) => e.line,
            Self::UnsupportedOption(e) => e.line,
            Self::Syntax(e) => e.line,
        }
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::MissingVariable(e) => e.column,
            Self::UnsupportedOption(e) => e.column,
            Self::Syntax(e) => e.column,
        }
    }

    /// Length of the marked range, in characters.
    #[must_use]
    pub const fn length(&self) -> usize {
        match self {
            Self::MissingVariable(e) => e.length,
            Self::UnsupportedOption(e) => e.length,
            Self::Syntax(e) => e.length,
        }
    }

    /// Message for an inline marker.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingVariable(e) => format!("Variable not found: {}", e.variable),
            Self::UnsupportedOption(e) => format!("Unsupported option: {}", e.option),
            Self::Syntax(e) => e.error_message(),
        }
    }
}

/// Run every validator over `text`, ordered by position.
#[must_use]
pub fn validate(text: &str, variables: &[Variable], platform: Platform) -> Vec<ValidationError> {
    let parts = lex(text);
    let mut errors: Vec<ValidationError> = Vec::new();

    errors.extend(
        validate_syntax(&parts, platform)
            .into_iter()
            .map(ValidationError::from),
    );
    errors.extend(
        validate_missing_variables(&parts, variables)
            .into_iter()
            .map(ValidationError::from),
    );
    errors.extend(
        validate_unsupported_options(&parts)
            .into_iter()
            .map(ValidationError::from),
    );

    errors.sort_by_key(|e| (e.line(), e.column()));
    errors
}

/// One error per variable reference that resolves neither against
/// `variables` nor the globals.
#[must_use]
pub fn validate_missing_variables(
    parts: &[CurlPart],
    variables: &[Variable],
) -> Vec<MissingVariableError> {
    parts
        .iter()
        .filter(|p| matches!(p.kind, PartKind::Variable | PartKind::EscapedVariable))
        .filter(|p| !is_defined(&p.value, variables))
        .map(|p| MissingVariableError {
            variable: p.value.clone(),
            line: p.line,
            column: p.column,
            length: p.char_len(),
        })
        .collect()
}

/// One error per flag outside the supported set.
#[must_use]
pub fn validate_unsupported_options(parts: &[CurlPart]) -> Vec<UnsupportedOptionError> {
    parts
        .iter()
        .filter(|p| p.kind == PartKind::Option && !options::is_supported(&p.value))
        .map(|p| UnsupportedOptionError {
            option: p.value.clone(),
            line: p.line,
            column: p.column,
            length: p.char_len(),
        })
        .collect()
}

#[derive(Default)]
struct SyntaxState<'a> {
    curl_existed: bool,
    url_existed: bool,
    last_part: Option<&'a CurlPart>,
    last_non_delimiter: Option<&'a CurlPart>,
}

impl SyntaxState<'_> {
    /// Whether a word starting now sits where curl expects its URL.
    fn at_url_position(&self) -> bool {
        match self.last_non_delimiter {
            Some(last) => match last.kind {
                PartKind::Curl => true,
                kind if kind.is_value_like() => true,
                PartKind::Option => !options::takes_value(&last.value),
                _ => false,
            },
            None => false,
        }
    }

    fn continues_word(&self) -> bool {
        self.last_part.is_some_and(|p| p.kind.is_value_like())
    }
}

/// Check the overall shape of the command: the `curl` keyword comes
/// first, there is a single URL, and in the browser that URL is not a
/// local address.
#[must_use]
pub fn validate_syntax(parts: &[CurlPart], platform: Platform) -> Vec<SyntaxError> {
    let parts: Vec<&CurlPart> = parts
        .iter()
        .filter(|p| p.kind != PartKind::Comment)
        .collect();
    let mut state = SyntaxState::default();
    let mut errors = Vec::new();

    for (i, &part) in parts.iter().enumerate() {
        if part.kind.is_delimiter() {
            state.last_part = Some(part);
            continue;
        }

        if !state.curl_existed {
            if part.kind == PartKind::Curl {
                state.curl_existed = true;
            } else {
                errors.push(syntax_error(SyntaxErrorKind::MissingCurl, part, &part.value));
            }
        } else if part.kind.is_value_like() && !state.continues_word() && state.at_url_position() {
            let word = word_at(&parts[i..]);
            if state.url_existed {
                errors.push(syntax_error(SyntaxErrorKind::MultipleUrls, part, &word));
            } else {
                state.url_existed = true;
                if platform.is_browser() && is_local_url(&word) {
                    errors.push(syntax_error(SyntaxErrorKind::LocalAddress, part, &word));
                }
            }
        }

        state.last_part = Some(part);
        state.last_non_delimiter = Some(part);
    }

    errors
}

fn syntax_error(kind: SyntaxErrorKind, part: &CurlPart, value: &str) -> SyntaxError {
    SyntaxError {
        kind,
        value: value.to_string(),
        line: part.line,
        column: part.column,
        length: value.chars().count(),
    }
}

/// The whole shell word starting at `parts[0]`.
fn word_at(parts: &[&CurlPart]) -> String {
    parts
        .iter()
        .take_while(|p| p.kind.is_value_like())
        .fold(String::new(), |word, p| join_values(&word, &p.value))
}

/// Whether a URL word points at a loopback, private, link-local or
/// unspecified host. Anything that does not parse counts as remote.
#[must_use]
pub fn is_local_url(word: &str) -> bool {
    let text = unquote(word);
    let candidate = if text.contains("://") {
        text.to_string()
    } else {
        format!("http://{text}")
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost" || domain.ends_with(".localhost"),
        Some(Host::Ipv4(ip)) => is_local_ipv4(ip),
        Some(Host::Ipv6(ip)) => is_local_ipv6(ip),
        None => false,
    }
}

const fn is_local_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_local_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_local_ipv4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback() || ip.is_unspecified() || first & 0xfe00 == 0xfc00 || first & 0xffc0 == 0xfe80
}

fn unquote(word: &str) -> &str {
    let word = word.strip_prefix('$').unwrap_or(word);
    for quote in ['\'', '"'] {
        if let Some(inner) = word
            .strip_prefix(quote)
            .and_then(|w| w.strip_suffix(quote))
        {
            return inner;
        }
    }
    word
}
