//! Lexer turning raw curl command text into classified parts.
//!
//! The input starts out as one unclassified span. A fixed cascade of
//! passes then claims pieces of the still-unclassified spans: quoted
//! strings, comments, options, line continuations, newlines, blanks,
//! the `curl` keyword, and finally everything left over as values.
//! Values are then rescanned for `$name` / `${name}` references.
//!
//! The lexer is total: every input produces parts, and concatenating
//! their values reproduces the (newline-normalized) input.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{CurlPart, PartKind, Token};
use crate::tokenizer::{Pattern, Scan, tokenize};

static OPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--?[A-Za-z0-9][A-Za-z0-9-]*").expect("Invalid option regex"));

static CONTINUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\`]\n").expect("Invalid continuation regex"));

static NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n").expect("Invalid newline regex"));

static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").expect("Invalid space regex"));

static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{[A-Za-z0-9_]+\}|[A-Za-z0-9_]+)").expect("Invalid variable regex")
});

type RawPart = Token<PartKind>;

/// Split a curl command into classified parts (`getCurlParts`).
///
/// `\r\n` line endings are normalized to `\n` first; indices refer to
/// the normalized text.
#[must_use]
pub fn lex(text: &str) -> Vec<CurlPart> {
    let source = normalize(text);
    let parts = rescan_variables(&source, classify(&source));
    let parts = with_positions(parts);
    tracing::trace!(parts = parts.len(), "lexed curl command");
    parts
}

/// Like [`lex`] but without splitting variables out of values.
///
/// Quoted strings and bare words stay whole, which is what cursor-based
/// editing needs to reason about quote context.
#[must_use]
pub fn lex_words(text: &str) -> Vec<CurlPart> {
    let source = normalize(text);
    with_positions(classify(&source))
}

/// Normalize `\r\n` line endings to `\n`.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

fn classify(source: &str) -> Vec<RawPart> {
    if source.is_empty() {
        return Vec::new();
    }

    let mut parts = vec![RawPart {
        value: source.to_string(),
        index: 0,
        kind: None,
    }];

    parts = refine(source, parts, &Scan(find_quoted), PartKind::Value);
    parts = refine(source, parts, &Scan(find_comment), PartKind::Comment);
    parts = refine(source, parts, &Scan(find_option), PartKind::Option);
    parts = refine(source, parts, &*CONTINUATION_RE, PartKind::BackslashNewline);
    parts = refine(source, parts, &*NEWLINE_RE, PartKind::Newline);
    parts = refine(source, parts, &*SPACE_RE, PartKind::Space);
    mark_keyword(&mut parts);

    for part in &mut parts {
        if part.kind.is_none() {
            part.kind = Some(PartKind::Value);
        }
    }

    parts
}

/// Run `pattern` over every unclassified part, leaving typed parts alone.
fn refine<P: Pattern + ?Sized>(
    source: &str,
    parts: Vec<RawPart>,
    pattern: &P,
    kind: PartKind,
) -> Vec<RawPart> {
    parts
        .into_iter()
        .flat_map(|part| {
            if part.kind.is_some() {
                vec![part]
            } else {
                tokenize(pattern, source, part.index..part.end(), kind, None)
            }
        })
        .collect()
}

/// The first word may be the `curl` keyword, as long as only blanks,
/// newlines and comments come before it.
fn mark_keyword(parts: &mut [RawPart]) {
    for part in parts {
        match part.kind {
            Some(
                PartKind::Space
                | PartKind::Newline
                | PartKind::BackslashNewline
                | PartKind::Comment,
            ) => {}
            None if part.value == "curl" => {
                part.kind = Some(PartKind::Curl);
                return;
            }
            _ => return,
        }
    }
}

fn rescan_variables(source: &str, parts: Vec<RawPart>) -> Vec<RawPart> {
    let pattern = Scan(find_variable);
    parts
        .into_iter()
        .flat_map(|part| {
            if part.kind != Some(PartKind::Value) {
                return vec![part];
            }
            let span = part.index..part.end();
            if part.value.starts_with('"') || part.value.starts_with("$\"") {
                tokenize(
                    &pattern,
                    source,
                    span,
                    PartKind::EscapedVariable,
                    Some(PartKind::Value),
                )
            } else if part.value.starts_with('\'') || part.value.starts_with("$'") {
                vec![part]
            } else {
                tokenize(
                    &pattern,
                    source,
                    span,
                    PartKind::Variable,
                    Some(PartKind::Value),
                )
            }
        })
        .collect()
}

fn with_positions(parts: Vec<RawPart>) -> Vec<CurlPart> {
    let mut line = 1;
    let mut column = 1;

    parts
        .into_iter()
        .map(|part| {
            let positioned = CurlPart {
                kind: part.kind.unwrap_or(PartKind::Value),
                index: part.index,
                line,
                column,
                value: part.value,
            };
            for ch in positioned.value.chars() {
                if ch == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            positioned
        })
        .collect()
}

/// `#` only opens a comment at the start of a word.
pub(crate) fn is_word_start(source: &str, at: usize) -> bool {
    at == 0 || source.as_bytes()[at - 1].is_ascii_whitespace()
}

fn find_quoted(hay: &str, start: usize) -> Option<Range<usize>> {
    let bytes = hay.as_bytes();
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'#' if is_word_start(hay, i) => {
                i = hay[i..].find('\n').map_or(bytes.len(), |n| i + n);
            }
            b'$' if matches!(bytes.get(i + 1), Some(b'\'' | b'"')) => {
                return Some(i..close_quote(bytes, i + 1));
            }
            b'\'' | b'"' => return Some(i..close_quote(bytes, i)),
            _ => i += 1,
        }
    }

    None
}

/// End of the string opened at `open`, or the end of input when the
/// quote is never closed.
fn close_quote(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut i = open + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }

    bytes.len()
}

fn find_comment(hay: &str, start: usize) -> Option<Range<usize>> {
    let mut from = start;
    while let Some(offset) = hay[from..].find('#') {
        let at = from + offset;
        if is_word_start(hay, at) {
            let end = hay[at..].find('\n').map_or(hay.len(), |n| at + n);
            return Some(at..end);
        }
        from = at + 1;
    }
    None
}

fn find_option(hay: &str, start: usize) -> Option<Range<usize>> {
    let mut from = start;
    while let Some(found) = OPTION_RE.find_at(hay, from) {
        if found.start() > 0 && hay.as_bytes()[found.start() - 1].is_ascii_whitespace() {
            return Some(found.range());
        }
        from = found.start() + 1;
    }
    None
}

fn find_variable(hay: &str, start: usize) -> Option<Range<usize>> {
    let mut from = start;
    while let Some(found) = VARIABLE_RE.find_at(hay, from) {
        if found.start() == 0 || hay.as_bytes()[found.start() - 1] != b'\\' {
            return Some(found.range());
        }
        from = found.start() + 1;
    }
    None
}
