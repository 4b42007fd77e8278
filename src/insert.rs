//! Inserting a variable reference at a cursor position.

use crate::lexer::{lex, lex_words, normalize};
use crate::token::{CurlPart, PartKind};

/// Error produced when a reference cannot be inserted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    /// The cursor sits inside a part that cannot hold a reference.
    #[error("Cannot insert variable to `{0}`")]
    NotInsertable(PartKind),
    /// The offset is past the end of the text or splits a character.
    #[error("offset {offset} is not a valid position in text of length {len}")]
    InvalidOffset { offset: usize, len: usize },
}

/// Result of an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// The updated, newline-normalized text.
    pub text: String,
    /// Byte offset just past the inserted reference.
    pub cursor: usize,
}

/// Insert a `$name` reference at byte `offset` (`insertVariableToCurl`).
///
/// `offset` is into the `\n`-normalized text. The reference is braced
/// when the next character would otherwise extend its name. At the very
/// start or end of a quoted word the reference is placed outside the
/// quotes; inside a double-quoted word it is spliced in directly, and
/// inside a single-quoted word the quote is closed and reopened around
/// it.
///
/// # Errors
///
/// Returns `InsertError::NotInsertable` when the offset falls inside an
/// option, the `curl` keyword, a comment, a continuation or another
/// reference, and `InsertError::InvalidOffset` for offsets outside the
/// text.
pub fn insert_variable(text: &str, offset: usize, name: &str) -> Result<Insertion, InsertError> {
    let source = normalize(text);

    if source.is_empty() {
        let reference = format!("${name}");
        return Ok(Insertion {
            cursor: reference.len(),
            text: reference,
        });
    }

    if offset > source.len() || !source.is_char_boundary(offset) {
        return Err(InsertError::InvalidOffset {
            offset,
            len: source.len(),
        });
    }

    let parts = lex(&source);
    let target = locate(&parts, offset);

    match target.kind {
        PartKind::Space | PartKind::Newline => {
            Ok(splice(&source, escape_start(&source, offset), "", name, ""))
        }
        PartKind::Value => Ok(insert_into_word(&source, offset, target, name)),
        other => Err(InsertError::NotInsertable(other)),
    }
}

fn is_insertable(kind: PartKind) -> bool {
    matches!(kind, PartKind::Value | PartKind::Space | PartKind::Newline)
}

/// The part holding `offset`. A cursor on the boundary after an
/// insertable part belongs to it when the part that follows is not
/// insertable.
fn locate(parts: &[CurlPart], offset: usize) -> &CurlPart {
    let index = parts
        .iter()
        .position(|p| p.index <= offset && offset < p.end())
        .unwrap_or(parts.len() - 1);

    let part = &parts[index];
    if !is_insertable(part.kind) && part.index == offset && index > 0 {
        let previous = &parts[index - 1];
        if is_insertable(previous.kind) {
            return previous;
        }
    }
    part
}

fn insert_into_word(source: &str, offset: usize, part: &CurlPart, name: &str) -> Insertion {
    let words = lex_words(source);
    let Some(word) = words
        .iter()
        .find(|w| w.kind == PartKind::Value && w.index <= part.index && part.end() <= w.end())
    else {
        return splice(source, offset, "", name, "");
    };

    let raw = word.value.as_str();
    let at = offset - word.index;
    let (open_len, quote) = quote_style(raw);

    let Some(quote) = quote else {
        return splice(source, escape_start(source, offset), "", name, "");
    };

    if at < open_len {
        return splice(source, word.index, "", name, "");
    }

    let closed = raw.len() > open_len && raw.ends_with(quote) && !raw[..raw.len() - 1].ends_with('\\');
    if closed && at == raw.len() {
        return splice(source, offset, "", name, "");
    }

    if quote == '"' {
        splice(source, escape_start(source, offset), "", name, "")
    } else {
        let reopen = if raw.starts_with('$') { "$'" } else { "'" };
        splice(source, offset, "'", name, reopen)
    }
}

/// Move `offset` off the character escaped by a preceding backslash.
fn escape_start(source: &str, offset: usize) -> usize {
    let backslashes = source[..offset].bytes().rev().take_while(|&b| b == b'\\').count();
    if backslashes % 2 == 1 { offset - 1 } else { offset }
}

/// Length of the opening quote sequence and the quote character.
fn quote_style(raw: &str) -> (usize, Option<char>) {
    if raw.starts_with("$'") {
        (2, Some('\''))
    } else if raw.starts_with("$\"") {
        (2, Some('"'))
    } else if raw.starts_with('\'') {
        (1, Some('\''))
    } else if raw.starts_with('"') {
        (1, Some('"'))
    } else {
        (0, None)
    }
}

/// Insert `before`, the reference, and `after` at `at`.
fn splice(source: &str, at: usize, before: &str, name: &str, after: &str) -> Insertion {
    let next = if after.is_empty() {
        source[at..].chars().next()
    } else {
        after.chars().next()
    };
    let reference = if next.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("${{{name}}}")
    } else {
        format!("${name}")
    };

    let mut text = String::with_capacity(source.len() + before.len() + reference.len() + after.len());
    text.push_str(&source[..at]);
    text.push_str(before);
    text.push_str(&reference);
    let cursor = text.len();
    text.push_str(after);
    text.push_str(&source[at..]);

    Insertion { text, cursor }
}
