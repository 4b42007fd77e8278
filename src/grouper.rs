//! Fusing of textually contiguous values and variables.
//!
//! `'https://host/'$path'?q=1'` lexes as three parts but is one shell
//! word. The grouper folds such runs into a single
//! [`PartKind::EmbeddedValue`], merging touching quotes where that keeps
//! the meaning of the word.

use crate::token::{CurlPart, PartKind};

/// Fold contiguous value-like parts into embedded values
/// (`groupValueAndVariable`).
///
/// Every value, variable and escaped variable ends up inside an
/// embedded value that keeps the position of its first part. Other parts
/// pass through unchanged.
#[must_use]
pub fn group(parts: &[CurlPart]) -> Vec<CurlPart> {
    let mut grouped: Vec<CurlPart> = Vec::with_capacity(parts.len());

    for part in parts {
        if !part.kind.is_value_like() {
            grouped.push(part.clone());
            continue;
        }

        match grouped.last_mut() {
            Some(last) if last.kind == PartKind::EmbeddedValue => {
                last.value = join_values(&last.value, &part.value);
            }
            _ => grouped.push(CurlPart {
                kind: PartKind::EmbeddedValue,
                ..part.clone()
            }),
        }
    }

    grouped
}

/// Concatenate two adjacent shell word fragments.
///
/// Touching quotes of the same kind are dropped (`'a'` + `'b'` is
/// `'ab'`). A whole single-quoted string next to a double-quoted one is
/// rewritten into double quotes when its content means the same there.
/// Anything else is placed back to back, including a merge that would
/// let the right text run into an unbraced `$name` on the left.
#[must_use]
pub fn join_values(left: &str, right: &str) -> String {
    if let Some(quote) = closing_quote(left) {
        let open = &left[..left.len() - 1];
        if right.starts_with(quote) && !(quote == '"' && extends_reference(open, &right[1..])) {
            return format!("{open}{}", &right[1..]);
        }
    }

    if right.starts_with('"') {
        if let Some(inner) = single_quoted_content(left) {
            return format!("\"{inner}{}", &right[1..]);
        }
    }

    if closing_quote(left) == Some('"') {
        let open = &left[..left.len() - 1];
        if let Some(inner) = single_quoted_content(right).filter(|i| !extends_reference(open, i)) {
            return format!("{open}{inner}\"");
        }
    }

    format!("{left}{right}")
}

/// Whether appending `next` to the inside of a double-quoted string
/// ending in `open` would change the reference `open` ends with.
fn extends_reference(open: &str, next: &str) -> bool {
    let Some(first) = next.chars().next() else {
        return false;
    };
    let name = open.len() - open.trim_end_matches(is_name_char).len();
    let before = &open[..open.len() - name];
    let Some(dollar) = before.strip_suffix('$') else {
        return false;
    };
    if dollar.ends_with('\\') {
        return false;
    }
    is_name_char(first) || (name == 0 && first == '{')
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The quote character that closes `text`, if it ends a quoted string.
fn closing_quote(text: &str) -> Option<char> {
    let quote = text.chars().last().filter(|c| matches!(c, '\'' | '"'))?;
    let before = &text[..text.len() - 1];
    if before.is_empty() || before == "$" || before.ends_with('\\') {
        return None;
    }
    Some(quote)
}

/// Content of a whole `'...'` string that reads the same inside double
/// quotes.
fn single_quoted_content(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.contains(['\'', '"', '$', '\\', '`']) {
        return None;
    }
    Some(inner)
}
