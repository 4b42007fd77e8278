//! Generic pattern-driven tokenizer.
//!
//! Splits a span of source text into an ordered, gapless sequence of
//! tokens: matches of a pattern get one kind, the text between matches
//! gets a context kind. The curl lexer applies this repeatedly to the
//! spans earlier passes left unclassified.

use std::ops::Range;

use regex::Regex;

use crate::token::Token;

/// Something that can locate the next match in a haystack.
///
/// The haystack always starts at the beginning of the original source,
/// so implementations may look behind `start`.
pub trait Pattern {
    /// Byte range of the first match beginning at or after `start`.
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>>;
}

impl Pattern for Regex {
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        Self::find_at(self, haystack, start).map(|m| m.range())
    }
}

/// Adapts a hand-written scanner function into a [`Pattern`].
pub struct Scan<F>(pub F);

impl<F> Pattern for Scan<F>
where
    F: Fn(&str, usize) -> Option<Range<usize>>,
{
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        (self.0)(haystack, start)
    }
}

/// Tokenize `source[span]` with `pattern`.
///
/// Matches become tokens of `Some(kind)`, the gaps between them tokens of
/// `context`. Indices are absolute offsets into `source`. Empty spans
/// produce no tokens and zero-length matches are ignored.
pub fn tokenize<K, P>(
    pattern: &P,
    source: &str,
    span: Range<usize>,
    kind: K,
    context: Option<K>,
) -> Vec<Token<K>>
where
    K: Copy,
    P: Pattern + ?Sized,
{
    let haystack = &source[..span.end];
    let mut tokens = Vec::new();
    let mut pos = span.start;
    let mut search = span.start;

    while search < span.end {
        let Some(found) = pattern.find_at(haystack, search) else {
            break;
        };
        if found.start < search || found.end > span.end {
            break;
        }
        if found.is_empty() {
            search = next_boundary(haystack, found.start);
            continue;
        }

        if found.start > pos {
            tokens.push(Token {
                value: source[pos..found.start].to_string(),
                index: pos,
                kind: context,
            });
        }
        tokens.push(Token {
            value: source[found.clone()].to_string(),
            index: found.start,
            kind: Some(kind),
        });
        pos = found.end;
        search = found.end;
    }

    if pos < span.end {
        tokens.push(Token {
            value: source[pos..span.end].to_string(),
            index: pos,
            kind: context,
        });
    }

    tokens
}

/// Tokenize a whole string.
pub fn tokenize_str<K, P>(pattern: &P, text: &str, kind: K, context: Option<K>) -> Vec<Token<K>>
where
    K: Copy,
    P: Pattern + ?Sized,
{
    tokenize(pattern, text, 0..text.len(), kind, context)
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Digits,
        Other,
    }

    fn digits() -> Regex {
        Regex::new(r"[0-9]+").expect("valid regex")
    }

    #[test]
    fn gaps_become_context_tokens() {
        let tokens = tokenize_str(&digits(), "ab12cd345", Kind::Digits, Some(Kind::Other));
        let values: Vec<_> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["ab", "12", "cd", "345"]);
        assert_eq!(tokens[1].kind, Some(Kind::Digits));
        assert_eq!(tokens[2].kind, Some(Kind::Other));
        assert_eq!(tokens[3].index, 6);
    }

    #[test]
    fn null_context() {
        let tokens = tokenize_str(&digits(), "x1", Kind::Digits, None);
        assert_eq!(tokens[0].kind, None);
        assert_eq!(tokens[1].kind, Some(Kind::Digits));
    }

    #[test]
    fn span_offsets_are_absolute() {
        let source = "skip 42 tail";
        let tokens = tokenize(&digits(), source, 5..12, Kind::Digits, None);
        assert_eq!(tokens[0].index, 5);
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].index, 7);
        assert_eq!(tokens[1].value, " tail");
    }

    #[test]
    fn match_does_not_leak_past_span() {
        let source = "1234";
        let tokens = tokenize(&digits(), source, 0..2, Kind::Digits, None);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "12");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize_str(&digits(), "", Kind::Digits, None).is_empty());
    }

    #[test]
    fn zero_length_matches_are_skipped() {
        let optional = Regex::new(r"[0-9]*").expect("valid regex");
        let tokens = tokenize_str(&optional, "a1b", Kind::Digits, Some(Kind::Other));
        let values: Vec<_> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["a", "1", "b"]);
    }

    #[test]
    fn scanner_can_look_behind() {
        let after_space = Scan(|hay: &str, start: usize| {
            hay[start..]
                .find('x')
                .map(|i| start + i)
                .filter(|&i| i > 0 && hay.as_bytes()[i - 1] == b' ')
                .map(|i| i..i + 1)
        });
        let tokens = tokenize(&after_space, "a x", 2..3, Kind::Digits, None);
        assert_eq!(tokens[0].kind, Some(Kind::Digits));
    }
}
