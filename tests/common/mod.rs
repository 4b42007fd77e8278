#![allow(dead_code)]

use curlcell::{CurlPart, FormatCurlOptions, PartKind, format_curl, lex};

/// Format `input` and assert the output is a fixed point of the
/// formatter.
pub fn assert_idempotent(input: &str) -> String {
    let once = format_curl(input, &FormatCurlOptions::default());
    let twice = format_curl(&once, &FormatCurlOptions::default());
    assert_eq!(
        once, twice,
        "formatting is not idempotent:\n--- input ---\n{input}\n--- once ---\n{once}\n--- twice ---\n{twice}"
    );
    once
}

/// Assert the lexed parts reproduce the normalized input and tile it
/// without gaps.
pub fn assert_lossless(input: &str) -> Vec<CurlPart> {
    let normalized = input.replace("\r\n", "\n");
    let parts = lex(input);
    let joined: String = parts.iter().map(|p| p.value.as_str()).collect();
    assert_eq!(
        joined, normalized,
        "lexing lost text:\n--- input ---\n{input}\n--- joined ---\n{joined}"
    );

    let mut expected = 0;
    for part in &parts {
        assert_eq!(part.index, expected, "gap before {part:?}");
        assert!(!part.value.is_empty(), "empty part {part:?}");
        expected = part.end();
    }
    parts
}

/// Kinds and values of the parts of `input`.
pub fn kinds(input: &str) -> Vec<(PartKind, String)> {
    lex(input).into_iter().map(|p| (p.kind, p.value)).collect()
}
