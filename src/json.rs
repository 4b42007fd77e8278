//! Pretty-printer for JSON bodies written as shell words.
//!
//! Request bodies look like `'{"id":$id,"tags":${tags}}'`: JSON inside
//! shell quoting, with unquoted variable references standing in for
//! whole JSON values. The printer re-indents the JSON structure while
//! emitting every original character verbatim, so quoting and
//! references survive untouched.

/// Error produced while pretty-printing a JSON body.
#[derive(Debug, thiserror::Error)]
pub enum JsonFormatError {
    /// `${` without a closing `}`.
    #[error("unterminated variable brace")]
    UnterminatedVariable,
    /// The body is not JSON, even with references read as values.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Single,
    AnsiC,
    Double,
    Bare,
}

/// One shell-level character: its raw source text and what it means.
#[derive(Debug, Clone, Copy)]
struct Unit<'a> {
    raw: &'a str,
    ch: char,
    /// Escaped in the shell source, so never starts a reference.
    literal: bool,
}

/// Re-indent a possibly shell-quoted JSON string (`formatBashJSONString`).
///
/// Output is indented two spaces per level, starting at `indent` levels,
/// in the layout of `JSON.stringify(value, null, 2)`. Empty objects and
/// arrays stay collapsed. `${name}` is an opaque atom and `$name` is left
/// as written.
///
/// # Errors
///
/// Returns `JsonFormatError` on an unterminated `${` or when the body
/// does not parse as JSON with its references read as `null`.
pub fn format_bash_json_string(text: &str, indent: usize) -> Result<String, JsonFormatError> {
    let (prefix, inner, suffix, wrapper) = split_wrapper(text);
    let units = decode_units(inner, wrapper);

    let mut out = String::with_capacity(text.len() * 2);
    let mut scratch = String::with_capacity(inner.len());
    let mut level = indent;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut in_variable = false;
    let mut in_bare_variable = false;

    out.push_str(prefix);

    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        i += 1;

        if let Some(quote) = in_string {
            out.push_str(unit.raw);
            scratch.push(unit.ch);
            if escaped {
                escaped = false;
            } else if unit.ch == '\\' {
                escaped = true;
            } else if unit.ch == quote {
                in_string = None;
            }
            continue;
        }

        if in_variable {
            out.push_str(unit.raw);
            if unit.ch == '}' {
                in_variable = false;
            }
            continue;
        }

        if in_bare_variable {
            if unit.ch.is_ascii_alphanumeric() || unit.ch == '_' {
                out.push_str(unit.raw);
                continue;
            }
            in_bare_variable = false;
        }

        match unit.ch {
            '"' | '\'' => {
                in_string = Some(unit.ch);
                out.push_str(unit.raw);
                scratch.push(unit.ch);
            }
            '$' if !unit.literal => {
                out.push_str(unit.raw);
                match units.get(i) {
                    Some(next) if next.ch == '{' && !next.literal => {
                        out.push_str(next.raw);
                        scratch.push_str("null");
                        in_variable = true;
                        i += 1;
                    }
                    Some(next) if next.ch.is_ascii_alphanumeric() || next.ch == '_' => {
                        scratch.push_str("null");
                        in_bare_variable = true;
                    }
                    _ => scratch.push('$'),
                }
            }
            open @ ('{' | '[') => {
                let close = if open == '{' { '}' } else { ']' };
                out.push_str(unit.raw);
                scratch.push(open);
                let next = units[i..]
                    .iter()
                    .position(|u| !u.ch.is_whitespace())
                    .map(|offset| i + offset);
                match next {
                    Some(j) if units[j].ch == close => {
                        out.push_str(units[j].raw);
                        scratch.push(close);
                        i = j + 1;
                    }
                    _ => {
                        level += 1;
                        push_line_break(&mut out, level);
                    }
                }
            }
            '}' | ']' => {
                level = level.saturating_sub(1);
                push_line_break(&mut out, level);
                out.push_str(unit.raw);
                scratch.push(unit.ch);
            }
            ',' => {
                out.push_str(unit.raw);
                scratch.push(',');
                push_line_break(&mut out, level);
            }
            ':' => {
                out.push_str(unit.raw);
                out.push(' ');
                scratch.push(':');
            }
            c if c.is_whitespace() => {}
            c => {
                out.push_str(unit.raw);
                scratch.push(c);
            }
        }
    }

    if in_variable {
        return Err(JsonFormatError::UnterminatedVariable);
    }

    serde_json::from_str::<serde_json::Value>(&scratch)?;

    out.push_str(suffix);
    Ok(out)
}

fn push_line_break(out: &mut String, level: usize) {
    out.push('\n');
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn split_wrapper(text: &str) -> (&str, &str, &str, Wrapper) {
    let wrapped = |open: &str, close: char| {
        text.len() > open.len() && text.starts_with(open) && text.ends_with(close)
    };

    if wrapped("$'", '\'') {
        (&text[..2], &text[2..text.len() - 1], "'", Wrapper::AnsiC)
    } else if wrapped("$\"", '"') {
        (&text[..2], &text[2..text.len() - 1], "\"", Wrapper::Double)
    } else if wrapped("'", '\'') {
        (&text[..1], &text[1..text.len() - 1], "'", Wrapper::Single)
    } else if wrapped("\"", '"') {
        (&text[..1], &text[1..text.len() - 1], "\"", Wrapper::Double)
    } else {
        ("", text, "", Wrapper::Bare)
    }
}

/// Split shell-quoted text into units, decoding the escapes that the
/// quoting style gives meaning to.
fn decode_units(inner: &str, wrapper: Wrapper) -> Vec<Unit<'_>> {
    let mut units = Vec::with_capacity(inner.len());
    let mut rest = inner;

    while let Some(first) = rest.chars().next() {
        let (len, ch, literal) = match (wrapper, first) {
            (Wrapper::Single, '\'') if rest.starts_with("'\\''") => (4, '\'', true),
            (Wrapper::Double | Wrapper::Bare, '\\') => match rest[1..].chars().next() {
                Some(c @ ('"' | '\\' | '$' | '`')) => (2, c, true),
                _ => (1, '\\', false),
            },
            (Wrapper::AnsiC, '\\') => match rest[1..].chars().next() {
                Some('n') => (2, '\n', true),
                Some('t') => (2, '\t', true),
                Some('r') => (2, '\r', true),
                Some(c) => (1 + c.len_utf8(), c, true),
                None => (1, '\\', false),
            },
            _ => (first.len_utf8(), first, false),
        };
        units.push(Unit {
            raw: &rest[..len],
            ch,
            literal,
        });
        rest = &rest[len..];
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(text: &str, indent: usize) -> String {
        format_bash_json_string(text, indent).expect("should format")
    }

    #[test]
    fn plain_object_matches_stringify_layout() {
        assert_eq!(pretty(r#"{"a":1,"b":"x"}"#, 0), "{\n  \"a\": 1,\n  \"b\": \"x\"\n}");
    }

    #[test]
    fn nested_under_option_line() {
        let expected = "'{\n    \"a\": ${x},\n    \"b\": [\n      1,\n      2\n    ]\n  }'";
        assert_eq!(pretty(r#"'{"a":${x},"b":[1,2]}'"#, 1), expected);
    }

    #[test]
    fn empty_containers_stay_collapsed() {
        assert_eq!(pretty("{}", 0), "{}");
        assert_eq!(pretty("[ ]", 0), "[]");
        assert_eq!(pretty(r#"'{"a":{},"b":[]}'"#, 0), "'{\n  \"a\": {},\n  \"b\": []\n}'");
    }

    #[test]
    fn braces_in_variable_are_not_structure() {
        assert_eq!(pretty("'[${a},$b]'", 0), "'[\n  ${a},\n  $b\n]'");
    }

    #[test]
    fn strings_keep_their_content() {
        assert_eq!(pretty(r#"'{"a":"x, {y}: z"}'"#, 0), "'{\n  \"a\": \"x, {y}: z\"\n}'");
    }

    #[test]
    fn escaped_quote_inside_string() {
        assert_eq!(pretty(r#"'{"a":"say \"hi\""}'"#, 0), "'{\n  \"a\": \"say \\\"hi\\\"\"\n}'");
    }

    #[test]
    fn double_quoted_wrapper() {
        let input = r#""{\"a\":\"$x\"}""#;
        assert_eq!(pretty(input, 0), "\"{\n  \\\"a\\\": \\\"$x\\\"\n}\"");
    }

    #[test]
    fn ansi_c_wrapper() {
        assert_eq!(pretty(r#"$'{"a":1}'"#, 0), "$'{\n  \"a\": 1\n}'");
    }

    #[test]
    fn reformatting_is_stable() {
        let once = pretty(r#"'{"a":[1,{"b":null}],"c":${x}}'"#, 1);
        assert_eq!(pretty(&once, 1), once);
    }

    #[test]
    fn unterminated_variable() {
        let err = format_bash_json_string("'{\"a\":${x'", 0).unwrap_err();
        assert!(matches!(err, JsonFormatError::UnterminatedVariable));
    }

    #[test]
    fn not_json() {
        let err = format_bash_json_string("'a=b&c=d'", 0).unwrap_err();
        assert!(matches!(err, JsonFormatError::Json(_)));
    }
}
