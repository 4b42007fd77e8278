//! Formatter that re-emits a curl command as canonical multi-line text.
//!
//! One option per line, continuation characters at line ends, two-space
//! indentation, and JSON request bodies pretty-printed when the command
//! declares a JSON content type. Formatting formatted output returns it
//! unchanged.

use crate::grouper::group;
use crate::json::format_bash_json_string;
use crate::lexer::lex;
use crate::platform::Platform;
use crate::token::{CurlPart, PartKind};

const BODY_OPTIONS: [&str; 4] = ["-d", "--data", "--data-raw", "--json"];
const HEADER_OPTIONS: [&str; 2] = ["-H", "--header"];

/// Formatting configuration (`FormatCurlOptions`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCurlOptions {
    /// Flags appended after the `curl` keyword, in order. An empty value
    /// emits the flag alone.
    pub add_options: Vec<(String, String)>,
    pub remove_comments: bool,
    /// Character placed before each line break.
    pub continuation: char,
}

impl Default for FormatCurlOptions {
    fn default() -> Self {
        Self {
            add_options: Vec::new(),
            remove_comments: false,
            continuation: '\\',
        }
    }
}

impl FormatCurlOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the continuation character of `platform`.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self::default().with_continuation(platform.continuation())
    }

    /// Append a flag (and optional value) to the `curl` line.
    #[must_use]
    pub fn with_option(mut self, flag: &str, value: &str) -> Self {
        self.add_options.push((flag.to_string(), value.to_string()));
        self
    }

    /// Drop comments from the output.
    #[must_use]
    pub const fn without_comments(mut self) -> Self {
        self.remove_comments = true;
        self
    }

    #[must_use]
    pub const fn with_continuation(mut self, continuation: char) -> Self {
        self.continuation = continuation;
        self
    }
}

/// A part that survives filtering, and whether a line break separated
/// it from the previous one in the source.
struct Item<'a> {
    part: &'a CurlPart,
    broken: bool,
}

/// Format a curl command (`formatCurl`).
#[must_use]
pub fn format_curl(text: &str, options: &FormatCurlOptions) -> String {
    let parts = group(&lex(text));
    let items = collect_items(&parts, options.remove_comments);
    let json_body = declares_json(&items);

    let mut out = String::with_capacity(text.len() + 16);
    let mut prev: Option<&Item<'_>> = None;

    for item in &items {
        let kind = item.part.kind;

        if let Some(prev) = prev {
            push_separator(&mut out, prev, item, options.continuation);
        }

        match kind {
            PartKind::Curl => {
                out.push_str(&item.part.value);
                for (flag, value) in &options.add_options {
                    out.push(' ');
                    out.push_str(flag);
                    if !value.is_empty() {
                        out.push(' ');
                        out.push_str(value);
                    }
                }
            }
            PartKind::Comment => out.push_str(item.part.value.trim_end()),
            PartKind::Option => out.push_str(&item.part.value),
            PartKind::EmbeddedValue => {
                let value = strip_empty_quotes(&item.part.value);
                let after_body_option = prev.is_some_and(|p| {
                    p.part.kind == PartKind::Option && BODY_OPTIONS.contains(&p.part.value.as_str())
                });
                let is_json = json_body
                    || prev.is_some_and(|p| p.part.kind == PartKind::Option && p.part.value == "--json");
                if after_body_option && is_json {
                    out.push_str(&pretty_body(value));
                } else {
                    out.push_str(value);
                }
            }
            PartKind::Value
            | PartKind::Variable
            | PartKind::EscapedVariable
            | PartKind::Space
            | PartKind::Newline
            | PartKind::BackslashNewline => {}
        }

        prev = Some(item);
    }

    out
}

fn collect_items(parts: &[CurlPart], remove_comments: bool) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut broken = false;

    for part in parts {
        match part.kind {
            PartKind::Newline | PartKind::BackslashNewline => broken = true,
            PartKind::Comment if remove_comments => {}
            PartKind::Curl | PartKind::Option | PartKind::Comment | PartKind::EmbeddedValue => {
                items.push(Item { part, broken });
                broken = false;
            }
            PartKind::Space
            | PartKind::Value
            | PartKind::Variable
            | PartKind::EscapedVariable => {}
        }
    }

    items
}

fn push_separator(out: &mut String, prev: &Item<'_>, item: &Item<'_>, continuation: char) {
    let kind = item.part.kind;
    let prev_kind = prev.part.kind;

    if matches!(kind, PartKind::Curl | PartKind::Comment) {
        out.push('\n');
    } else if prev_kind == PartKind::Comment {
        out.push_str("\n  ");
    } else if kind == PartKind::Option
        || (kind == PartKind::EmbeddedValue && prev_kind == PartKind::EmbeddedValue && item.broken)
    {
        out.push(' ');
        out.push(continuation);
        out.push_str("\n  ");
    } else {
        out.push(' ');
    }
}

/// Whether a header declares an `application/json` content type.
fn declares_json(items: &[Item<'_>]) -> bool {
    items
        .windows(2)
        .filter(|pair| {
            pair[0].part.kind == PartKind::Option
                && HEADER_OPTIONS.contains(&pair[0].part.value.as_str())
                && pair[1].part.kind == PartKind::EmbeddedValue
        })
        .filter_map(|pair| content_type(&pair[1].part.value))
        .next_back()
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// The lowercased media type of a `Content-Type: ...` header word.
fn content_type(header: &str) -> Option<String> {
    let lower = header.to_lowercase();
    let start = lower.find("content-type:")? + "content-type:".len();
    let value = lower[start..].trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"');
    Some(value.to_string())
}

fn pretty_body(value: &str) -> String {
    match format_bash_json_string(value, 1) {
        Ok(pretty) => pretty,
        Err(e) => {
            tracing::debug!(error = %e, "keeping request body as written");
            value.to_string()
        }
    }
}

/// Drop `''` left at either end of a longer word by quote merging.
fn strip_empty_quotes(value: &str) -> &str {
    let mut value = value;
    while let Some(rest) = value.strip_prefix("''") {
        if rest.is_empty() || rest.starts_with(['-', '#']) {
            break;
        }
        value = rest;
    }
    while let Some(rest) = value.strip_suffix("''") {
        if rest.is_empty() || rest.ends_with('\\') {
            break;
        }
        value = rest;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(text: &str) -> String {
        format_curl(text, &FormatCurlOptions::default())
    }

    #[test]
    fn one_option_per_line() {
        assert_eq!(
            fmt("curl -X POST 'http://a' -H 'x: y'"),
            "curl \\\n  -X POST 'http://a' \\\n  -H 'x: y'"
        );
    }

    #[test]
    fn collapses_irregular_whitespace() {
        assert_eq!(
            fmt("  curl   'http://a'  \\\n\n   -v   \n"),
            "curl 'http://a' \\\n  -v"
        );
    }

    #[test]
    fn values_on_separate_lines_stay_separate() {
        assert_eq!(fmt("curl 'a'\n'b'"), "curl 'a' \\\n  'b'");
        assert_eq!(fmt("curl 'a' 'b'"), "curl 'a' 'b'");
    }

    #[test]
    fn comments_start_fresh_lines() {
        assert_eq!(
            fmt("# users\ncurl http://a # trailing\n-v"),
            "# users\ncurl http://a\n# trailing\n  -v"
        );
    }

    #[test]
    fn comments_can_be_removed() {
        let options = FormatCurlOptions::new().without_comments();
        assert_eq!(format_curl("# a\ncurl http://a # b", &options), "curl http://a");
    }

    #[test]
    fn injected_flags() {
        let options = FormatCurlOptions::new()
            .with_option("-s", "")
            .with_option("--output", "/tmp/out");
        assert_eq!(
            format_curl("curl http://a", &options),
            "curl -s --output /tmp/out http://a"
        );
    }

    #[test]
    fn windows_continuation() {
        let options = FormatCurlOptions::for_platform(Platform::Windows);
        assert_eq!(format_curl("curl http://a -v", &options), "curl http://a `\n  -v");
    }

    #[test]
    fn json_body_is_pretty_printed() {
        let input = r#"curl http://a -H 'Content-Type: application/json' -d '{"a":1,"b":[]}'"#;
        let expected = "curl http://a \\\n  -H 'Content-Type: application/json' \\\n  -d '{\n    \"a\": 1,\n    \"b\": []\n  }'";
        assert_eq!(fmt(input), expected);
        assert_eq!(fmt(expected), expected);
    }

    #[test]
    fn header_after_body_still_counts() {
        let out = fmt(r#"curl http://a -d '{"a":1}' -H 'content-type: application/json; charset=utf-8'"#);
        assert!(out.contains("-d '{\n    \"a\": 1\n  }'"));
    }

    #[test]
    fn body_without_json_header_is_untouched() {
        let out = fmt(r#"curl http://a -d '{"a":1}'"#);
        assert!(out.ends_with(r#"-d '{"a":1}'"#));
    }

    #[test]
    fn json_option_implies_json() {
        let out = fmt(r#"curl http://a --json '{"a":1}'"#);
        assert!(out.ends_with("--json '{\n    \"a\": 1\n  }'"));
    }

    #[test]
    fn invalid_json_body_falls_back() {
        let input = "curl http://a -H 'Content-Type: application/json' -d 'a=b'";
        assert!(fmt(input).ends_with("-d 'a=b'"));
    }

    #[test]
    fn empty_quote_artifacts_are_stripped() {
        assert_eq!(fmt("curl $x''"), "curl $x");
        assert_eq!(fmt("curl ''$x"), "curl $x");
        assert_eq!(fmt("curl ''"), "curl ''");
        assert_eq!(fmt("curl ''-v"), "curl ''-v");
    }

    #[test]
    fn merges_concatenated_quotes() {
        assert_eq!(fmt("curl 'http://a/''b'"), "curl 'http://a/b'");
    }

    #[test]
    fn empty_input() {
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("  \n "), "");
    }

    #[test]
    fn idempotent_on_mixed_input() {
        let input = "# get\ncurl -X POST \"http://a/$id\" -H 'Content-Type: application/json' \\\n -d '{\"a\":${x}}' 'b'\n'c' # end";
        let once = fmt(input);
        assert_eq!(fmt(&once), once);
    }
}
