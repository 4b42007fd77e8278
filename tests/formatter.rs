mod common;

use common::assert_idempotent;
use curlcell::{FormatCurlOptions, Platform, Variable, format_curl, validate};

fn fmt(input: &str) -> String {
    format_curl(input, &FormatCurlOptions::default())
}

#[test]
fn format_single_line_request() {
    let output = fmt("curl 'https://api.test/users/'$id -H \"Authorization: Bearer $token\" -v");
    assert_eq!(
        output,
        "curl 'https://api.test/users/'$id \\\n  -H \"Authorization: Bearer $token\" \\\n  -v"
    );
}

#[test]
fn format_reindents_continuations() {
    let input = "curl  'http://a'\\\n-X   PUT \\\n        -d 'a=b'";
    assert_eq!(fmt(input), "curl 'http://a' \\\n  -X PUT \\\n  -d 'a=b'");
}

#[test]
fn format_keeps_leading_comments() {
    let output = fmt("# Create a user\n# (admin only)\ncurl -X POST http://a");
    assert_eq!(
        output,
        "# Create a user\n# (admin only)\ncurl \\\n  -X POST http://a"
    );
}

#[test]
fn format_removes_comments_on_request() {
    let options = FormatCurlOptions::new().without_comments();
    let output = format_curl("# Create\ncurl http://a \\\n  # body\n  -d 'x'", &options);
    assert_eq!(output, "curl http://a \\\n  -d 'x'");
}

#[test]
fn format_pretty_prints_json_with_variable_atom() {
    let input = r#"curl http://a -H 'Content-Type: application/json' -d '{"a":${x},"b":[1,2],"c":{}}'"#;
    let output = fmt(input);
    assert_eq!(
        output,
        "curl http://a \\\n  -H 'Content-Type: application/json' \\\n  -d '{\n    \"a\": ${x},\n    \"b\": [\n      1,\n      2\n    ],\n    \"c\": {}\n  }'"
    );
    assert_eq!(fmt(&output), output);
}

#[test]
fn format_windows_continuation() {
    let options = FormatCurlOptions::for_platform(Platform::Windows);
    assert_eq!(
        format_curl("curl http://a \\\n  -v", &options),
        "curl http://a `\n  -v"
    );
}

#[test]
fn format_idempotent_on_realistic_commands() {
    let inputs = [
        "curl http://a",
        "curl -X POST 'https://api.test/users' -H 'Accept: */*' --data-raw 'a=1&b=2'",
        "# list\ncurl \"http://a/$path?q=${q}\" \\\n  -u user:pass # creds\n  --compressed",
        "curl 'http://a' \\\n  'http://b'",
        "curl http://a -H 'Content-Type: application/json' -d '{\"a\":[],\"b\":{\"c\":null}}'",
        "curl http://a -d 'multi\nline'",
        "curl $'a\\nb' -d \"x\\\"y\"",
        "  \n\ncurl   http://a   \n\n",
    ];
    for input in inputs {
        assert_idempotent(input);
    }
}

#[test]
fn format_exec_flags_follow_keyword() {
    let options = FormatCurlOptions::new()
        .with_option("-s", "")
        .with_option("--output", "/tmp/out");
    assert_eq!(
        format_curl("curl http://a \\\n  -H 'a: b'", &options),
        "curl -s --output /tmp/out http://a \\\n  -H 'a: b'"
    );
}

#[test]
fn format_keeps_references_separate_from_following_text() {
    let vars = [Variable::manual("prefix", "p")];
    let input = r#"curl "http://a/$prefix""_suffix""#;
    let output = fmt(input);
    assert_eq!(output, input);
    assert!(validate(&output, &vars, Platform::Unix).is_empty());

    assert_eq!(fmt(r#"curl "$HOME"'x'"#), r#"curl "$HOME"'x'"#);
    assert_eq!(fmt(r#"curl "$HOME"'/x'"#), r#"curl "$HOME/x""#);
}
