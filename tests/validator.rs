use curlcell::{
    Platform, SyntaxErrorKind, ValidationError, Variable, lex, validate,
    validator::validate_syntax,
};

#[test]
fn validate_clean_command() {
    let vars = [Variable::manual("id", "1"), Variable::manual("token", "t")];
    let input = "curl \\\n  -X POST 'https://api.test/users/'$id \\\n  -H \"Authorization: Bearer ${token}\" \\\n  -d '{}'";
    assert!(validate(input, &vars, Platform::Unix).is_empty());
    assert!(validate(input, &vars, Platform::Browser).is_empty());
}

#[test]
fn validate_missing_variable_exactly_once() {
    let errors = validate("curl $undefined 'http://a'", &[], Platform::Unix);
    assert_eq!(errors.len(), 1);
    let ValidationError::MissingVariable(error) = &errors[0] else {
        panic!("expected missing variable, got {:?}", errors[0]);
    };
    assert_eq!(error.variable, "$undefined");
    assert_eq!(error.line, 1);
    assert_eq!(errors[0].message(), "Variable not found: $undefined");
}

#[test]
fn validate_errors_are_ordered_by_position() {
    let errors = validate("curl --frobnicate $a \\\n  -H \"x: ${b}\"", &[], Platform::Unix);
    let summary: Vec<(usize, usize, String)> = errors
        .iter()
        .map(|e| (e.line(), e.column(), e.message()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, 6, "Unsupported option: --frobnicate".to_string()),
            (1, 19, "Variable not found: $a".to_string()),
            (2, 10, "Variable not found: ${b}".to_string()),
        ]
    );
    assert_eq!(errors[2].length(), 4);
}

#[test]
fn validate_response_globals_are_defined() {
    assert!(validate("curl http://a -d $res_body -H \"x: $res_headers\"", &[], Platform::Unix).is_empty());
}

#[test]
fn validate_local_address_only_in_browser() {
    let errors = validate("curl http://localhost:3000", &[], Platform::Browser);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message().contains("local IP"));
    assert!(validate("curl http://localhost:3000", &[], Platform::Unix).is_empty());
    assert!(validate("curl http://localhost:3000", &[], Platform::Windows).is_empty());
}

#[test]
fn validate_private_networks_in_browser() {
    for url in [
        "http://192.168.0.10/api",
        "'http://10.1.2.3:8080'",
        "http://172.16.0.1",
        "http://169.254.1.1",
        "http://[fd00::1]/",
        "http://[fe80::1]/",
        "http://api.localhost/",
    ] {
        let errors = validate(&format!("curl {url}"), &[], Platform::Browser);
        assert_eq!(errors.len(), 1, "{url} should be local");
    }
    assert!(validate("curl https://93.184.216.34", &[], Platform::Browser).is_empty());
}

#[test]
fn validate_multiple_urls_at_second_url() {
    let errors = validate_syntax(&lex("curl 'http://a' 'http://b'"), Platform::Unix);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::MultipleUrls);
    assert_eq!(errors[0].error_message(), "multiple URLs are not supported");
    assert_eq!((errors[0].line, errors[0].column), (1, 17));
}

#[test]
fn validate_missing_curl_keyword() {
    let errors = validate("wget http://a", &[], Platform::Unix);
    assert!(!errors.is_empty());
    assert_eq!(errors[0].message(), "curl command is missing");
    assert_eq!((errors[0].line(), errors[0].column()), (1, 1));
}

#[test]
fn validate_ignores_comments() {
    let input = "# curl http://a http://b\ncurl http://a # http://b";
    assert!(validate(input, &[], Platform::Unix).is_empty());
}
