//! The cURL flags a cell may use.

/// A supported cURL flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOption {
    pub name: &'static str,
    /// Whether the flag consumes the following word as its argument.
    pub takes_value: bool,
}

const fn opt(name: &'static str, takes_value: bool) -> CurlOption {
    CurlOption { name, takes_value }
}

/// Every flag accepted by the unsupported-option validator.
pub const SUPPORTED_OPTIONS: &[CurlOption] = &[
    opt("-X", true),
    opt("--request", true),
    opt("-H", true),
    opt("--header", true),
    opt("-d", true),
    opt("--data", true),
    opt("--data-raw", true),
    opt("--data-binary", true),
    opt("--data-ascii", true),
    opt("--data-urlencode", true),
    opt("--json", true),
    opt("-F", true),
    opt("--form", true),
    opt("--form-string", true),
    opt("-u", true),
    opt("--user", true),
    opt("-A", true),
    opt("--user-agent", true),
    opt("-e", true),
    opt("--referer", true),
    opt("-b", true),
    opt("--cookie", true),
    opt("-c", true),
    opt("--cookie-jar", true),
    opt("-o", true),
    opt("--output", true),
    opt("-x", true),
    opt("--proxy", true),
    opt("-m", true),
    opt("--max-time", true),
    opt("--connect-timeout", true),
    opt("--max-redirs", true),
    opt("--url", true),
    opt("--oauth2-bearer", true),
    opt("--cacert", true),
    opt("--cert", true),
    opt("-E", true),
    opt("--key", true),
    opt("--resolve", true),
    opt("--retry", true),
    opt("-G", false),
    opt("--get", false),
    opt("-I", false),
    opt("--head", false),
    opt("-L", false),
    opt("--location", false),
    opt("-k", false),
    opt("--insecure", false),
    opt("-s", false),
    opt("--silent", false),
    opt("-S", false),
    opt("--show-error", false),
    opt("-v", false),
    opt("--verbose", false),
    opt("-i", false),
    opt("--include", false),
    opt("-f", false),
    opt("--fail", false),
    opt("--compressed", false),
    opt("--http2", false),
    opt("--basic", false),
    opt("--digest", false),
    opt("--ntlm", false),
    opt("--no-buffer", false),
    opt("-N", false),
    opt("-g", false),
    opt("--globoff", false),
];

/// Look up a flag by its exact spelling.
#[must_use]
pub fn find_option(name: &str) -> Option<&'static CurlOption> {
    SUPPORTED_OPTIONS.iter().find(|o| o.name == name)
}

/// Whether `name` is a supported flag.
#[must_use]
pub fn is_supported(name: &str) -> bool {
    find_option(name).is_some()
}

/// Whether a supported flag consumes an argument. Unknown flags are
/// assumed to take one.
#[must_use]
pub fn takes_value(name: &str) -> bool {
    find_option(name).is_none_or(|o| o.takes_value)
}
