use std::fmt;

/// A typed span of source text produced by the generic tokenizer.
///
/// `kind` is `None` for text no pattern has claimed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub value: String,
    /// Byte offset of `value` in the original source.
    pub index: usize,
    pub kind: Option<K>,
}

impl<K> Token<K> {
    /// Byte offset one past the end of this token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.index + self.value.len()
    }
}

/// Part kinds produced by the curl lexer and grouper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Quoted string or bare word.
    Value,
    /// Command-line flag (`-H`, `--data`).
    Option,
    /// The leading `curl` keyword.
    Curl,
    /// `$name` / `${name}` outside of quotes.
    Variable,
    /// `$name` / `${name}` inside a double-quoted string.
    EscapedVariable,
    /// Run of blanks, excluding newlines.
    Space,
    /// Bare newline.
    Newline,
    /// Line continuation (`\` or `` ` `` followed by a newline).
    BackslashNewline,
    /// `# ...` up to the end of the line.
    Comment,
    /// Contiguous values and variables fused by the grouper.
    EmbeddedValue,
}

impl PartKind {
    /// Whether the part carries argument text (a value or a reference).
    #[must_use]
    pub const fn is_value_like(self) -> bool {
        matches!(
            self,
            Self::Value | Self::Variable | Self::EscapedVariable | Self::EmbeddedValue
        )
    }

    /// Whether the part only separates other parts.
    #[must_use]
    pub const fn is_delimiter(self) -> bool {
        matches!(self, Self::Space | Self::Newline | Self::BackslashNewline)
    }

    /// Kebab-case name, as shown in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Option => "option",
            Self::Curl => "curl",
            Self::Variable => "variable",
            Self::EscapedVariable => "escaped-variable",
            Self::Space => "space",
            Self::Newline => "newline",
            Self::BackslashNewline => "backslash-newline",
            Self::Comment => "comment",
            Self::EmbeddedValue => "embedded-value",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, positioned piece of a curl command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlPart {
    pub kind: PartKind,
    pub value: String,
    /// Byte offset into the normalized source.
    pub index: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based character column from the last newline.
    pub column: usize,
}

impl CurlPart {
    /// Byte offset one past the end of this part.
    #[must_use]
    pub fn end(&self) -> usize {
        self.index + self.value.len()
    }

    /// Length of `value` in characters, used for caret ranges.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}
