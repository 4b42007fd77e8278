/// Where the command will run.
///
/// Decides the line-continuation character used when formatting and
/// whether the browser-only restrictions of the syntax validator apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Desktop app on a POSIX shell.
    Unix,
    /// Desktop app on Windows (PowerShell continuation).
    Windows,
    /// Browser-hosted app, where requests cannot reach local addresses.
    Browser,
}

impl Platform {
    /// The desktop platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Character placed before a newline to continue the command.
    #[must_use]
    pub const fn continuation(self) -> char {
        match self {
            Self::Windows => '`',
            Self::Unix | Self::Browser => '\\',
        }
    }

    #[must_use]
    pub const fn is_browser(self) -> bool {
        matches!(self, Self::Browser)
    }

    /// Executable that replaces the leading `curl` keyword when a
    /// command is handed to the process runner.
    #[must_use]
    pub const fn curl_binary(self) -> &'static str {
        match self {
            Self::Windows => "curl.exe",
            Self::Unix | Self::Browser => "curl",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
