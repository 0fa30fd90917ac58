//! Parsing options and configuration.

/// Options for parsing PDF documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Only parse the first `max_pages` pages (None = all)
    pub max_pages: Option<u32>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose content cannot be read).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Limit parsing to the first `n` pages.
    pub fn with_max_pages(mut self, n: u32) -> Self {
        self.max_pages = Some(n);
        self
    }

    /// Whether `page_num` (1-indexed) should be parsed.
    pub fn includes(&self, page_num: u32) -> bool {
        self.max_pages.map_or(true, |max| page_num <= max)
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole document on any page error
    #[default]
    Strict,
    /// Skip the failing page and continue
    Lenient,
}
