//! Configuration for the interactive shell.

/// Default primary prompt.
pub const DEFAULT_PROMPT: &str = "branchline> ";

/// Configuration for a [`Shell`](crate::Shell).
///
/// Controls prompting, styling, validation and history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    /// Primary prompt.
    pub prompt: String,

    /// Whether output is styled with ANSI sequences.
    pub color: bool,

    /// Whether option validators run before population.
    pub validate: bool,

    /// Number of lines kept in the in-memory history.
    pub history_size: usize,

    /// `tracing` filter directives. `None` reads `BRANCHLINE_LOG`.
    pub log_filter: Option<String>,

    /// Whether to print the welcome banner.
    pub show_banner: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            color: true,
            validate: true,
            history_size: 1000,
            log_filter: None,
            show_banner: true,
        }
    }
}

impl ShellConfig {
    /// Creates a configuration for running scripts: no banner, no color.
    #[must_use]
    pub fn batch() -> Self {
        Self {
            color: false,
            show_banner: false,
            ..Self::default()
        }
    }

    /// Builder method to set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder method to enable/disable styled output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Builder method to enable/disable validation.
    #[must_use]
    pub const fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Builder method to set history size.
    #[must_use]
    pub const fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    /// Builder method to set log filter directives.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Builder method to show/hide the banner.
    #[must_use]
    pub const fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }
}
