// ABOUTME: Configuration module for the slidedown application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::highlight::HighlighterConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PYGMENTIZE_BIN: &str = "/usr/local/bin/pygmentize";
pub const DEFAULT_LEXER: &str = "ruby";
pub const DEFAULT_FORMAT: &str = "html";
pub const DEFAULT_TITLE: &str = "Slides";
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub pygmentize_bin: PathBuf,
    pub highlight_timeout_ms: u64,
    pub default_lexer: String,
    pub default_format: String,
    pub title: String,
    pub template_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pygmentize_bin: PathBuf::from(DEFAULT_PYGMENTIZE_BIN),
            highlight_timeout_ms: DEFAULT_TIMEOUT_MS, // 30 seconds
            default_lexer: DEFAULT_LEXER.to_string(),
            default_format: DEFAULT_FORMAT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            template_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Read once at startup; the resulting value is passed down explicitly.
    pub fn from_env() -> Self {
        let pygmentize_bin = env::var("PYGMENTIZE_BIN")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PYGMENTIZE_BIN));
        let highlight_timeout_ms = env::var("SLIDEDOWN_HIGHLIGHT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let title = env::var("SLIDEDOWN_TITLE").unwrap_or_else(|_| DEFAULT_TITLE.to_string());
        let template_dir = env::var("SLIDEDOWN_TEMPLATE_DIR").ok().map(PathBuf::from);

        Self {
            pygmentize_bin,
            highlight_timeout_ms,
            title,
            template_dir,
            ..Self::default()
        }
    }

    /// Get a highlighter configuration with defaults from this config
    pub fn highlighter_config(&self) -> HighlighterConfig {
        HighlighterConfig {
            bin: self.pygmentize_bin.clone(),
            lexer: self.default_lexer.clone(),
            format: self.default_format.clone(),
            timeout: Duration::from_millis(self.highlight_timeout_ms),
        }
    }
}
