// ABOUTME: Error types for the slidedown application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlidedownError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("HTML generation error: {0}")]
    HtmlError(String),

    #[error("Highlighter not available at {bin}: {source}")]
    HighlighterUnavailable {
        bin: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Highlighter failed (exit code {exit_code:?}): {stderr}")]
    HighlighterFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Highlighter {bin} did not finish within {timeout_ms} ms")]
    HighlighterTimeout { bin: PathBuf, timeout_ms: u64 },

    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Template rendering error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),
}

pub type Result<T> = std::result::Result<T, SlidedownError>;
