// ABOUTME: Syntax highlighting through an external pygmentize process
// ABOUTME: Pipes code to the highlighter and returns its HTML output

use crate::config::{DEFAULT_FORMAT, DEFAULT_LEXER, DEFAULT_PYGMENTIZE_BIN, DEFAULT_TIMEOUT_MS};
use crate::errors::{Result, SlidedownError};
use log::{debug, warn};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Anything that can turn a code fragment into highlighted HTML.
pub trait Highlight {
    fn highlight(&self, code: &str, lexer: &str) -> Result<String>;
}

/// Configuration for the external highlighter process
#[derive(Debug, Clone)]
pub struct HighlighterConfig {
    pub bin: PathBuf,
    pub lexer: String,
    pub format: String,
    pub timeout: Duration,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            bin: PathBuf::from(DEFAULT_PYGMENTIZE_BIN),
            lexer: DEFAULT_LEXER.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Highlighter backed by a `pygmentize`-compatible binary.
#[derive(Debug, Clone, Default)]
pub struct Pygmentize {
    config: HighlighterConfig,
}

impl Pygmentize {
    pub fn new(config: HighlighterConfig) -> Self {
        Self { config }
    }

    /// Highlight `target` with the given lexer and output format.
    ///
    /// `target` may be a path to a readable file, in which case the file is
    /// highlighted, or literal code. `overrides` are extra `(flag, value)`
    /// pairs; a flag already present (`l` or `f`) is replaced in place.
    pub fn colorize(
        &self,
        target: &str,
        lexer: &str,
        format: &str,
        overrides: &[(&str, &str)],
    ) -> Result<String> {
        let payload = resolve_payload(target);
        let args = command_args(lexer, format, overrides);
        self.execute(&args, &payload)
    }

    fn execute(&self, args: &[String], payload: &str) -> Result<String> {
        let bin = &self.config.bin;
        debug!("Running highlighter: {:?} {}", bin, args.join(" "));

        let mut child = Command::new(bin)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SlidedownError::HighlighterUnavailable {
                bin: bin.clone(),
                source,
            })?;

        let (mut stdin, mut stdout, mut stderr) =
            match (child.stdin.take(), child.stdout.take(), child.stderr.take()) {
                (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
                _ => {
                    let _ = child.kill();
                    return Err(SlidedownError::HighlighterUnavailable {
                        bin: bin.clone(),
                        source: std::io::Error::other("highlighter pipes were not captured"),
                    });
                }
            };

        // Writing happens off-thread so a chatty child cannot deadlock us on a full pipe
        let input = stdin_payload(payload);
        let writer = thread::spawn(move || {
            let result = stdin.write_all(input.as_bytes());
            drop(stdin);
            result
        });

        // Each pipe gets its own reader; a full stderr must not stall stdout
        let error_reader = thread::spawn(move || {
            let mut err = String::new();
            let _ = stderr.read_to_string(&mut err);
            err
        });

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut out = String::new();
            let _ = tx.send(stdout.read_to_string(&mut out).map(|_| out));
        });

        let output = match rx.recv_timeout(self.config.timeout) {
            Ok(read) => read?,
            Err(_) => {
                warn!(
                    "Highlighter {:?} timed out after {} ms, killing it",
                    bin,
                    self.config.timeout.as_millis()
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(SlidedownError::HighlighterTimeout {
                    bin: bin.clone(),
                    timeout_ms: self.config.timeout.as_millis() as u64,
                });
            }
        };

        let status = child.wait()?;
        let errors = error_reader.join().unwrap_or_default();
        if let Ok(Err(e)) = writer.join() {
            // A highlighter that exits early closes its stdin; the status tells the real story
            debug!("Highlighter stdin closed early: {}", e);
        }

        if !status.success() {
            return Err(SlidedownError::HighlighterFailed {
                exit_code: status.code(),
                stderr: errors.trim().to_string(),
            });
        }

        Ok(output.trim().to_string())
    }
}

impl Highlight for Pygmentize {
    fn highlight(&self, code: &str, lexer: &str) -> Result<String> {
        self.colorize(code, lexer, &self.config.format, &[])
    }
}

/// Pick the text to send to the highlighter.
///
/// A single-line target naming a readable file is replaced by the file's
/// contents; everything else is literal code with trailing whitespace removed.
fn resolve_payload(target: &str) -> String {
    let looks_like_path = !target.is_empty() && !target.contains('\n');
    if looks_like_path && Path::new(target).is_file() {
        match fs::read_to_string(target) {
            Ok(contents) => {
                debug!("Highlighting contents of file {:?}", target);
                return contents;
            }
            Err(e) => debug!("Could not read {:?} ({}), using it as code", target, e),
        }
    }
    target.trim_end().to_string()
}

/// Text written to the highlighter's stdin, always newline-terminated.
fn stdin_payload(payload: &str) -> String {
    let mut input = payload.to_string();
    if !input.ends_with('\n') {
        input.push('\n');
    }
    input
}

/// Build the `-l <lexer> -f <format> ...` argument list.
fn command_args(lexer: &str, format: &str, overrides: &[(&str, &str)]) -> Vec<String> {
    let mut options: Vec<(String, String)> = vec![
        ("l".to_string(), lexer.to_string()),
        ("f".to_string(), format.to_string()),
    ];

    for (flag, value) in overrides {
        let flag = flag.trim_start_matches('-');
        match options.iter_mut().find(|(existing, _)| existing == flag) {
            Some(entry) => entry.1 = value.to_string(),
            None => options.push((flag.to_string(), value.to_string())),
        }
    }

    options
        .into_iter()
        .flat_map(|(flag, value)| [format!("-{}", flag), value])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_command_args_defaults() {
        assert_eq!(command_args("ruby", "html", &[]), ["-l", "ruby", "-f", "html"]);
    }

    #[test]
    fn test_command_args_overrides_replace_and_append() {
        let args = command_args("ruby", "html", &[("f", "latex"), ("-O", "linenos=1")]);
        assert_eq!(args, ["-l", "ruby", "-f", "latex", "-O", "linenos=1"]);
    }

    #[test]
    fn test_literal_code_is_trimmed_not_opened() {
        assert_eq!(resolve_payload("puts 1\n\n  "), "puts 1");
        assert_eq!(resolve_payload("  indented\n"), "  indented");
        assert_eq!(resolve_payload("/definitely/not/a/real/file.rb"), "/definitely/not/a/real/file.rb");
    }

    #[test]
    fn test_file_target_uses_contents() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"x = 1\n").expect("Failed to write to temp file");

        let path = file.path().to_str().unwrap();
        assert_eq!(resolve_payload(path), "x = 1\n");
    }

    #[test]
    fn test_stdin_payload_adds_single_trailing_newline() {
        assert_eq!(stdin_payload("puts 1"), "puts 1\n");
        assert_eq!(stdin_payload("x = 1\n"), "x = 1\n");
        assert_eq!(stdin_payload("a\n\n"), "a\n\n");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let highlighter = Pygmentize::new(HighlighterConfig {
            bin: PathBuf::from("/nonexistent/pygmentize"),
            ..HighlighterConfig::default()
        });

        let err = highlighter.highlight("puts 1", "ruby").unwrap_err();
        assert!(matches!(err, SlidedownError::HighlighterUnavailable { .. }));
    }
}
