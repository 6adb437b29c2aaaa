//! Terminal output formatting.
//!
//! All user-facing output funnels through `Renderer`: status chrome and
//! errors go to stderr, the assistant's answer and command output go to
//! stdout. Markdown answers are laid out with `termimad`. Quiet mode strips
//! the chrome and prints raw answer text only.

use crossterm::style::{Color, Stylize};
use termimad::MadSkin;

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
    /// Whether decorative output is suppressed.
    quiet: bool,
}

impl Renderer {
    /// Create a renderer with optional color and quiet flags.
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// Print a titled section divider (to stderr).
    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{}", title.with(Color::Cyan).bold());
        } else {
            eprintln!("[{title}]");
        }
    }

    /// Print one key/value field row (to stderr).
    pub fn field(&self, key: &str, value: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("  {} {value}", format!("{key}:").with(Color::DarkGrey));
        } else {
            eprintln!("  {key}: {value}");
        }
    }

    /// Print a warning line (to stderr). Shown even in quiet mode.
    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", "warning:".with(Color::Yellow).bold());
        } else {
            eprintln!("warning: {msg}");
        }
    }

    /// Print an error line (to stderr). Shown even in quiet mode.
    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", "error:".with(Color::Red).bold());
        } else {
            eprintln!("error: {msg}");
        }
    }

    /// Print the assistant's answer (to stdout).
    ///
    /// Quiet mode prints the raw reply; otherwise the reply is rendered as
    /// terminal markdown.
    pub fn assistant_message(&self, content: &str) {
        if self.quiet {
            println!("{content}");
            return;
        }
        println!("{}", render_markdown(content, self.color));
    }

    /// Show the candidate command ahead of the confirmation prompt.
    pub fn confirm_block(&self, command: &str) {
        if self.color {
            eprintln!("{}", "About to execute:".with(Color::Cyan).bold());
            for line in command.lines() {
                eprintln!("  {}", line.with(Color::White).bold());
            }
        } else {
            eprintln!("About to execute:");
            for line in command.lines() {
                eprintln!("  {line}");
            }
        }
    }

    /// Print captured stdout of an executed command (to stdout).
    pub fn command_output(&self, stdout: &str) {
        self.section("command output");
        print!("{stdout}");
        if !stdout.ends_with('\n') {
            println!();
        }
    }

    /// Print captured stderr of an executed command, flagged as errors.
    pub fn command_errors(&self, stderr: &str) {
        if self.color {
            eprintln!("{}", "errors".with(Color::Red).bold());
        } else {
            eprintln!("[errors]");
        }
        eprint!("{stderr}");
        if !stderr.ends_with('\n') {
            eprintln!();
        }
    }

    /// Print the numeric exit code of an executed command.
    pub fn exit_code(&self, code: i32) {
        if self.color {
            eprintln!("{} {code}", "exit code:".with(Color::Cyan));
        } else {
            eprintln!("exit code: {code}");
        }
    }
}

/// Render markdown for the terminal, plain when color is disabled.
fn render_markdown(input: &str, color: bool) -> String {
    let skin = if color {
        MadSkin::default()
    } else {
        MadSkin::no_style()
    };
    let formatted = skin.text(input, None).to_string();
    formatted.trim_end_matches('\n').to_string()
}

/// Char-safe preview with an ellipsis marker when truncation occurs.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_preserves_list_content() {
        let out = render_markdown("# Title\n\n- a\n- b", false);
        assert!(out.contains("Title"));
        assert!(out.contains("a"));
        assert!(out.contains("b"));
    }

    #[test]
    fn markdown_keeps_code_content() {
        let out = render_markdown("```bash\nls -la\n```", false);
        assert!(out.contains("ls -la"));
    }

    #[test]
    fn markdown_trims_trailing_blank_lines() {
        let out = render_markdown("hello\n\n\n", false);
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn truncate_preview_short_text_unchanged() {
        assert_eq!(truncate_preview("short", 10), "short");
    }

    #[test]
    fn truncate_preview_adds_marker() {
        assert_eq!(truncate_preview("abcdefgh", 3), "abc...");
    }

    #[test]
    fn truncate_preview_counts_chars_not_bytes() {
        assert_eq!(truncate_preview("ééééé", 3), "ééé...");
    }
}
