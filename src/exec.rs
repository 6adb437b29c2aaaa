//! Confirmed execution of extracted commands, with an append-only run log.
//!
//! The command runs through `sh -c`, so pipes, redirection, and substitution
//! work as written. That trust boundary is crossed only after the user has
//! seen the exact command and answered `y`. Every execution that actually
//! returned control appends one record to the run log; declines and spawn
//! failures append nothing.

use crate::config::BackendKind;
use crate::error::ExecError;
use crate::render::Renderer;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Outcome of the confirmation flow. Declining is a normal path, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The user did not approve; nothing ran, nothing was logged.
    Declined,
    /// The command ran to completion with this exit code.
    Ran(i32),
}

/// Invocation metadata recorded alongside each executed command.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext<'a> {
    pub mode: &'a str,
    pub backend: BackendKind,
    pub model: &'a str,
}

/// Captured result of one shell invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCapture {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ---------------------------------------------------------------------------
// Run log
// ---------------------------------------------------------------------------

/// Append-only execution log. Records are only ever added, never rewritten.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Point the log at its on-disk location without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where records are written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the parent directory on first use.
    pub fn append(
        &self,
        ctx: &ExecContext<'_>,
        command: &str,
        capture: &CommandCapture,
    ) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_record(ctx, command, capture).as_bytes())?;
        tracing::debug!(path = %self.path.display(), "appended execution record");
        Ok(())
    }
}

/// One newline-delimited record block.
fn format_record(ctx: &ExecContext<'_>, command: &str, capture: &CommandCapture) -> String {
    let timestamp = httpdate::fmt_http_date(SystemTime::now());
    format!(
        "[{timestamp}] rc={} mode={} backend={}:{}\nCMD:\n{command}\n--- stdout ---\n{}\n--- stderr ---\n{}\n====\n",
        capture.exit_code,
        ctx.mode,
        ctx.backend.label(),
        ctx.model,
        capture.stdout,
        capture.stderr,
    )
}

// ---------------------------------------------------------------------------
// Confirmation and execution
// ---------------------------------------------------------------------------

/// Show the command, ask for approval, and run it if approved.
///
/// The record is appended only after the child has returned control, so a
/// spawn failure can never leave a fabricated result in the log.
pub async fn confirm_and_run(
    command: &str,
    ctx: &ExecContext<'_>,
    log: &RunLog,
    renderer: &Renderer,
) -> Result<ExecOutcome, ExecError> {
    renderer.confirm_block(command);
    eprint!("Run this command? [y/N]: ");
    let answer = read_confirmation_line().map_err(ExecError::Prompt)?;
    if !answer.as_deref().is_some_and(confirmation_approved) {
        renderer.warn("Aborted by user.");
        return Ok(ExecOutcome::Declined);
    }

    let capture = run_shell(command).await?;
    log.append(ctx, command, &capture).map_err(ExecError::Log)?;

    if !capture.stdout.trim().is_empty() {
        renderer.command_output(&capture.stdout);
    }
    if !capture.stderr.trim().is_empty() {
        renderer.command_errors(&capture.stderr);
    }
    renderer.exit_code(capture.exit_code);
    Ok(ExecOutcome::Ran(capture.exit_code))
}

/// Run one command through the shell, capturing output with no timeout.
pub async fn run_shell(command: &str) -> Result<CommandCapture, ExecError> {
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(ExecError::Spawn)?;

    Ok(CommandCapture {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        // A signal-killed child has no code; record -1 rather than invent one.
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Read one line from stdin. `None` means end-of-input, treated as a decline.
fn read_confirmation_line() -> std::io::Result<Option<String>> {
    let mut input = String::new();
    let read = std::io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

/// Only a trimmed, case-insensitive `y` proceeds.
fn confirmation_approved(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Per-process counter to avoid temp-dir name collisions in fast test runs.
    static NEXT_TMP_ID: AtomicU64 = AtomicU64::new(1);

    fn test_log() -> RunLog {
        let unique = NEXT_TMP_ID.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "sgpt-runlog-test-{}-{unique}",
            std::process::id()
        ));
        RunLog::new(root.join("logs").join("run.log"))
    }

    fn test_ctx() -> ExecContext<'static> {
        ExecContext {
            mode: "bash",
            backend: BackendKind::Openai,
            model: "gpt-4o-mini",
        }
    }

    fn test_capture(code: i32) -> CommandCapture {
        CommandCapture {
            stdout: "out line\n".into(),
            stderr: "err line\n".into(),
            exit_code: code,
        }
    }

    #[test]
    fn record_contains_every_field() {
        let record = format_record(&test_ctx(), "ls -la /tmp", &test_capture(0));
        assert!(record.contains("rc=0"), "got: {record}");
        assert!(record.contains("mode=bash"), "got: {record}");
        assert!(record.contains("backend=openai:gpt-4o-mini"), "got: {record}");
        assert!(record.contains("CMD:\nls -la /tmp\n"), "got: {record}");
        assert!(record.contains("--- stdout ---\nout line\n"), "got: {record}");
        assert!(record.contains("--- stderr ---\nerr line\n"), "got: {record}");
        assert!(record.ends_with("====\n"), "got: {record}");
    }

    #[test]
    fn record_keeps_true_nonzero_exit_code() {
        let record = format_record(&test_ctx(), "false", &test_capture(42));
        assert!(record.contains("rc=42"), "got: {record}");
    }

    #[test]
    fn append_creates_parent_directory() {
        let log = test_log();
        log.append(&test_ctx(), "uptime", &test_capture(0))
            .expect("append should succeed");
        assert!(log.path().exists());
    }

    #[test]
    fn append_accumulates_records() {
        let log = test_log();
        log.append(&test_ctx(), "first", &test_capture(0))
            .expect("first append");
        log.append(&test_ctx(), "second", &test_capture(1))
            .expect("second append");

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        assert_eq!(contents.matches("====\n").count(), 2);
        assert!(contents.contains("CMD:\nfirst\n"));
        assert!(contents.contains("CMD:\nsecond\n"));
        // Earlier records are untouched by later appends.
        let first_pos = contents.find("first").unwrap();
        let second_pos = contents.find("second").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn confirmation_accepts_only_y() {
        assert!(confirmation_approved("y"));
        assert!(confirmation_approved("Y"));
        assert!(confirmation_approved("  y \n"));
        assert!(!confirmation_approved(""));
        assert!(!confirmation_approved("\n"));
        assert!(!confirmation_approved("n"));
        assert!(!confirmation_approved("yes"));
        assert!(!confirmation_approved("sure"));
    }

    #[tokio::test]
    async fn run_shell_captures_stdout() {
        let capture = run_shell("echo hello").await.expect("command should run");
        assert_eq!(capture.exit_code, 0);
        assert_eq!(capture.stdout, "hello\n");
        assert!(capture.stderr.is_empty());
    }

    #[tokio::test]
    async fn run_shell_captures_stderr_and_exit_code() {
        let capture = run_shell("echo err >&2; exit 42")
            .await
            .expect("command should run");
        assert_eq!(capture.exit_code, 42);
        assert!(capture.stdout.is_empty());
        assert_eq!(capture.stderr, "err\n");
    }

    #[tokio::test]
    async fn run_shell_interprets_pipes() {
        let capture = run_shell("printf 'a\\nb\\nc\\n' | wc -l")
            .await
            .expect("command should run");
        assert_eq!(capture.exit_code, 0);
        assert_eq!(capture.stdout.trim(), "3");
    }

    #[tokio::test]
    async fn run_shell_multi_line_block_is_one_invocation() {
        let capture = run_shell("X=5\necho $X").await.expect("command should run");
        assert_eq!(capture.stdout.trim(), "5");
    }
}
