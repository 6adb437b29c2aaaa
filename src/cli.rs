//! CLI argument parsing via clap.

use clap::Parser;
use sgpt::config::BackendKind;
use sgpt::modes;
use std::path::PathBuf;

/// Your terminal copilot (OpenAI or Ollama backend).
#[derive(Debug, Parser)]
#[command(name = "sgpt", version)]
pub struct Args {
    /// Your question or request.
    pub prompt: Vec<String>,

    /// Answer style / domain specialization.
    #[arg(short = 'm', long = "mode", value_parser = parse_mode)]
    pub mode: Option<String>,

    /// Choose cloud (openai) or local (ollama) backend.
    #[arg(short = 'b', long = "backend", value_enum)]
    pub backend: Option<BackendKind>,

    /// Model name (e.g., gpt-4o-mini or llama3).
    #[arg(long = "model")]
    pub model: Option<String>,

    /// Optional file to include as context (text only).
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Print resolved settings and exit.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print only the raw answer (no chrome).
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Execute the generated command after confirmation.
    #[arg(long = "exec")]
    pub exec: bool,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to config file (default: ./sgpt.toml or ~/.config/sgpt/sgpt.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,
}

/// Reject unknown mode names before the orchestrator runs.
fn parse_mode(value: &str) -> Result<String, String> {
    if modes::lookup(value).is_some() {
        Ok(value.to_string())
    } else {
        Err(format!(
            "unknown mode `{value}`. Valid modes: {}",
            modes::names().join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use sgpt::config::BackendKind;

    #[test]
    fn prompt_words_collect_positionally() {
        let args = Args::parse_from(["sgpt", "list", "open", "ports"]);
        assert_eq!(args.prompt, ["list", "open", "ports"]);
        assert!(!args.exec);
        assert!(!args.dry_run);
    }

    #[test]
    fn known_mode_parses() {
        let args = Args::parse_from(["sgpt", "-m", "bash", "hi"]);
        assert_eq!(args.mode.as_deref(), Some("bash"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = Args::try_parse_from(["sgpt", "-m", "poetry", "hi"]).expect_err("must fail");
        let rendered = err.to_string();
        assert!(rendered.contains("unknown mode"), "got: {rendered}");
        assert!(rendered.contains("bash"), "got: {rendered}");
    }

    #[test]
    fn backend_values_parse() {
        let args = Args::parse_from(["sgpt", "-b", "ollama", "hi"]);
        assert_eq!(args.backend, Some(BackendKind::Ollama));
        let args = Args::parse_from(["sgpt", "--backend", "openai", "hi"]);
        assert_eq!(args.backend, Some(BackendKind::Openai));
    }

    #[test]
    fn invalid_backend_is_rejected() {
        assert!(Args::try_parse_from(["sgpt", "-b", "bard", "hi"]).is_err());
    }

    #[test]
    fn exec_and_quiet_flags_parse() {
        let args = Args::parse_from(["sgpt", "--exec", "-q", "hi"]);
        assert!(args.exec);
        assert!(args.quiet);
    }

    #[test]
    fn file_flag_parses_to_path() {
        let args = Args::parse_from(["sgpt", "-f", "notes.txt", "summarize"]);
        assert_eq!(
            args.file.as_deref(),
            Some(std::path::Path::new("notes.txt"))
        );
    }
}
