//! Unified error types for the CLI.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when resolving configuration or constructing a backend.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    /// The cloud backend was selected without a credential in the environment.
    MissingApiKey,
    /// The local runtime did not answer the construction-time probe.
    OllamaUnreachable { host: String, reason: String },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::MissingApiKey => write!(
                f,
                "OPENAI_API_KEY not set. Export it or put it in a .env file."
            ),
            Self::OllamaUnreachable { host, reason } => {
                write!(f, "ollama is not reachable at {host}: {reason}")
            }
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Errors from the chat HTTP call itself.
#[derive(Debug)]
pub enum BackendError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the provider.
    Status(u16, String),
    /// Provider answered 2xx but returned no choices at all.
    EmptyReply,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::EmptyReply => write!(f, "backend returned no reply"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ContextFileError
// ---------------------------------------------------------------------------

/// Errors reading the optional `--file` context argument.
///
/// These are recovered locally: the orchestrator prints a warning and sends
/// the prompt without the file's content.
#[derive(Debug)]
pub enum ContextFileError {
    NotFound(PathBuf),
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    Io(std::io::Error),
}

impl fmt::Display for ContextFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "context file not found: {}", path.display()),
            Self::TooLarge { path, size, limit } => write!(
                f,
                "context file too large: {} is {size} bytes (limit {limit})",
                path.display()
            ),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for ContextFileError {}

impl From<std::io::Error> for ContextFileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ExecError
// ---------------------------------------------------------------------------

/// The confirmed command could not be executed at all.
///
/// Raised only when the subprocess never started (shell unavailable, spawn
/// failure). A command that ran and exited nonzero is not an error.
#[derive(Debug)]
pub enum ExecError {
    Spawn(std::io::Error),
    /// The confirmation prompt could not be read from stdin.
    Prompt(std::io::Error),
    /// The run log could not be opened or appended.
    Log(std::io::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to start command: {e}"),
            Self::Prompt(e) => write!(f, "failed to read confirmation: {e}"),
            Self::Log(e) => write!(f, "failed to write run log: {e}"),
        }
    }
}

impl std::error::Error for ExecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = ConfigError::from(io_err);
        let s = e.to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn missing_api_key_names_the_variable() {
        assert!(ConfigError::MissingApiKey
            .to_string()
            .contains("OPENAI_API_KEY"));
    }

    #[test]
    fn ollama_unreachable_names_the_host() {
        let e = ConfigError::OllamaUnreachable {
            host: "http://127.0.0.1:11434".into(),
            reason: "connection refused".into(),
        };
        let s = e.to_string();
        assert!(s.contains("11434"), "got: {s}");
        assert!(s.contains("connection refused"), "got: {s}");
    }

    #[test]
    fn backend_error_display_variants() {
        assert_eq!(
            BackendError::Status(401, "unauthorized".into()).to_string(),
            "status 401: unauthorized"
        );
        assert_eq!(
            BackendError::EmptyReply.to_string(),
            "backend returned no reply"
        );
    }

    #[test]
    fn context_file_error_reports_size_and_limit() {
        let e = ContextFileError::TooLarge {
            path: PathBuf::from("big.txt"),
            size: 600 * 1024,
            limit: 512 * 1024,
        };
        let s = e.to_string();
        assert!(s.contains("big.txt"), "got: {s}");
        assert!(s.contains("614400"), "got: {s}");
    }

    #[test]
    fn exec_error_display_variants() {
        let spawn = ExecError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no shell",
        ));
        assert!(spawn.to_string().starts_with("failed to start command:"));
        let log = ExecError::Log(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(log.to_string().starts_with("failed to write run log:"));
    }
}
