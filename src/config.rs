//! Configuration loading from TOML files, environment variables, and
//! `.env`-style override files.
//!
//! Settings are resolved in this order of precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`OPENAI_API_KEY`, `OLLAMA_HOST`, `SGPT_MODEL`),
//!    including values injected from `.env` files
//! 3. TOML file specified via --config
//! 4. ./sgpt.toml in the current directory
//! 5. ~/.config/sgpt/sgpt.toml
//! 6. Built-in defaults
//!
//! `.env` files are loaded before anything reads the environment:
//! `~/.config/sgpt/.env` first, then `./.env` with override-on-conflict, so
//! the working-directory file wins.

use crate::error::ConfigError;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
const DEFAULT_API_TIMEOUT_SECS: u64 = 120;
/// Directory name used under both the config root and the data root.
const APP_DIR: &str = "sgpt";

/// Which chat-completion provider answers the prompt.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Openai,
    Ollama,
}

impl BackendKind {
    /// Stable identifier used in dry-run output and run-log records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Ollama => "ollama",
        }
    }
}

// ---------------------------------------------------------------------------
// Settings structs
// ---------------------------------------------------------------------------

/// Resolved runtime configuration, constructed once at startup and passed
/// into each component. No ambient globals.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: BackendKind,
    pub mode: String,
    pub openai: OpenAiSettings,
    pub ollama: OllamaSettings,
    pub network: NetworkSettings,
    pub color: bool,
    /// Append-only execution log location.
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Openai,
            mode: "default".to_string(),
            openai: OpenAiSettings::default(),
            ollama: OllamaSettings::default(),
            network: NetworkSettings::default(),
            color: true,
            log_path: default_log_path(),
        }
    }
}

impl Settings {
    /// Default model id for the given backend, honoring config-file overrides.
    pub fn model_for(&self, backend: BackendKind) -> String {
        match backend {
            BackendKind::Openai => self.openai.model.clone(),
            BackendKind::Ollama => self.ollama.model.clone(),
        }
    }
}

/// Cloud provider connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub base_url: String,
    /// Credential sourced from the environment, never from the TOML file.
    #[serde(skip)]
    pub api_key: String,
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            api_key: String::new(),
            model: DEFAULT_OPENAI_MODEL.into(),
        }
    }
}

/// Local runtime connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub host: String,
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.into(),
            model: DEFAULT_OLLAMA_MODEL.into(),
        }
    }
}

/// HTTP timeout policy for the chat call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub api_timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    defaults: FileDefaults,
    openai: OpenAiSettings,
    ollama: OllamaSettings,
    network: NetworkSettings,
    display: FileDisplay,
    log: FileLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FileDefaults {
    mode: String,
    backend: BackendKind,
}

impl Default for FileDefaults {
    fn default() -> Self {
        Self {
            mode: "default".to_string(),
            backend: BackendKind::Openai,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FileDisplay {
    color: bool,
}

impl Default for FileDisplay {
    fn default() -> Self {
        Self { color: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileLog {
    path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `.env`-style override files into the process environment.
///
/// Values already present in the real environment are not clobbered by the
/// per-user file; the working-directory file is loaded with override so it
/// wins on key conflicts.
pub fn load_env_files() {
    if let Some(dir) = config_root_dir() {
        let _ = dotenvy::from_path(dir.join(APP_DIR).join(".env"));
    }
    let _ = dotenvy::from_path_override("./.env");
}

/// Load settings from disk and environment.
///
/// `path_override` is an explicit config file path (from --config); it must
/// exist. The implicit locations are optional.
pub fn load_settings(path_override: Option<&str>) -> Result<Settings, ConfigError> {
    let config_text = if let Some(p) = path_override {
        std::fs::read_to_string(p)?
    } else if let Ok(text) = std::fs::read_to_string("sgpt.toml") {
        text
    } else if let Some(dir) = config_root_dir() {
        std::fs::read_to_string(dir.join(APP_DIR).join("sgpt.toml")).unwrap_or_default()
    } else {
        String::new()
    };

    let mut settings = settings_from_toml(&config_text)?;
    apply_env_overrides_with(&mut settings, |name| std::env::var(name).ok());
    tracing::debug!(
        backend = settings.backend.label(),
        log_path = %settings.log_path.display(),
        "settings resolved"
    );
    Ok(settings)
}

/// Parse a TOML document into settings, applying built-in defaults.
fn settings_from_toml(text: &str) -> Result<Settings, ConfigError> {
    let parsed: FileConfig = toml::from_str(text)?;
    Ok(Settings {
        backend: parsed.defaults.backend,
        mode: parsed.defaults.mode,
        openai: parsed.openai,
        ollama: parsed.ollama,
        network: parsed.network,
        color: parsed.display.color,
        log_path: parsed.log.path.unwrap_or_else(default_log_path),
    })
}

/// Apply environment overrides through an injectable lookup.
fn apply_env_overrides_with(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("OPENAI_API_KEY") {
        settings.openai.api_key = key.trim().to_string();
    }
    if let Some(host) = lookup("OLLAMA_HOST") {
        let host = host.trim();
        if !host.is_empty() {
            settings.ollama.host = host.to_string();
        }
    }
    if let Some(model) = lookup("SGPT_MODEL") {
        let model = model.trim();
        if !model.is_empty() {
            settings.openai.model = model.to_string();
            settings.ollama.model = model.to_string();
        }
    }
}

/// Per-user config root (`~/.config`, or the platform config dir).
fn config_root_dir() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// Default run-log location (`<data dir>/sgpt/run.log`).
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("run.log")
}
