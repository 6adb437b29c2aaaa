//! sgpt — a terminal copilot for OpenAI-compatible and local chat backends.
//!
//! This crate turns one natural-language prompt into one answer: it resolves
//! a mode (system-prompt persona), optionally folds a context file into the
//! prompt, sends a single chat request to the configured backend, and prints
//! the formatted reply. With `--exec` it additionally extracts a shell
//! command from the reply and runs it after explicit confirmation, appending
//! a record to an append-only run log.
//!
//! # Quick start
//!
//! ```
//! use sgpt::extract::extract_command;
//!
//! let cmd = extract_command("$ echo hi").unwrap();
//! assert_eq!(cmd.text, "echo hi");
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod extract;
pub mod modes;
pub mod render;
pub mod types;
