//! Optional file context appended to the user prompt.
//!
//! The file is read as bytes and decoded leniently: invalid UTF-8 sequences
//! are dropped rather than failing the whole prompt. Oversized or missing
//! files are reported to the caller, which degrades to a no-context prompt.

use crate::error::ContextFileError;
use std::path::Path;

/// Largest context file accepted, in bytes (512 KiB).
pub const MAX_CONTEXT_BYTES: u64 = 512 * 1024;

/// Read a context file, enforcing the size cap.
pub fn read_context_file(path: &Path) -> Result<String, ContextFileError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ContextFileError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ContextFileError::Io(e)),
    };
    if metadata.len() > MAX_CONTEXT_BYTES {
        return Err(ContextFileError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_CONTEXT_BYTES,
        });
    }

    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// Wrap file content in a delimited block appended to the user prompt.
///
/// The context always travels inside the single user prompt, never as a
/// separate message.
pub fn append_context(prompt: &str, path: &Path, content: &str) -> String {
    format!(
        "{prompt}\n\n[CONTEXT FROM FILE {}]\n{content}\n[/CONTEXT]",
        path.display()
    )
}

/// Decode bytes as UTF-8, dropping invalid sequences.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&ch| ch != char::REPLACEMENT_CHARACTER)
        .collect()
}
