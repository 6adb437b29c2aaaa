//! Command extraction from assistant replies.
//!
//! Pure text analysis with no side effects: given a reply, derive at most one
//! candidate shell command. A fenced code block wins over loose prose; the
//! fallback is the first non-blank line with any leading `$ ` prompt marker
//! stripped.

use regex::Regex;
use std::sync::OnceLock;

/// Matches the first fenced block. An optional single word immediately after
/// the opening marker is consumed as a language tag whatever its value
/// (`bash` and `python` alike); the interior runs non-greedily to the first
/// closing marker. Tightening the tag to a shell-only allow-list would be a
/// behavior change, not a fix.
const FENCE_PATTERN: &str = r"(?s)```(?:\w+)?\s*(.*?)```";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern must compile"))
}

/// Where the candidate command was found in the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    /// Interior of the first fenced code block, taken as one unit.
    FencedBlock,
    /// First non-blank line of the reply, prompt marker stripped.
    FirstLine,
}

/// A single candidate command derived from one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCommand {
    pub text: String,
    pub source: CommandSource,
}

/// Derive the candidate shell command from a reply, if any.
///
/// A multi-line fenced block is returned whole; execution treats it as one
/// shell invocation, not a sequence of confirmed steps.
pub fn extract_command(reply: &str) -> Option<ExtractedCommand> {
    if let Some(captures) = fence_regex().captures(reply) {
        // A matched fence settles the question: an empty interior means no
        // command, with no fallback to the line scan.
        let text = captures[1].trim();
        if text.is_empty() {
            return None;
        }
        return Some(ExtractedCommand {
            text: text.to_string(),
            source: CommandSource::FencedBlock,
        });
    }

    let line = reply.lines().map(str::trim).find(|line| !line.is_empty())?;
    let text = strip_prompt_marker(line);
    if text.is_empty() {
        return None;
    }
    Some(ExtractedCommand {
        text: text.to_string(),
        source: CommandSource::FirstLine,
    })
}

/// Strip a leading `$` shell-prompt marker and the whitespace after it.
fn strip_prompt_marker(line: &str) -> &str {
    match line.strip_prefix('$') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
