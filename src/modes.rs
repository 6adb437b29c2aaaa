//! Built-in prompt modes that steer the assistant's answer style.
//!
//! A mode is a named system-prompt persona. The table is fixed at compile
//! time; the CLI validates `--mode` against [`names`] before the orchestrator
//! runs, so lookups on validated input never miss.

/// A named system-prompt persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    pub system_prompt: &'static str,
}

const MODES: &[Mode] = &[
    Mode {
        name: "default",
        system_prompt: "You are a concise, safety-aware terminal copilot. \
            Prefer minimal commands and clear step-by-step reasoning when asked, \
            but never execute commands yourself, only print them. \
            When providing commands, add brief inline comments. \
            If a request could enable unethical or illegal activity, refuse and \
            suggest safer alternatives.",
    },
    Mode {
        name: "bash",
        system_prompt: "You generate POSIX-compliant Bash one-liners and short scripts. \
            Add brief comments (#) explaining flags and important steps. \
            Never execute, only print commands.",
    },
    Mode {
        name: "powershell",
        system_prompt: "You generate Windows PowerShell commands and short scripts with \
            comments. Focus on cross-version compatibility when possible. \
            Never execute, only print commands.",
    },
    Mode {
        name: "forensics",
        system_prompt: "You act as a digital forensics copilot. \
            Prioritize chain-of-custody, integrity (hashing), and write-blocking. \
            Offer commands for triage and artifact collection (e.g., Windows Prefetch, \
            NTFS MFT, Event Logs) with references to standard tools. \
            Never provide malware or exploit code.",
    },
    Mode {
        name: "recon",
        system_prompt: "You assist with lawful, consent-based reconnaissance for \
            blue-team validation. Prefer passive techniques (OSINT) before active. \
            Add cautions and scope notes. Never provide unlawful guidance.",
    },
];

/// Look up a mode by name.
pub fn lookup(name: &str) -> Option<Mode> {
    MODES.iter().copied().find(|mode| mode.name == name)
}

/// All registered mode names, in table order.
pub fn names() -> Vec<&'static str> {
    MODES.iter().map(|mode| mode.name).collect()
}
