use once_cell::sync::Lazy;
use regex::Regex;

use super::{ProcessInspector, Window};

/// Version strings the agent reports as its own foreground command (e.g. "2.1.25")
static RE_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.\-]+)?$").unwrap()
});

/// The agent's input line: "> text", "❯ text", optionally framed by box borders
static RE_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*│?\s*(?:>|❯)(?:\s+(?P<text>.*?))?\s*│?\s*$").unwrap()
});

/// Dimmed hint text the agent shows in an empty input line
static RE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:Try ".*"|Press up to edit queued messages)$"#).unwrap()
});

/// How many trailing screen lines are searched for the prompt
const PROMPT_SEARCH_LINES: usize = 20;

/// Process names that identify the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Primary agent process names
    pub names: Vec<String>,
    /// Interpreters known to host the agent
    pub hosts: Vec<String>,
    /// Shells whose descendants are inspected
    pub shells: Vec<String>,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            names: vec!["claude".to_string()],
            hosts: vec!["node".to_string()],
            shells: ["bash", "zsh", "sh", "fish", "dash", "ksh", "tcsh", "csh", "nu"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl AgentProfile {
    fn is_shell(&self, command: &str) -> bool {
        let base = basename(command).trim_start_matches('-');
        self.shells.iter().any(|s| s.eq_ignore_ascii_case(base))
    }
}

/// Name or version check on a single command string
pub fn command_looks_like_agent(command: &str, profile: &AgentProfile) -> bool {
    let lower = command.to_lowercase();
    let named = profile
        .names
        .iter()
        .chain(profile.hosts.iter())
        .any(|n| !n.is_empty() && lower.contains(&n.to_lowercase()));

    named || RE_VERSION.is_match(command.trim())
}

/// Decide whether a window is likely running the agent.
///
/// The foreground command is checked first. When it is a shell, the shell's
/// descendants are checked too, since the agent is often launched from one.
/// A failed process lookup counts as "no agent found".
pub async fn is_agent_window<P: ProcessInspector>(
    window: &Window,
    profile: &AgentProfile,
    inspector: &P,
) -> bool {
    if command_looks_like_agent(&window.command, profile) {
        return true;
    }

    if !profile.is_shell(&window.command) {
        return false;
    }

    let Some(pid) = window.pane_pid else {
        return false;
    };

    match inspector.children(pid).await {
        Ok(children) => children
            .iter()
            .any(|child| command_looks_like_agent(basename(child), profile)),
        Err(err) => {
            tracing::debug!(window = window.index, pid, error = %err, "process lookup failed");
            false
        }
    }
}

/// Analyze captured pane content for text typed into the agent's prompt.
///
/// Looks for the bottom-most prompt line in the last lines of the screen. Any
/// text after the prompt glyph, other than the agent's own placeholder hint,
/// means somebody is in the middle of typing.
pub fn has_pending_input(content: &str) -> bool {
    let lines: Vec<&str> = content.trim_end().lines().collect();
    let start = lines.len().saturating_sub(PROMPT_SEARCH_LINES);

    for line in lines[start..].iter().rev() {
        if let Some(caps) = RE_PROMPT.captures(line) {
            let text = caps.name("text").map(|m| m.as_str().trim()).unwrap_or("");
            return !text.is_empty() && !RE_PLACEHOLDER.is_match(text);
        }
    }

    false
}

fn basename(command: &str) -> &str {
    command.rsplit('/').next().unwrap_or(command)
}
