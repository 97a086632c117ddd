mod client;
#[cfg(test)]
pub mod fake;
mod heuristics;
mod process;

pub use client::TmuxClient;
pub use heuristics::{is_agent_window, AgentProfile};
pub use process::PsInspector;

use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Snapshot of one tmux window, taken once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    /// Window index, unique within its session
    pub index: u32,
    /// Window name
    pub name: String,
    /// Foreground command of the window's active pane
    pub command: String,
    /// Process id of the active pane's root process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pane_pid: Option<u32>,
}

impl Window {
    pub fn new(index: u32, name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            command: command.into(),
            pane_pid: None,
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pane_pid = Some(pid);
        self
    }
}

/// A `session:window` pair that can receive keystrokes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub session: String,
    pub window: u32,
}

impl Target {
    pub fn new(session: impl Into<String>, window: u32) -> Self {
        Self {
            session: session.into(),
            window,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session, self.window)
    }
}

/// Where the invoking process itself lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentContext {
    pub session: String,
    pub window: u32,
    pub pane_id: String,
}

/// Everything the queueing logic needs from the terminal multiplexer
#[allow(async_fn_in_trait)]
pub trait Multiplexer {
    /// Whether this process runs inside a multiplexer pane
    fn is_inside(&self) -> bool;

    /// Session, window and pane of the caller; fails outside the multiplexer
    async fn current_context(&self) -> Result<CurrentContext>;

    async fn session_exists(&self, session: &str) -> bool;

    /// Windows of a session, ordered by index
    async fn list_windows(&self, session: &str) -> Result<Vec<Window>>;

    /// Single probe: does the target pane hold unconfirmed typed input?
    async fn has_pending_input(&self, target: &Target) -> Result<bool>;

    /// Deliver `text` followed by Enter as one operation
    async fn send_to_target(&self, target: &Target, text: &str) -> Result<()>;
}

/// Read-only view of the process table
#[allow(async_fn_in_trait)]
pub trait ProcessInspector {
    /// Command names of every descendant of `pid`
    async fn children(&self, pid: u32) -> Result<Vec<String>>;
}
