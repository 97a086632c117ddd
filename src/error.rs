use thiserror::Error;

/// Failures that end a run before or during delivery
#[derive(Debug, Error)]
pub enum QueueError {
    /// Not running inside tmux and no session was named
    #[error("not inside tmux; use -s/--session to specify target session")]
    Context,

    /// The named session is not known to the tmux server
    #[error("session {0:?} does not exist")]
    SessionNotFound(String),

    /// Listing the session's windows failed
    #[error("failed to list windows of session {session:?}: {reason}")]
    Enumeration { session: String, reason: String },

    /// The config file exists but could not be used
    #[error("invalid config {path}: {reason}")]
    Config { path: String, reason: String },

    /// At least one target could not be sent to
    #[error("{0} message(s) failed")]
    Delivery(usize),
}
