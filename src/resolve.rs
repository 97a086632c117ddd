use crate::error::QueueError;
use crate::glob;
use crate::tmux::{is_agent_window, AgentProfile, Multiplexer, ProcessInspector, Window};

/// Window selection options for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    /// Window of the caller; excluded unless `include_self`
    pub self_window: Option<u32>,
    /// Names or stringified indices; empty means no restriction
    pub names: Vec<String>,
    /// Glob matched against window names
    pub pattern: Option<String>,
    pub include_non_agent: bool,
    pub include_self: bool,
}

/// Session and ordered windows chosen to receive the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub session: String,
    pub targets: Vec<Window>,
}

/// Work out the target session and the windows in it that pass every filter.
///
/// An explicit `session` wins over the caller's own session and turns
/// self-exclusion off. An empty target list is a valid result.
pub async fn resolve<M, P>(
    mux: &M,
    inspector: &P,
    profile: &AgentProfile,
    session: Option<&str>,
    filters: &FilterContext,
) -> Result<Resolution, QueueError>
where
    M: Multiplexer,
    P: ProcessInspector,
{
    let (session, self_window) = match (session, mux.is_inside()) {
        (Some(session), _) => (session.to_string(), None),
        (None, true) => {
            let ctx = mux.current_context().await.map_err(|err| {
                tracing::debug!(error = %err, "failed to read tmux context");
                QueueError::Context
            })?;
            tracing::debug!(session = %ctx.session, window = ctx.window, pane = %ctx.pane_id, "current context");
            (ctx.session, Some(ctx.window))
        }
        (None, false) => return Err(QueueError::Context),
    };

    if !mux.session_exists(&session).await {
        return Err(QueueError::SessionNotFound(session));
    }

    let mut windows = mux
        .list_windows(&session)
        .await
        .map_err(|err| QueueError::Enumeration {
            session: session.clone(),
            reason: format!("{err:#}"),
        })?;
    windows.sort_by_key(|w| w.index);

    let filters = FilterContext {
        self_window,
        ..filters.clone()
    };
    let targets = filter_windows(windows, &filters, profile, inspector).await;
    tracing::debug!(%session, targets = targets.len(), "resolved targets");

    Ok(Resolution { session, targets })
}

/// Apply self-exclusion, name list, pattern and agent filters in that order
pub async fn filter_windows<P: ProcessInspector>(
    windows: Vec<Window>,
    filters: &FilterContext,
    profile: &AgentProfile,
    inspector: &P,
) -> Vec<Window> {
    let mut targets = Vec::with_capacity(windows.len());

    for window in windows {
        if !filters.include_self && filters.self_window == Some(window.index) {
            tracing::trace!(window = window.index, "skipping own window");
            continue;
        }

        if !filters.names.is_empty() {
            let index = window.index.to_string();
            if !filters.names.iter().any(|n| *n == window.name || *n == index) {
                continue;
            }
        }

        if let Some(pattern) = &filters.pattern {
            if !glob::matches(&window.name, pattern) {
                continue;
            }
        }

        if !filters.include_non_agent && !is_agent_window(&window, profile, inspector).await {
            tracing::trace!(window = window.index, command = %window.command, "no agent detected");
            continue;
        }

        targets.push(window);
    }

    targets
}
