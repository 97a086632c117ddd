use std::time::Duration;

use crate::tmux::{Multiplexer, Target};

/// Bounded retry for the pending-input probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total probes, including the first
    pub max_attempts: u32,
    /// Wait between a busy probe and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Decide whether a human is typing into the target pane.
///
/// Probes up to `policy.max_attempts` times, sleeping `policy.delay` after each
/// busy probe that still has an attempt after it. A probe that errors counts as
/// idle, so a broken probe never holds a message back.
pub async fn is_busy<M: Multiplexer>(mux: &M, target: &Target, policy: &RetryPolicy) -> bool {
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        let busy = match mux.has_pending_input(target).await {
            Ok(busy) => busy,
            Err(err) => {
                tracing::debug!(%target, attempt, error = %err, "pending-input probe failed");
                false
            }
        };

        if !busy {
            return false;
        }

        if attempt < attempts {
            tracing::debug!(%target, attempt, delay = ?policy.delay, "target has pending input, waiting");
            tokio::time::sleep(policy.delay).await;
        }
    }

    true
}
