use serde::Serialize;

use crate::busy::{self, RetryPolicy};
use crate::tmux::{is_agent_window, AgentProfile, Multiplexer, ProcessInspector, Target, Window};

/// Per-run delivery switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Re-check that each target still runs the agent before sending
    pub agents_only: bool,
    /// Skip the pending-input check
    pub force: bool,
    pub retry: RetryPolicy,
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Sent,
    SkippedNoAgent,
    DeferredBusy,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub window: Window,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Tallies of a delivery run, plus each target's outcome in delivery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub succeeded: usize,
    pub skipped_no_agent: usize,
    pub deferred_busy: usize,
    pub failed: usize,
    pub outcomes: Vec<TargetOutcome>,
}

impl DeliveryReport {
    fn record(&mut self, window: &Window, outcome: Outcome) {
        match &outcome {
            Outcome::Sent => self.succeeded += 1,
            Outcome::SkippedNoAgent => self.skipped_no_agent += 1,
            Outcome::DeferredBusy => self.deferred_busy += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push(TargetOutcome {
            window: window.clone(),
            outcome,
        });
    }

    /// A run fails only when a send that was attempted failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn skipped(&self) -> usize {
        self.skipped_no_agent + self.deferred_busy
    }
}

/// Send `message` to every target in order, one at a time.
///
/// Targets are independent: a skip or failure on one never affects the rest.
/// `on_outcome` sees each target's outcome as soon as it is known.
#[allow(clippy::too_many_arguments)]
pub async fn deliver<M, P, F>(
    mux: &M,
    inspector: &P,
    profile: &AgentProfile,
    session: &str,
    targets: &[Window],
    message: &str,
    options: &DeliveryOptions,
    mut on_outcome: F,
) -> DeliveryReport
where
    M: Multiplexer,
    P: ProcessInspector,
    F: FnMut(&Window, &Outcome),
{
    let mut report = DeliveryReport::default();

    for window in targets {
        let outcome = deliver_one(mux, inspector, profile, session, window, message, options).await;
        tracing::info!(window = window.index, name = %window.name, ?outcome, "delivery outcome");
        on_outcome(window, &outcome);
        report.record(window, outcome);
    }

    report
}

async fn deliver_one<M, P>(
    mux: &M,
    inspector: &P,
    profile: &AgentProfile,
    session: &str,
    window: &Window,
    message: &str,
    options: &DeliveryOptions,
) -> Outcome
where
    M: Multiplexer,
    P: ProcessInspector,
{
    let target = Target::new(session, window.index);

    if options.agents_only && !is_agent_window(window, profile, inspector).await {
        return Outcome::SkippedNoAgent;
    }

    if !options.force && busy::is_busy(mux, &target, &options.retry).await {
        return Outcome::DeferredBusy;
    }

    match mux.send_to_target(&target, message).await {
        Ok(()) => Outcome::Sent,
        Err(err) => Outcome::Failed(format!("{err:#}")),
    }
}
