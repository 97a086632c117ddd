use serde::Serialize;
use std::fmt::Write;

use crate::deliver::{DeliveryReport, Outcome};
use crate::tmux::Window;

/// One dry-run row: the window and whether it looks like an agent right now
#[derive(Debug, Clone, Serialize)]
pub struct PreviewEntry {
    #[serde(flatten)]
    pub window: Window,
    pub agent: bool,
}

#[derive(Debug, Serialize)]
struct Preview<'a> {
    session: &'a str,
    message: &'a str,
    targets: &'a [PreviewEntry],
}

/// Human-readable dry-run listing
pub fn dry_run(session: &str, entries: &[PreviewEntry], message: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Would queue message to {} window(s) in session {:?}:",
        entries.len(),
        session
    );
    for entry in entries {
        let tag = if entry.agent { " [claude]" } else { "" };
        let w = &entry.window;
        let _ = writeln!(out, "  {}: {} ({}){}", w.index, w.name, w.command, tag);
    }
    let _ = write!(out, "\nMessage: {message}");
    out
}

pub fn dry_run_json(session: &str, entries: &[PreviewEntry], message: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Preview {
        session,
        message,
        targets: entries,
    })
}

/// Stderr notice for a target that did not receive the message
pub fn notice(window: &Window, outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Sent => None,
        Outcome::SkippedNoAgent => Some(format!(
            "destination window {:?} has no Claude agent running - start Claude there first, or use --any to send anyway",
            window.name
        )),
        Outcome::DeferredBusy => Some(format!(
            "destination window {:?} is busy (user is typing) - use --force if your message takes priority, or wait a few seconds and retry",
            window.name
        )),
        Outcome::Failed(reason) => Some(format!(
            "Failed to queue message to {}: {}",
            window.name, reason
        )),
    }
}

/// Final one-line tally
pub fn summary(report: &DeliveryReport) -> String {
    if report.failed == 0 && report.skipped() == 0 {
        return format!("Queued to {} window(s)", report.succeeded);
    }

    let mut parts = Vec::new();
    if report.succeeded > 0 {
        parts.push(format!("queued to {}", report.succeeded));
    }
    if report.skipped_no_agent > 0 {
        parts.push(format!("{} skipped (no Claude)", report.skipped_no_agent));
    }
    if report.deferred_busy > 0 {
        parts.push(format!("{} deferred (user typing)", report.deferred_busy));
    }
    if report.failed > 0 {
        parts.push(format!("{} failed", report.failed));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(succeeded: usize, no_agent: usize, busy: usize, failed: usize) -> DeliveryReport {
        DeliveryReport {
            succeeded,
            skipped_no_agent: no_agent,
            deferred_busy: busy,
            failed,
            outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_summary_all_sent() {
        assert_eq!(summary(&report(3, 0, 0, 0)), "Queued to 3 window(s)");
    }

    #[test]
    fn test_summary_mixed() {
        assert_eq!(
            summary(&report(1, 1, 1, 1)),
            "queued to 1, 1 skipped (no Claude), 1 deferred (user typing), 1 failed"
        );
        assert_eq!(summary(&report(0, 0, 2, 0)), "2 deferred (user typing)");
    }

    #[test]
    fn test_dry_run_listing() {
        let entries = vec![
            PreviewEntry {
                window: Window::new(1, "worker", "claude"),
                agent: true,
            },
            PreviewEntry {
                window: Window::new(3, "logs", "tail"),
                agent: false,
            },
        ];
        let text = dry_run("work", &entries, "hello there");
        assert_eq!(
            text,
            "Would queue message to 2 window(s) in session \"work\":\n  1: worker (claude) [claude]\n  3: logs (tail)\n\nMessage: hello there"
        );
    }

    #[test]
    fn test_dry_run_json() {
        let entries = vec![PreviewEntry {
            window: Window::new(1, "worker", "claude").with_pid(42),
            agent: true,
        }];
        let json: serde_json::Value =
            serde_json::from_str(&dry_run_json("work", &entries, "hi").unwrap()).unwrap();
        assert_eq!(json["session"], "work");
        assert_eq!(json["targets"][0]["name"], "worker");
        assert_eq!(json["targets"][0]["pane_pid"], 42);
        assert_eq!(json["targets"][0]["agent"], true);
    }

    #[test]
    fn test_notices() {
        let window = Window::new(2, "build", "claude");
        assert!(notice(&window, &Outcome::Sent).is_none());
        assert!(notice(&window, &Outcome::DeferredBusy)
            .unwrap()
            .starts_with("destination window \"build\" is busy"));
        assert_eq!(
            notice(&window, &Outcome::Failed("boom".to_string())).unwrap(),
            "Failed to queue message to build: boom"
        );
    }
}
