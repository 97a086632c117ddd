use clap::Parser;

use crate::busy::RetryPolicy;
use crate::deliver::DeliveryOptions;
use crate::resolve::FilterContext;

const LONG_ABOUT: &str = "\
gasadd (ga) queues messages to Claude agents in tmux windows without interrupting.

WHEN TO USE ga vs gn:
  ga  - Non-urgent: \"when you're done, run tests\" (queues without interrupting)
  gn  - Urgent: \"stop now\" (sends Escape to interrupt current work)

BEHAVIOR:
  - Only targets windows running Claude (auto-detected via process name/version)
  - Excludes the caller's own window (prevents self-messaging)
  - Sends text + Enter, letting Claude's queue handle timing
  - Does NOT send Escape (preserves ongoing work)
  - Detects pending input: if user is typing, retries then skips (use --force to override)

CLAUDE DETECTION:
  Identifies Claude by the pane's current command:
  - \"claude\" or \"node\" (direct process)
  - Version pattern like \"2.1.25\"
  - Child processes of shells

USE CASES FOR AGENT COORDINATION:
  - Notify workers when a dependency is ready
  - Broadcast status updates across a swarm
  - Chain tasks: \"when done with X, start Y\"
  - Request status without disrupting flow";

const AFTER_HELP: &str = "\
EXAMPLES:
  ga \"tests passed, you can merge\"       # Queue to all Claude windows
  ga -w worker-1 \"dependency ready\"      # Target specific window
  ga -w worker-1 -w worker-2 \"sync\"      # Multiple windows
  ga -p \"worker-*\" \"checkpoint\"          # Glob pattern matching
  ga -s swarm \"broadcast message\"        # Different tmux session
  ga --any \"hello\"                       # Include non-Claude windows
  ga -a \"note to self\"                   # Include own window
  ga -n \"test\"                           # Dry-run: show targets
  ga -f -w worker-1 \"urgent\"             # Force send even if user is typing

RELATED TOOLS:
  gn (gasnudge) - Interrupt agents urgently (sends Escape + Enter)
  gp (gaspeek)  - Read output from agent windows
  gm (gasmail)  - Persistent messaging via beads database";

#[derive(Parser, Debug)]
#[command(name = "ga", version)]
#[command(about = "Queue messages to Claude agents in tmux windows without interrupting")]
#[command(long_about = LONG_ABOUT, after_long_help = AFTER_HELP)]
pub struct Args {
    /// Message to queue; words are joined with single spaces
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Target specific window(s) by name or index (repeatable)
    #[arg(short, long = "window", value_name = "NAME")]
    pub windows: Vec<String>,

    /// Target session (default: current)
    #[arg(short, long)]
    pub session: Option<String>,

    /// Filter windows by name pattern (glob-style)
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Include non-Claude windows (default: Claude only)
    #[arg(long)]
    pub any: bool,

    /// Include current window (default: exclude self)
    #[arg(short, long)]
    pub all: bool,

    /// Show what would receive the message
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Send even if target has pending input
    #[arg(short, long)]
    pub force: bool,

    /// Print the dry-run listing or delivery report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn message(&self) -> String {
        self.message.join(" ")
    }

    pub fn filters(&self) -> FilterContext {
        FilterContext {
            self_window: None,
            names: self.windows.clone(),
            pattern: self.pattern.clone().filter(|p| !p.is_empty()),
            include_non_agent: self.any,
            include_self: self.all,
        }
    }

    pub fn delivery(&self, retry: RetryPolicy) -> DeliveryOptions {
        DeliveryOptions {
            agents_only: !self.any,
            force: self.force,
            retry,
        }
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_long_help_sections() {
        let help = Args::command().render_long_help().to_string();
        for section in [
            "WHEN TO USE ga vs gn:",
            "BEHAVIOR:",
            "CLAUDE DETECTION:",
            "USE CASES FOR AGENT COORDINATION:",
            "EXAMPLES:",
            "RELATED TOOLS:",
        ] {
            assert!(help.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ga", "when", "done,", "run", "tests"]).unwrap();
        assert_eq!(args.message(), "when done, run tests");
        assert_eq!(args.filters(), FilterContext::default());
        assert_eq!(args.session(), None);

        let options = args.delivery(RetryPolicy::default());
        assert!(options.agents_only);
        assert!(!options.force);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "ga", "-w", "worker-1", "-w", "2", "-s", "swarm", "-p", "worker-*", "--any", "-a",
            "-n", "-f", "sync",
        ])
        .unwrap();

        let filters = args.filters();
        assert_eq!(filters.names, vec!["worker-1", "2"]);
        assert_eq!(filters.pattern.as_deref(), Some("worker-*"));
        assert!(filters.include_non_agent);
        assert!(filters.include_self);
        assert_eq!(args.session(), Some("swarm"));
        assert!(args.dry_run);

        let options = args.delivery(RetryPolicy::default());
        assert!(!options.agents_only);
        assert!(options.force);
    }

    #[test]
    fn test_message_required() {
        assert!(Args::try_parse_from(["ga"]).is_err());
        assert!(Args::try_parse_from(["ga", "-f"]).is_err());
    }
}
