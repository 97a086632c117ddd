use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::Command;

use super::heuristics;
use super::{CurrentContext, Multiplexer, Target, Window};

/// Client for interacting with tmux via CLI
pub struct TmuxClient {
    /// Path to tmux binary
    tmux_path: String,
}

impl TmuxClient {
    pub fn with_binary(path: impl Into<String>) -> Self {
        Self {
            tmux_path: path.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.tmux_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to execute tmux {}", args[0]))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tmux {} failed: {}", args[0], stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Multiplexer for TmuxClient {
    fn is_inside(&self) -> bool {
        std::env::var_os("TMUX").is_some_and(|v| !v.is_empty())
    }

    async fn current_context(&self) -> Result<CurrentContext> {
        if !self.is_inside() {
            anyhow::bail!("not inside tmux");
        }

        // Format: session_name\twindow_index\tpane_id
        let format = "#{session_name}\t#{window_index}\t#{pane_id}";
        let pane = std::env::var("TMUX_PANE").unwrap_or_default();
        let stdout = if pane.is_empty() {
            self.run(&["display-message", "-p", format]).await?
        } else {
            self.run(&["display-message", "-p", "-t", &pane, format]).await?
        };

        parse_context_line(stdout.trim_end_matches('\n'))
            .with_context(|| format!("Unexpected tmux context: {:?}", stdout.trim()))
    }

    async fn session_exists(&self, session: &str) -> bool {
        Command::new(&self.tmux_path)
            .args(["has-session", "-t", &format!("={session}")])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn list_windows(&self, session: &str) -> Result<Vec<Window>> {
        // Format: window_index\tpane_pid\tpane_current_command\twindow_name
        let stdout = self
            .run(&[
                "list-windows",
                "-t",
                &format!("={session}"),
                "-F",
                "#{window_index}\t#{pane_pid}\t#{pane_current_command}\t#{window_name}",
            ])
            .await?;

        let mut windows: Vec<Window> = stdout.lines().filter_map(parse_window_line).collect();
        windows.sort_by_key(|w| w.index);
        Ok(windows)
    }

    async fn has_pending_input(&self, target: &Target) -> Result<bool> {
        let content = self
            .run(&["capture-pane", "-p", "-t", &target.to_string()])
            .await?;
        Ok(heuristics::has_pending_input(&content))
    }

    async fn send_to_target(&self, target: &Target, text: &str) -> Result<()> {
        let args = send_args(target, text);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await?;
        Ok(())
    }
}

/// Arguments for one tmux invocation that types `text` literally, then Enter
fn send_args(target: &Target, text: &str) -> Vec<String> {
    let target = target.to_string();
    let mut args: Vec<String> = ["send-keys", "-t", target.as_str(), "-l", "--"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push(escape_separator(text));
    args.extend(
        [";", "send-keys", "-t", target.as_str(), "Enter"]
            .into_iter()
            .map(String::from),
    );
    args
}

/// tmux reads an argument ending in `;` as a command separator and turns a
/// trailing `\;` into `;`, so a final `;` gets one extra backslash.
fn escape_separator(text: &str) -> String {
    match text.strip_suffix(';') {
        Some(head) => format!("{head}\\;"),
        None => text.to_string(),
    }
}

fn parse_context_line(line: &str) -> Option<CurrentContext> {
    let mut parts = line.splitn(3, '\t');
    let session = parts.next()?.to_string();
    let window = parts.next()?.parse().ok()?;
    let pane_id = parts.next()?.to_string();

    Some(CurrentContext {
        session,
        window,
        pane_id,
    })
}

fn parse_window_line(line: &str) -> Option<Window> {
    let parts: Vec<&str> = line.splitn(4, '\t').collect();
    if parts.len() < 4 {
        return None;
    }

    let window = Window::new(parts[0].parse().ok()?, parts[3], parts[2]);
    match parts[1].parse() {
        Ok(pid) => Some(window.with_pid(pid)),
        Err(_) => Some(window),
    }
}
