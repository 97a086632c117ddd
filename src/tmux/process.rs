use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use tokio::process::Command;

use super::ProcessInspector;

/// Process inspector backed by a single `ps` snapshot per lookup
pub struct PsInspector {
    /// Path to ps binary
    ps_path: String,
}

impl PsInspector {
    pub fn new() -> Self {
        Self {
            ps_path: "ps".to_string(),
        }
    }
}

impl Default for PsInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInspector for PsInspector {
    async fn children(&self, pid: u32) -> Result<Vec<String>> {
        let output = Command::new(&self.ps_path)
            .args(["-A", "-o", "pid=", "-o", "ppid=", "-o", "comm="])
            .output()
            .await
            .context("Failed to execute ps")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ps failed: {}", stderr.trim());
        }

        let table = ProcessTable::parse(&String::from_utf8_lossy(&output.stdout));
        Ok(table.descendants(pid))
    }
}

/// Parent/child view of a `pid ppid comm` listing
#[derive(Debug, Default)]
struct ProcessTable {
    children: HashMap<u32, Vec<(u32, String)>>,
}

impl ProcessTable {
    fn parse(listing: &str) -> Self {
        let mut children: HashMap<u32, Vec<(u32, String)>> = HashMap::new();

        for line in listing.lines() {
            let mut fields = line.split_whitespace();
            let (Some(pid), Some(ppid)) = (fields.next(), fields.next()) else {
                continue;
            };
            let (Ok(pid), Ok(ppid)) = (pid.parse::<u32>(), ppid.parse::<u32>()) else {
                continue;
            };
            // comm may itself contain spaces
            let comm = fields.collect::<Vec<_>>().join(" ");
            if comm.is_empty() {
                continue;
            }
            children.entry(ppid).or_default().push((pid, comm));
        }

        Self { children }
    }

    /// Command names of all descendants, nearest first
    fn descendants(&self, root: u32) -> Vec<String> {
        let mut names = Vec::new();
        let mut queue = VecDeque::from([root]);
        let mut seen = vec![root];

        while let Some(pid) = queue.pop_front() {
            for (child, comm) in self.children.get(&pid).into_iter().flatten() {
                if seen.contains(child) {
                    continue;
                }
                seen.push(*child);
                names.push(comm.clone());
                queue.push_back(*child);
            }
        }

        names
    }
}
