//! Scripted stand-ins for tmux and the process table.

use anyhow::{anyhow, bail, Result};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{CurrentContext, Multiplexer, ProcessInspector, Target, Window};

#[derive(Debug, Default)]
pub struct FakeProcesses {
    children: HashMap<u32, Vec<String>>,
    fail: bool,
}

impl FakeProcesses {
    pub fn with(mut self, pid: u32, children: Vec<&str>) -> Self {
        self.children
            .insert(pid, children.into_iter().map(String::from).collect());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl ProcessInspector for FakeProcesses {
    async fn children(&self, pid: u32) -> Result<Vec<String>> {
        if self.fail {
            bail!("permission denied");
        }
        Ok(self.children.get(&pid).cloned().unwrap_or_default())
    }
}

/// In-memory tmux server.
///
/// Pending-input probes are answered from a per-window script; once a script
/// runs out the window reports idle. Every probe and send is recorded.
#[derive(Debug, Default)]
pub struct FakeMux {
    pub context: Option<CurrentContext>,
    pub sessions: HashMap<String, Vec<Window>>,
    pub busy: RefCell<HashMap<u32, VecDeque<Result<bool, String>>>>,
    pub send_errors: HashMap<u32, String>,
    pub list_error: Option<String>,
    pub probes: RefCell<Vec<Target>>,
    pub sent: RefCell<Vec<(Target, String)>>,
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inside(mut self, session: &str, window: u32) -> Self {
        self.context = Some(CurrentContext {
            session: session.to_string(),
            window,
            pane_id: "%0".to_string(),
        });
        self
    }

    pub fn session(mut self, name: &str, windows: Vec<Window>) -> Self {
        self.sessions.insert(name.to_string(), windows);
        self
    }

    pub fn busy_script(self, window: u32, script: Vec<bool>) -> Self {
        self.busy
            .borrow_mut()
            .insert(window, script.into_iter().map(Ok).collect());
        self
    }

    pub fn probe_error(self, window: u32, message: &str) -> Self {
        self.busy
            .borrow_mut()
            .insert(window, VecDeque::from([Err(message.to_string())]));
        self
    }

    pub fn send_error(mut self, window: u32, message: &str) -> Self {
        self.send_errors.insert(window, message.to_string());
        self
    }

    pub fn list_error(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn probe_count(&self, window: u32) -> usize {
        self.probes
            .borrow()
            .iter()
            .filter(|t| t.window == window)
            .count()
    }

    pub fn sent(&self) -> Vec<(Target, String)> {
        self.sent.borrow().clone()
    }
}

impl Multiplexer for FakeMux {
    fn is_inside(&self) -> bool {
        self.context.is_some()
    }

    async fn current_context(&self) -> Result<CurrentContext> {
        self.context.clone().ok_or_else(|| anyhow!("not inside tmux"))
    }

    async fn session_exists(&self, session: &str) -> bool {
        self.sessions.contains_key(session)
    }

    async fn list_windows(&self, session: &str) -> Result<Vec<Window>> {
        if let Some(message) = &self.list_error {
            bail!("{message}");
        }
        self.sessions
            .get(session)
            .cloned()
            .ok_or_else(|| anyhow!("can't find session: {session}"))
    }

    async fn has_pending_input(&self, target: &Target) -> Result<bool> {
        self.probes.borrow_mut().push(target.clone());
        let next = self
            .busy
            .borrow_mut()
            .get_mut(&target.window)
            .and_then(|script| script.pop_front());
        match next {
            Some(Ok(busy)) => Ok(busy),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(false),
        }
    }

    async fn send_to_target(&self, target: &Target, text: &str) -> Result<()> {
        if let Some(message) = self.send_errors.get(&target.window) {
            bail!("{message}");
        }
        self.sent.borrow_mut().push((target.clone(), text.to_string()));
        Ok(())
    }
}
