//! Optional settings file.
//!
//! Read from `$GASADD_CONFIG`, or `gasadd/config.toml` under the platform
//! config directory. A missing file means defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::busy::RetryPolicy;
use crate::error::QueueError;
use crate::tmux::AgentProfile;

pub const CONFIG_ENV: &str = "GASADD_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// tmux binary
    pub tmux: String,
    pub agent: AgentProfile,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmux: "tmux".to_string(),
            agent: AgentProfile::default(),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    tmux: Option<String>,
    #[serde(default)]
    agent: AgentSection,
    #[serde(default)]
    busy: BusySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentSection {
    names: Option<Vec<String>>,
    hosts: Option<Vec<String>>,
    shells: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BusySection {
    attempts: Option<u32>,
    delay_ms: Option<u64>,
}

/// Default config location
pub fn config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join("gasadd").join("config.toml")),
    }
}

/// Load the config file, falling back to defaults when there is none
pub fn load() -> Result<Config, QueueError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config, QueueError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(Config::default());
        }
        Err(err) => return Err(invalid(path, err)),
    };

    let config = parse(&text).map_err(|err| invalid(path, err))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse(text: &str) -> Result<Config, toml::de::Error> {
    let file: FileConfig = toml::from_str(text)?;
    let mut config = Config::default();

    if let Some(tmux) = file.tmux {
        config.tmux = tmux;
    }
    if let Some(names) = file.agent.names {
        config.agent.names = names;
    }
    if let Some(hosts) = file.agent.hosts {
        config.agent.hosts = hosts;
    }
    if let Some(shells) = file.agent.shells {
        config.agent.shells = shells;
    }
    if let Some(attempts) = file.busy.attempts {
        config.retry.max_attempts = attempts.max(1);
    }
    if let Some(delay) = file.busy.delay_ms {
        config.retry.delay = Duration::from_millis(delay);
    }

    Ok(config)
}

fn invalid(path: &Path, err: impl std::fmt::Display) -> QueueError {
    QueueError::Config {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
