//! Client configuration, read once from the environment at startup.
//!
//! | variable                        | default                         |
//! |---------------------------------|---------------------------------|
//! | `YIP_DATA_DIR`                  | `{os data dir}/yip`             |
//! | `YIP_STORAGE_KEY`               | `persist:root`                  |
//! | `YIP_NOTIFICATION_DURATION_MS`  | `3000`                          |

use std::path::PathBuf;

use anyhow::Context;

use yip_notifications::DEFAULT_DURATION_MS;

use crate::persistence::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding the SQLite state database.
    pub data_dir: PathBuf,
    /// Key of the persisted root record.
    pub storage_key: String,
    /// Display time for notifications that do not set their own.
    pub notification_duration_ms: u64,
}

impl ClientConfig {
    /// Build from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (the environment, in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup("YIP_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        let storage_key = lookup("YIP_STORAGE_KEY")
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        let notification_duration_ms = match lookup("YIP_NOTIFICATION_DURATION_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid YIP_NOTIFICATION_DURATION_MS: {raw:?}"))?,
            None => DEFAULT_DURATION_MS,
        };

        Ok(Self {
            data_dir,
            storage_key,
            notification_duration_ms,
        })
    }

    /// `{data_dir}/state.db`
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("state.db")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().unwrap_or_else(|_| PathBuf::from(".yip")),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            notification_duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// `{app_data_dir}/yip`
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory (data_dir or ~/.local/share)")?;

    Ok(base.join("yip"))
}
