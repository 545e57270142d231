//! Session configuration
//!
//! Loaded from TOML at task startup:
//!
//! ```toml
//! [session]
//! name = "stp"
//! metrics_interval_secs = 10
//!
//! [transport]
//! mode = "unix"
//! path = "/run/nemo/stp.sock"
//! ```

use crate::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub session: SessionSettings,
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Task name used in logs and metrics
    pub name: String,
    /// Seconds between metric log lines
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    10
}

/// Which transport adapter the session connects through
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TransportConfig {
    /// Unix domain socket, for tasks on the same control processor
    Unix { path: String },
    /// TCP, for tasks on other slots
    Tcp { address: String },
}

impl SessionConfig {
    /// Defaults for a local task talking over a unix socket
    pub fn unix_defaults(name: impl Into<String>, socket_path: impl Into<String>) -> Self {
        Self {
            session: SessionSettings {
                name: name.into(),
                metrics_interval_secs: default_metrics_interval(),
            },
            transport: TransportConfig::Unix {
                path: socket_path.into(),
            },
        }
    }

    /// Defaults for a task on another slot reached over tcp
    pub fn tcp_defaults(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            session: SessionSettings {
                name: name.into(),
                metrics_interval_secs: default_metrics_interval(),
            },
            transport: TransportConfig::Tcp {
                address: address.into(),
            },
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DispatchError::configuration("failed to read config file", e))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| DispatchError::configuration("failed to parse config", e))
    }
}
