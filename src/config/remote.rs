//! Remote surface settings — SSH host and the control file on that host.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::params::ParamLimits;
use crate::publish::RemoteTarget;

/// Settings for `lumius remote`. The password is never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub control_file: String,
    /// Bound on connect and on every remote command.
    pub timeout_ms: u64,
    pub limits: ParamLimits,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn target(&self) -> RemoteTarget {
        RemoteTarget {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            control_file: self.control_file.clone(),
            timeout: self.timeout(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.17".to_string(),
            port: 22,
            user: "lumius".to_string(),
            control_file: "/home/lumius/lumius_project/openframeworks-visualizer/bin/data/control.txt"
                .to_string(),
            timeout_ms: 10_000,
            limits: ParamLimits::remote(),
        }
    }
}
