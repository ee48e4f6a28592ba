//! Launcher settings — where the visualizer lives and how to build it.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for `lumius launch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Visualizer project directory; the build runs here.
    pub visualizer_dir: PathBuf,
    /// Build program and arguments.
    pub build_command: Vec<String>,
    /// Visualizer executable, relative to `visualizer_dir` unless absolute.
    pub visualizer_binary: PathBuf,
    /// Programs that must be on PATH before anything runs.
    pub required_tools: Vec<String>,
    /// Pause between stages so the splash stays readable.
    pub stage_delay_ms: u64,
    /// Terminal command that opens the control surface in its own window,
    /// e.g. `[x-terminal-emulator, -e]`. Empty runs it in this terminal once
    /// the splash closes.
    pub surface_terminal: Vec<String>,
}

impl LaunchConfig {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }

    /// Whether the control surface runs in this terminal after the splash.
    pub fn surface_inline(&self) -> bool {
        self.surface_terminal.is_empty()
    }

    /// Absolute-or-relative path of the visualizer executable.
    pub fn visualizer_path(&self) -> PathBuf {
        if self.visualizer_binary.is_absolute() {
            self.visualizer_binary.clone()
        } else {
            self.visualizer_dir.join(&self.visualizer_binary)
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            visualizer_dir: PathBuf::from("../openframeworks-visualizer"),
            build_command: vec!["make".to_string()],
            visualizer_binary: PathBuf::from("bin/openframeworks-visualizer"),
            required_tools: vec!["make".to_string()],
            stage_delay_ms: 600,
            surface_terminal: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_binary_joins_visualizer_dir() {
        let config = LaunchConfig::default();
        assert_eq!(
            config.visualizer_path(),
            PathBuf::from("../openframeworks-visualizer/bin/openframeworks-visualizer")
        );
    }

    #[test]
    fn absolute_binary_is_kept() {
        let config = LaunchConfig {
            visualizer_binary: PathBuf::from("/opt/viz/run"),
            ..Default::default()
        };
        assert_eq!(config.visualizer_path(), PathBuf::from("/opt/viz/run"));
    }

    #[test]
    fn surface_inline_by_default() {
        assert!(LaunchConfig::default().surface_inline());
        let config: LaunchConfig =
            serde_yaml::from_str("surface_terminal: [xterm, -e]\n").unwrap();
        assert!(!config.surface_inline());
        assert_eq!(config.build_command, vec!["make"]);
    }
}
