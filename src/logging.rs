//! Diagnostic logging via `tracing`.
//!
//! The control surface owns the terminal, so interactive modes log to
//! ~/.lumius/lumius.log. Headless modes log to stderr. The filter comes from
//! `LUMIUS_LOG` and defaults to `info`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "LUMIUS_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// ~/.lumius/lumius.log
    pub fn default_file() -> Self {
        LogTarget::File(crate::config::config_dir().join("lumius.log"))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(target: &LogTarget) -> io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);
    let result = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lumius.log");
        open_log(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn default_file_lives_in_config_dir() {
        match LogTarget::default_file() {
            LogTarget::File(path) => assert!(path.ends_with(".lumius/lumius.log")),
            LogTarget::Stderr => panic!("expected a file target"),
        }
    }

    #[test]
    fn init_twice_is_harmless() {
        init(&LogTarget::Stderr).unwrap();
        init(&LogTarget::Stderr).unwrap();
    }
}
