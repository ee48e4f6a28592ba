//! Local sink — writes the control file on this machine.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::PublishError;
use super::{Connection, Delivery, Sink};

/// Writes snapshots to a file, replacing its whole contents each time.
#[derive(Debug, Clone)]
pub struct LocalSink {
    path: PathBuf,
}

impl LocalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl Sink for LocalSink {
    fn connection(&self) -> Connection {
        Connection::Local
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn deliver(&mut self, text: &str) -> Result<Delivery, PublishError> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;
        // Write beside the target and rename over it so readers never see a
        // half-written file.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)?;
        Ok(Delivery::Written)
    }

    fn terminate_consumer(&mut self, pattern: &str) -> Result<(), PublishError> {
        let output = Command::new("pgrep")
            .arg("-f")
            .arg("--")
            .arg(pattern)
            .stderr(Stdio::null())
            .output()?;
        let own = std::process::id();
        let pids: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.trim().parse::<u32>().ok())
            .filter(|&pid| pid != own)
            .map(|pid| pid.to_string())
            .collect();
        if pids.is_empty() {
            debug!(pattern, "no consumer process to terminate");
            return Ok(());
        }
        debug!(pattern, ?pids, "terminating consumer");
        Command::new("kill")
            .arg("-TERM")
            .args(&pids)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(())
    }
}
