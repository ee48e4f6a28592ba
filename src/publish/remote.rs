//! Remote sink — writes the control file on another machine over a shell
//! session.
//!
//! The snapshot is streamed over the command's stdin; only shell-quoted
//! paths appear in the command line itself.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::PublishError;
use super::ssh::SshShell;
use super::{Connection, Delivery, Sink};

/// Result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A session able to run shell commands on the remote host.
pub trait RemoteShell {
    /// Run `command`, feeding `stdin` to it, and wait for it to exit.
    fn exec(&mut self, command: &str, stdin: &[u8]) -> Result<ExecOutput, PublishError>;

    /// Tear the session down. Errors are ignored.
    fn close(&mut self);
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub control_file: String,
    pub timeout: Duration,
}

/// Sink that delivers snapshots through a [`RemoteShell`].
pub struct RemoteSink {
    target: RemoteTarget,
    session: Option<Box<dyn RemoteShell>>,
}

impl RemoteSink {
    /// A disconnected sink. Deliveries are skipped until a session exists.
    pub fn new(target: RemoteTarget) -> Self {
        Self {
            target,
            session: None,
        }
    }

    pub fn target(&self) -> &RemoteTarget {
        &self.target
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Open an SSH session to `host` as `user`, replacing any existing one.
    pub fn connect(&mut self, host: &str, user: &str, password: &str) -> Result<(), PublishError> {
        if password.is_empty() {
            return Err(PublishError::MissingPassword);
        }
        self.disconnect();
        self.target.host = host.trim().to_string();
        self.target.user = user.trim().to_string();
        let shell = SshShell::connect(
            &self.target.host,
            self.target.port,
            &self.target.user,
            password,
            self.target.timeout,
        )?;
        self.session = Some(Box::new(shell));
        Ok(())
    }

    /// Use an already established session.
    pub fn attach(&mut self, shell: Box<dyn RemoteShell>) {
        self.disconnect();
        self.session = Some(shell);
    }

    pub fn disconnect(&mut self) {
        if let Some(mut shell) = self.session.take() {
            shell.close();
            info!(host = %self.target.host, "remote session closed");
        }
    }

    /// Command that atomically replaces the control file with stdin.
    pub fn write_command(&self) -> Result<String, PublishError> {
        let path = &self.target.control_file;
        let tmp = format!("{path}.tmp");
        Ok(format!(
            "mkdir -p -- {dir} && cat > {tmp} && mv -f -- {tmp} {path}",
            dir = quote(remote_parent(path))?,
            tmp = quote(&tmp)?,
            path = quote(path)?,
        ))
    }

    fn run(&mut self, command: &str, stdin: &[u8]) -> Result<Option<ExecOutput>, PublishError> {
        let Some(shell) = self.session.as_mut() else {
            return Ok(None);
        };
        match shell.exec(command, stdin) {
            Ok(output) => Ok(Some(output)),
            Err(e @ (PublishError::Ssh(_) | PublishError::Io(_))) => {
                // Transport is gone; the user has to reconnect explicitly.
                warn!(host = %self.target.host, error = %e, "remote session lost");
                self.disconnect();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

impl Sink for RemoteSink {
    fn connection(&self) -> Connection {
        if self.is_connected() {
            Connection::Connected {
                host: self.target.host.clone(),
            }
        } else {
            Connection::Disconnected
        }
    }

    fn destination(&self) -> String {
        format!(
            "{}@{}:{}",
            self.target.user, self.target.host, self.target.control_file
        )
    }

    fn deliver(&mut self, text: &str) -> Result<Delivery, PublishError> {
        if !self.is_connected() {
            return Ok(Delivery::Skipped);
        }
        let command = self.write_command()?;
        match self.run(&command, text.as_bytes())? {
            None => Ok(Delivery::Skipped),
            Some(output) if output.status == 0 => Ok(Delivery::Written),
            Some(output) => Err(PublishError::RemoteCommand {
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    fn terminate_consumer(&mut self, pattern: &str) -> Result<(), PublishError> {
        let command = format!("pkill -f -- {}", quote(pattern)?);
        if let Some(output) = self.run(&command, &[])? {
            // pkill exits 1 when nothing matched.
            debug!(pattern, status = output.status, "remote terminate requested");
        }
        Ok(())
    }

    fn as_remote_mut(&mut self) -> Option<&mut RemoteSink> {
        Some(self)
    }
}

impl Drop for RemoteSink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn quote(s: &str) -> Result<String, PublishError> {
    shlex::try_quote(s)
        .map(|q| q.into_owned())
        .map_err(|e| PublishError::Quote(e.to_string()))
}

/// Parent directory of a POSIX path on the remote host.
fn remote_parent(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/",
        Some((dir, _)) => dir,
        None => ".",
    }
}
