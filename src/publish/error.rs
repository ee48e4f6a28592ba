//! Error types for snapshot delivery.

use std::io;

/// A failed attempt to deliver a snapshot or manage the remote session.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not persist control file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("connect to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no address found for {0}")]
    Resolve(String),

    #[error("password required")]
    MissingPassword,

    #[error("authentication rejected for {user}@{host}")]
    Auth { user: String, host: String },

    #[error("ssh: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("remote command exited with {status}: {stderr}")]
    RemoteCommand { status: i32, stderr: String },

    #[error("path cannot be quoted for the remote shell: {0}")]
    Quote(String),
}

impl PublishError {
    /// Short text for the status panel.
    pub fn short(&self) -> String {
        let full = self.to_string();
        if full.chars().count() > 40 {
            let mut t: String = full.chars().take(39).collect();
            t.push('\u{2026}');
            t
        } else {
            full
        }
    }
}

/// A control file that could not be read back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("control file is empty")]
    Empty,

    #[error("missing key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}
