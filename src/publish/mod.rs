//! State publisher — pushes parameter snapshots to the visualizer.
//!
//! A [`Publisher`] renders the [`ParameterSet`] into control-file text and
//! hands it to a [`Sink`]: a local file or a remote shell session.

pub mod error;
pub mod local;
pub mod remote;
pub mod snapshot;
pub mod ssh;

pub use error::{PublishError, SnapshotError};
pub use local::LocalSink;
pub use remote::{ExecOutput, RemoteShell, RemoteSink, RemoteTarget};
pub use snapshot::{shutdown_text, ControlMessage, Snapshot, SHUTDOWN_SENTINEL};
pub use ssh::SshShell;

use tracing::{debug, info, warn};

use crate::params::{MusicCommand, ParameterSet};

/// Outcome of a successful delivery call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The snapshot reached the destination.
    Written,
    /// Nothing was sent because the sink has no session.
    Skipped,
}

/// Whether a sink can currently deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Local filesystem, always available.
    Local,
    Connected { host: String },
    Disconnected,
}

impl Connection {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Connection::Disconnected)
    }

    pub fn label(&self) -> &str {
        match self {
            Connection::Local => "LOCAL",
            Connection::Connected { .. } => "CONNECTED",
            Connection::Disconnected => "DISCONNECTED",
        }
    }
}

/// Destination for control-file text.
pub trait Sink {
    fn connection(&self) -> Connection;

    /// Human-readable destination for logs and the status panel.
    fn destination(&self) -> String;

    /// Replace the destination's contents with `text`.
    fn deliver(&mut self, text: &str) -> Result<Delivery, PublishError>;

    /// Ask processes matching `pattern` to exit. Callers ignore failures.
    fn terminate_consumer(&mut self, pattern: &str) -> Result<(), PublishError>;

    /// Session controls, when the sink has them.
    fn as_remote_mut(&mut self) -> Option<&mut RemoteSink> {
        None
    }
}

/// Renders snapshots and delivers them to one sink.
pub struct Publisher {
    sink: Box<dyn Sink>,
    last_written: Option<String>,
}

impl Publisher {
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self {
            sink,
            last_written: None,
        }
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut dyn Sink {
        self.sink.as_mut()
    }

    pub fn connection(&self) -> Connection {
        self.sink.connection()
    }

    /// Text of the last snapshot that reached the sink.
    pub fn last_written(&self) -> Option<&str> {
        self.last_written.as_deref()
    }

    /// Publish the full parameter set, with an optional one-shot music command.
    pub fn publish(
        &mut self,
        params: &ParameterSet,
        music: Option<MusicCommand>,
    ) -> Result<Delivery, PublishError> {
        let text = Snapshot::capture(params, music).render();
        match self.sink.deliver(&text) {
            Ok(Delivery::Written) => {
                debug!(destination = %self.sink.destination(), "snapshot published");
                self.last_written = Some(text);
                Ok(Delivery::Written)
            }
            Ok(Delivery::Skipped) => {
                debug!("publish skipped, sink not connected");
                Ok(Delivery::Skipped)
            }
            Err(e) => {
                warn!(destination = %self.sink.destination(), error = %e, "publish failed");
                Err(e)
            }
        }
    }

    /// Best-effort final act: stop the consumer, then write the shutdown sentinel.
    ///
    /// Every failure is logged and swallowed.
    pub fn shutdown(&mut self, kill_patterns: &[String]) {
        for pattern in kill_patterns {
            if let Err(e) = self.sink.terminate_consumer(pattern) {
                debug!(pattern = %pattern, error = %e, "terminate request failed");
            }
        }
        match self.sink.deliver(&shutdown_text()) {
            Ok(Delivery::Written) => {
                info!(destination = %self.sink.destination(), "shutdown sentinel written");
                self.last_written = Some(shutdown_text());
            }
            Ok(Delivery::Skipped) => debug!("shutdown sentinel skipped, sink not connected"),
            Err(e) => debug!(error = %e, "shutdown sentinel failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Effect;

    struct FailingSink {
        terminate_calls: usize,
        deliveries: Vec<String>,
        fail_deliver: bool,
    }

    impl Sink for FailingSink {
        fn connection(&self) -> Connection {
            Connection::Local
        }

        fn destination(&self) -> String {
            "memory".to_string()
        }

        fn deliver(&mut self, text: &str) -> Result<Delivery, PublishError> {
            if self.fail_deliver {
                return Err(PublishError::Io(std::io::Error::other("disk full")));
            }
            self.deliveries.push(text.to_string());
            Ok(Delivery::Written)
        }

        fn terminate_consumer(&mut self, _pattern: &str) -> Result<(), PublishError> {
            self.terminate_calls += 1;
            Err(PublishError::Io(std::io::Error::other("no pkill")))
        }
    }

    #[test]
    fn publish_records_last_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("control.txt");
        let mut publisher = Publisher::new(Box::new(LocalSink::new(&path)));
        let mut params = ParameterSet::default();
        params.set_effect(Effect::BurstMatrix);
        assert_eq!(publisher.publish(&params, None).unwrap(), Delivery::Written);
        assert!(publisher.last_written().unwrap().starts_with("effect:3\n"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            publisher.last_written().unwrap()
        );
    }

    #[test]
    fn shutdown_ignores_terminate_failures() {
        let sink = FailingSink {
            terminate_calls: 0,
            deliveries: Vec::new(),
            fail_deliver: false,
        };
        let mut publisher = Publisher::new(Box::new(sink));
        publisher.shutdown(&["visualizer".to_string(), "other".to_string()]);
        assert_eq!(publisher.last_written(), Some("system:shutdown\n"));
    }

    #[test]
    fn shutdown_survives_delivery_failure() {
        let sink = FailingSink {
            terminate_calls: 0,
            deliveries: Vec::new(),
            fail_deliver: true,
        };
        let mut publisher = Publisher::new(Box::new(sink));
        publisher.shutdown(&[]);
        assert_eq!(publisher.last_written(), None);
    }

    #[test]
    fn failed_publish_keeps_previous_text() {
        let sink = FailingSink {
            terminate_calls: 0,
            deliveries: Vec::new(),
            fail_deliver: true,
        };
        let mut publisher = Publisher::new(Box::new(sink));
        assert!(publisher.publish(&ParameterSet::default(), None).is_err());
        assert_eq!(publisher.last_written(), None);
    }

    #[test]
    fn remote_without_session_publishes_nothing() {
        let target = RemoteTarget {
            host: "192.0.2.1".to_string(),
            port: 22,
            user: "lumius".to_string(),
            control_file: "/tmp/control.txt".to_string(),
            timeout: std::time::Duration::from_millis(100),
        };
        let mut publisher = Publisher::new(Box::new(RemoteSink::new(target)));
        let result = publisher.publish(&ParameterSet::default(), Some(MusicCommand::Play));
        assert_eq!(result.unwrap(), Delivery::Skipped);
        assert_eq!(publisher.last_written(), None);
        assert_eq!(publisher.connection(), Connection::Disconnected);
        publisher.shutdown(&["openframeworks-visualizer".to_string()]);
        assert_eq!(publisher.last_written(), None);
    }

    #[test]
    fn connection_labels() {
        assert_eq!(Connection::Local.label(), "LOCAL");
        assert!(!Connection::Disconnected.is_ready());
        assert!(Connection::Connected {
            host: "h".to_string()
        }
        .is_ready());
    }
}
