//! Launch sequencer — runs the stages in order on a worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info};

use super::error::LaunchError;
use super::host::LaunchHost;
use super::progress::{LaunchEvent, LaunchSender};
use super::stage::{Progress, Stage};

/// Granularity of cancel checks while pausing between stages.
const CANCEL_POLL: Duration = Duration::from_millis(25);

pub struct Sequencer<H: LaunchHost> {
    host: H,
    stage_delay: Duration,
    cancel: Arc<AtomicBool>,
}

impl<H: LaunchHost + 'static> Sequencer<H> {
    pub fn new(host: H, stage_delay: Duration) -> Self {
        Self {
            host,
            stage_delay,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the sequence before its next stage.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run every stage on the calling thread, reporting through `tx`.
    ///
    /// Ends with exactly one `Finished` event carrying the same result.
    pub fn run(mut self, tx: &LaunchSender) -> Result<(), LaunchError> {
        let result = self.run_stages(tx);
        let report = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(clone_for_report(e)),
        };
        let _ = tx.send(LaunchEvent::Finished(report));
        result
    }

    /// Run on a worker thread.
    pub fn spawn(self, tx: LaunchSender) -> LaunchHandle {
        let cancel = self.cancel.clone();
        let thread = thread::spawn(move || {
            let _ = self.run(&tx);
        });
        LaunchHandle {
            cancel,
            thread: Some(thread),
        }
    }

    fn run_stages(&mut self, tx: &LaunchSender) -> Result<(), LaunchError> {
        for stage in Stage::ALL {
            if self.cancel.load(Ordering::Relaxed) {
                info!(stage = %stage, "launch cancelled");
                let _ = tx.send(LaunchEvent::Progress(Progress::failure(
                    stage,
                    &LaunchError::Cancelled,
                )));
                return Err(LaunchError::Cancelled);
            }
            info!(stage = %stage, percent = stage.percent(), "{}", stage.status());
            let _ = tx.send(LaunchEvent::Progress(Progress::at(stage)));
            if let Err(e) = self.execute(stage) {
                error!(stage = %stage, error = %e, "launch stage failed");
                let _ = tx.send(LaunchEvent::Progress(Progress::failure(stage, &e)));
                return Err(e);
            }
            if stage != Stage::Active {
                self.pause();
            }
        }
        Ok(())
    }

    fn execute(&mut self, stage: Stage) -> Result<(), LaunchError> {
        match stage {
            Stage::CheckDependencies => self.host.check_dependencies(),
            Stage::Build => self.host.build(),
            Stage::SpawnControlSurface => self.host.spawn_control_surface(),
            Stage::SpawnVisualizer => self.host.spawn_visualizer(),
            Stage::InitAudio | Stage::LoadShaders | Stage::EngineReady | Stage::Active => Ok(()),
        }
    }

    fn pause(&self) {
        let deadline = Instant::now() + self.stage_delay;
        while !self.cancel.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(CANCEL_POLL.min(deadline - now));
        }
    }
}

/// Owned copy of an error for the `Finished` event.
fn clone_for_report(e: &LaunchError) -> LaunchError {
    match e {
        LaunchError::MissingTool(t) => LaunchError::MissingTool(t.clone()),
        LaunchError::MissingPath(p) => LaunchError::MissingPath(p.clone()),
        LaunchError::Build { status, output } => LaunchError::Build {
            status: *status,
            output: output.clone(),
        },
        LaunchError::Spawn { program, source } => LaunchError::Spawn {
            program: program.clone(),
            source: std::io::Error::new(source.kind(), source.to_string()),
        },
        LaunchError::Io(source) => {
            LaunchError::Io(std::io::Error::new(source.kind(), source.to_string()))
        }
        LaunchError::Cancelled => LaunchError::Cancelled,
    }
}

/// Handle to a running launch worker.
pub struct LaunchHandle {
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LaunchHandle {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the worker to exit.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
