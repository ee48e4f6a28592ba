//! Progress channel — mpsc bridge from the launch worker to the splash screen.

use std::sync::mpsc;

use super::error::LaunchError;
use super::stage::Progress;

/// Messages from the launch worker.
#[derive(Debug)]
pub enum LaunchEvent {
    Progress(Progress),
    /// Sent once, after the last stage or the first failure.
    Finished(Result<(), LaunchError>),
}

pub type LaunchSender = mpsc::Sender<LaunchEvent>;

/// Receiver half, held by the splash loop.
pub struct LaunchReceiver {
    rx: mpsc::Receiver<LaunchEvent>,
}

impl LaunchReceiver {
    /// Non-blocking poll for the next event.
    pub fn poll(&self) -> Option<LaunchEvent> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<LaunchEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next event. `None` once the worker is gone.
    pub fn recv(&self) -> Option<LaunchEvent> {
        self.rx.recv().ok()
    }
}

pub fn launch_channel() -> (LaunchSender, LaunchReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, LaunchReceiver { rx })
}
