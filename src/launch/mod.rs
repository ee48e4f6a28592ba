//! Launcher — dependency check, build and process spawning behind a splash.

pub mod error;
pub mod host;
pub mod progress;
pub mod sequencer;
pub mod stage;

pub use error::LaunchError;
pub use host::{find_in_path, LaunchHost, SystemHost};
pub use progress::{launch_channel, LaunchEvent, LaunchReceiver, LaunchSender};
pub use sequencer::{LaunchHandle, Sequencer};
pub use stage::{Progress, Stage};
