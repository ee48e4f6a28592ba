//! Launch stages and the progress texts shown for each.

use std::fmt;

use super::error::LaunchError;

/// One step of the startup sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CheckDependencies,
    InitAudio,
    LoadShaders,
    Build,
    EngineReady,
    SpawnControlSurface,
    SpawnVisualizer,
    Active,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::CheckDependencies,
        Stage::InitAudio,
        Stage::LoadShaders,
        Stage::Build,
        Stage::EngineReady,
        Stage::SpawnControlSurface,
        Stage::SpawnVisualizer,
        Stage::Active,
    ];

    pub fn percent(self) -> u16 {
        match self {
            Stage::CheckDependencies => 10,
            Stage::InitAudio => 25,
            Stage::LoadShaders => 40,
            Stage::Build => 55,
            Stage::EngineReady => 75,
            Stage::SpawnControlSurface => 85,
            Stage::SpawnVisualizer => 95,
            Stage::Active => 100,
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            Stage::CheckDependencies => "CHECKING DEPENDENCIES...",
            Stage::InitAudio => "INITIALIZING AUDIO MATRIX...",
            Stage::LoadShaders => "LOADING NEURAL SHADERS...",
            Stage::Build => "COMPILING VISUAL ENGINE...",
            Stage::EngineReady => "VISUAL ENGINE READY...",
            Stage::SpawnControlSurface => "LAUNCHING CONTROL MATRIX...",
            Stage::SpawnVisualizer => "LAUNCHING VISUAL ENGINE...",
            Stage::Active => "LUMIUS SYSTEM ACTIVE",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Stage::CheckDependencies => "Verifying system requirements",
            Stage::InitAudio => "Setting up audio processing",
            Stage::LoadShaders => "Compiling visual effects",
            Stage::Build => "Building OpenFrameworks application",
            Stage::EngineReady => "OpenFrameworks compiled successfully",
            Stage::SpawnControlSurface => "Starting control panel",
            Stage::SpawnVisualizer => "Starting OpenFrameworks visualizer",
            Stage::Active => "All systems operational",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What the splash screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u16,
    pub status: String,
    pub detail: String,
    pub failed: bool,
}

impl Progress {
    /// Before the first stage reports.
    pub fn initial() -> Self {
        Self {
            percent: 0,
            status: "INITIALIZING SYSTEM...".to_string(),
            detail: String::new(),
            failed: false,
        }
    }

    pub fn at(stage: Stage) -> Self {
        Self {
            percent: stage.percent(),
            status: stage.status().to_string(),
            detail: stage.detail().to_string(),
            failed: false,
        }
    }

    /// Progress shown when `stage` fails with `error`.
    pub fn failure(stage: Stage, error: &LaunchError) -> Self {
        match error {
            LaunchError::Build { .. } => Self {
                percent: stage.percent(),
                status: "COMPILATION ERROR".to_string(),
                detail: "Check console for details".to_string(),
                failed: true,
            },
            LaunchError::Cancelled => Self {
                percent: stage.percent(),
                status: "LAUNCH CANCELLED".to_string(),
                detail: String::new(),
                failed: true,
            },
            other => Self {
                percent: 0,
                status: "SYSTEM ERROR".to_string(),
                detail: format!("Error: {other}"),
                failed: true,
            },
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::initial()
    }
}
