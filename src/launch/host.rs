//! Side effects of the launch sequence.
//!
//! [`LaunchHost`] is what the sequencer drives; [`SystemHost`] runs the real
//! tools and processes.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use super::error::LaunchError;
use crate::config::LaunchConfig;

/// Lines of build output kept for the failure report.
const BUILD_OUTPUT_TAIL: usize = 20;

pub trait LaunchHost: Send {
    fn check_dependencies(&mut self) -> Result<(), LaunchError>;
    fn build(&mut self) -> Result<(), LaunchError>;
    fn spawn_control_surface(&mut self) -> Result<(), LaunchError>;
    fn spawn_visualizer(&mut self) -> Result<(), LaunchError>;
}

/// Runs the build and spawns processes on this machine.
pub struct SystemHost {
    config: LaunchConfig,
    /// Forwarded to the spawned control surface.
    config_path: Option<PathBuf>,
}

impl SystemHost {
    pub fn new(config: LaunchConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    fn visualizer_dir(&self) -> Result<PathBuf, LaunchError> {
        let dir = &self.config.visualizer_dir;
        if !dir.is_dir() {
            return Err(LaunchError::MissingPath(dir.clone()));
        }
        Ok(dir.canonicalize()?)
    }

    fn panel_args(&self) -> Vec<String> {
        let mut args = vec!["panel".to_string()];
        if let Some(path) = &self.config_path {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }
        args
    }
}

impl LaunchHost for SystemHost {
    fn check_dependencies(&mut self) -> Result<(), LaunchError> {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        for tool in &self.config.required_tools {
            match find_in_path(tool, &path_var) {
                Some(found) => info!(tool = %tool, path = %found.display(), "dependency found"),
                None => return Err(LaunchError::MissingTool(tool.clone())),
            }
        }
        self.visualizer_dir()?;
        Ok(())
    }

    fn build(&mut self) -> Result<(), LaunchError> {
        let Some((program, args)) = self.config.build_command.split_first() else {
            info!("no build command configured");
            return Ok(());
        };
        let dir = self.visualizer_dir()?;
        info!(program = %program, dir = %dir.display(), "building visualizer");
        let output = Command::new(program)
            .args(args)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let output_tail = tail_lines(&text, BUILD_OUTPUT_TAIL);
        warn!(status = ?output.status.code(), "build failed");
        Err(LaunchError::Build {
            status: output.status.code(),
            output: output_tail,
        })
    }

    fn spawn_control_surface(&mut self) -> Result<(), LaunchError> {
        let exe = std::env::current_exe()?;
        let Some((terminal, terminal_args)) = self.config.surface_terminal.split_first() else {
            info!(exe = %exe.display(), "control surface starts in this terminal");
            return Ok(());
        };
        let child = Command::new(terminal)
            .args(terminal_args)
            .arg(&exe)
            .args(self.panel_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: terminal.clone(),
                source,
            })?;
        info!(pid = child.id(), "control surface started");
        Ok(())
    }

    fn spawn_visualizer(&mut self) -> Result<(), LaunchError> {
        let dir = self.visualizer_dir()?;
        let binary = dir.join(&self.config.visualizer_binary);
        if !binary.is_file() {
            return Err(LaunchError::MissingPath(binary));
        }
        let child = Command::new(&binary)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: binary.display().to_string(),
                source,
            })?;
        info!(pid = child.id(), binary = %binary.display(), "visualizer started");
        Ok(())
    }
}

/// Locate an executable named `tool` in a PATH-style list of directories.
pub fn find_in_path(tool: &str, path_var: &OsStr) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }
    std::env::split_paths(path_var)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
