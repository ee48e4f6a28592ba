//! Launch sequence tests — the real host against a scratch visualizer
//! directory, driven through the sequencer and its progress channel.

use std::time::Duration;

use lumius::config::LaunchConfig;
use lumius::launch::{
    launch_channel, LaunchError, LaunchEvent, Progress, Sequencer, Stage, SystemHost,
};

fn config(dir: &tempfile::TempDir, build: &[&str]) -> LaunchConfig {
    LaunchConfig {
        visualizer_dir: dir.path().to_path_buf(),
        build_command: build.iter().map(|s| s.to_string()).collect(),
        visualizer_binary: "bin/visualizer".into(),
        required_tools: vec!["sh".to_string()],
        stage_delay_ms: 0,
        surface_terminal: Vec::new(),
    }
}

/// Run the whole sequence and collect every event.
fn run(config: LaunchConfig) -> (Vec<Progress>, Result<(), LaunchError>) {
    let (tx, rx) = launch_channel();
    let sequencer = Sequencer::new(SystemHost::new(config, None), Duration::ZERO);
    let result = sequencer.run(&tx);
    drop(tx);
    let mut progress = Vec::new();
    let mut finished = 0;
    while let Some(event) = rx.recv() {
        match event {
            LaunchEvent::Progress(p) => progress.push(p),
            LaunchEvent::Finished(_) => finished += 1,
        }
    }
    assert_eq!(finished, 1);
    (progress, result)
}

#[cfg(unix)]
fn install_visualizer(dir: &tempfile::TempDir) {
    use std::os::unix::fs::PermissionsExt;
    let bin = dir.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let exe = bin.join("visualizer");
    std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn successful_launch_reports_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    install_visualizer(&dir);
    let (progress, result) = run(config(&dir, &["sh", "-c", "true"]));
    assert!(result.is_ok());
    let percents: Vec<u16> = progress.iter().map(|p| p.percent).collect();
    let expected: Vec<u16> = Stage::ALL.iter().map(|s| s.percent()).collect();
    assert_eq!(percents, expected);
    assert_eq!(progress.last().unwrap().status, "LUMIUS SYSTEM ACTIVE");
}

#[test]
fn failing_build_stops_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let (progress, result) = run(config(
        &dir,
        &["sh", "-c", "echo 'ofApp.cpp:12: error'; exit 2"],
    ));
    match result {
        Err(LaunchError::Build { status, output }) => {
            assert_eq!(status, Some(2));
            assert!(output.contains("ofApp.cpp:12: error"));
        }
        other => panic!("unexpected {other:?}"),
    }
    let last = progress.last().unwrap();
    assert_eq!(last.status, "COMPILATION ERROR");
    assert_eq!(last.detail, "Check console for details");
    assert_eq!(last.percent, 55);
    assert!(progress.iter().all(|p| p.percent <= 55));
}

#[test]
fn missing_tool_is_a_system_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(&dir, &["sh", "-c", "true"]);
    cfg.required_tools = vec!["lumius-no-such-tool".to_string()];
    let (progress, result) = run(cfg);
    assert!(matches!(result, Err(LaunchError::MissingTool(ref t)) if t == "lumius-no-such-tool"));
    let last = progress.last().unwrap();
    assert_eq!(last.status, "SYSTEM ERROR");
    assert_eq!(last.percent, 0);
    assert!(last.detail.starts_with("Error: "));
}

#[test]
fn missing_visualizer_dir_fails_dependency_check() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(&dir, &["sh", "-c", "true"]);
    cfg.visualizer_dir = dir.path().join("absent");
    let (_, result) = run(cfg);
    assert!(matches!(result, Err(LaunchError::MissingPath(_))));
}

#[test]
fn missing_binary_fails_after_build() {
    let dir = tempfile::tempdir().unwrap();
    let (progress, result) = run(config(&dir, &["sh", "-c", "true"]));
    assert!(matches!(result, Err(LaunchError::MissingPath(ref p)) if p.ends_with("bin/visualizer")));
    assert!(progress
        .iter()
        .any(|p| p.percent == Stage::SpawnVisualizer.percent() && !p.failed));
    assert!(progress.last().unwrap().failed);
}

#[test]
fn cancelled_launch_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, rx) = launch_channel();
    let sequencer = Sequencer::new(
        SystemHost::new(config(&dir, &["sh", "-c", "true"]), None),
        Duration::from_secs(5),
    );
    let handle = sequencer.spawn(tx);
    // Wait for the first stage, then cancel during the pause.
    assert!(matches!(rx.recv(), Some(LaunchEvent::Progress(_))));
    handle.cancel();
    let mut outcome = None;
    while let Some(event) = rx.recv() {
        if let LaunchEvent::Finished(result) = event {
            outcome = Some(result);
        }
    }
    handle.join();
    assert!(matches!(outcome, Some(Err(LaunchError::Cancelled))));
}
