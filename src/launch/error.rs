use std::io;
use std::path::PathBuf;

/// Launch failures. Any of them stops the sequence.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("required tool not found on PATH: {0}")]
    MissingTool(String),

    #[error("not found: {}", .0.display())]
    MissingPath(PathBuf),

    #[error("build failed ({})", exit_text(.status))]
    Build { status: Option<i32>, output: String },

    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("launch cancelled")]
    Cancelled,
}

fn exit_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_message_names_status() {
        let err = LaunchError::Build {
            status: Some(2),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "build failed (exit status 2)");
        let err = LaunchError::Build {
            status: None,
            output: String::new(),
        };
        assert_eq!(err.to_string(), "build failed (terminated by signal)");
    }

    #[test]
    fn missing_path_message() {
        let err = LaunchError::MissingPath(PathBuf::from("/opt/viz"));
        assert_eq!(err.to_string(), "not found: /opt/viz");
    }
}
