//! Systemctl client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SystemctlError {
    #[error("Failed to invoke systemctl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("systemctl {verb} {unit} exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("code {}", c)))]
    CommandFailed {
        verb: String,
        unit: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl SystemctlError {
    /// Exit code of the failed command, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SystemctlError::CommandFailed { code, .. } => *code,
            SystemctlError::Spawn(_) => None,
        }
    }

    /// Captured stderr of the failed command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            SystemctlError::CommandFailed { stderr, .. } => Some(stderr),
            SystemctlError::Spawn(_) => None,
        }
    }
}
