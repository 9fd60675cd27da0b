//! Async wrapper around the systemd service manager.

use crate::error::SystemctlError;
use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, warn};

/// Capability interface for the OS service manager.
///
/// The panel only needs two operations from whatever supervises the proxy
/// daemon: an activity query and a restart. Keeping this behind a trait lets
/// the synchronization logic run against alternative supervisors (or a test
/// double) without change.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Whether the managed unit is currently active.
    async fn is_active(&self) -> Result<bool, SystemctlError>;

    /// Restart the managed unit, blocking until the service manager reports
    /// completion. Non-zero exit is surfaced verbatim as an error.
    async fn restart(&self) -> Result<(), SystemctlError>;
}

/// `systemctl`-backed service manager for a single unit.
#[derive(Debug, Clone)]
pub struct SystemctlClient {
    unit: String,
}

impl SystemctlClient {
    /// Create a client managing the given systemd unit.
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    /// Name of the managed unit.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    async fn run(&self, verb: &str) -> Result<Output, SystemctlError> {
        debug!(verb, unit = %self.unit, "Invoking systemctl");
        let output = Command::new("systemctl")
            .arg(verb)
            .arg(&self.unit)
            .output()
            .await?;
        Ok(output)
    }
}

#[async_trait]
impl ServiceManager for SystemctlClient {
    async fn is_active(&self) -> Result<bool, SystemctlError> {
        // `systemctl is-active` exits non-zero for any inactive state, so the
        // exit status alone cannot distinguish "stopped" from "failed". Only
        // the stdout comparison matters here.
        let output = self.run("is-active").await?;
        let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(unit = %self.unit, %state, "Unit state queried");
        Ok(state == "active")
    }

    async fn restart(&self) -> Result<(), SystemctlError> {
        let output = self.run("restart").await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(unit = %self.unit, code = ?output.status.code(), %stderr, "Restart failed");
            return Err(SystemctlError::CommandFailed {
                verb: "restart".to_string(),
                unit: self.unit.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        debug!(unit = %self.unit, "Restart completed");
        Ok(())
    }
}
