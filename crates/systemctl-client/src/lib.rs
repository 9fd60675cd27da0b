//! Systemd service manager client.

mod client;
mod error;

pub use client::{ServiceManager, SystemctlClient};
pub use error::SystemctlError;
