//! Xray configuration document.
//!
//! The document is never edited in place: it is always re-rendered in full
//! from the current registry snapshot and written with full-replace
//! semantics, so the file on disk is a pure function of the user set.

use crate::error::PanelError;
use crate::registry::UserRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Top-level xray configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XrayDocument {
    pub inbounds: Vec<Inbound>,
}

/// Inbound listener entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inbound {
    pub port: u16,
    pub protocol: String,
    pub settings: InboundSettings,
}

/// Inbound settings block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundSettings {
    pub clients: Vec<InboundClient>,
}

/// One client entry per provisioned user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundClient {
    pub id: Uuid,
    pub email: String,
}

impl XrayDocument {
    /// Render the document for the given user set.
    ///
    /// Deterministic: the same users in the same order produce an identical
    /// document, with one client entry per user in registry order.
    pub fn render(users: &[UserRecord], port: u16, protocol: &str) -> Self {
        let clients = users
            .iter()
            .map(|u| InboundClient {
                id: u.id,
                email: u.remark.clone(),
            })
            .collect();

        Self {
            inbounds: vec![Inbound {
                port,
                protocol: protocol.to_string(),
                settings: InboundSettings { clients },
            }],
        }
    }
}

/// Writes rendered documents to the fixed daemon config path.
pub struct ConfigWriter {
    path: PathBuf,
}

impl ConfigWriter {
    /// Create a writer targeting the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Target path of the daemon config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the document, fully replacing any previous content.
    ///
    /// The write goes through a sibling temp file followed by a rename, so a
    /// crash mid-write never leaves a truncated config for the daemon to
    /// choke on. The previous content is not retained.
    pub async fn persist(&self, document: &XrayDocument) -> Result<(), PanelError> {
        let data = serde_json::to_vec_pretty(document)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &data)
            .await
            .map_err(|e| PanelError::ConfigWrite(format!("{}: {}", temp_path.display(), e)))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| PanelError::ConfigWrite(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = ?self.path, bytes = data.len(), "Wrote xray config");
        Ok(())
    }
}
