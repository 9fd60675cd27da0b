//! Registry mutations and the config/daemon synchronization transaction.

use super::{Registry, Store, UserRecord};
use crate::error::PanelError;
use crate::xray::{ConfigWriter, XrayDocument};
use serde::Serialize;
use std::sync::Arc;
use systemctl_client::ServiceManager;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Advertised connection settings, embedded in links and subscriptions.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

/// Aggregate status view.
#[derive(Debug, Serialize)]
pub struct PanelStatus {
    pub user_count: usize,
    pub port: u16,
    pub protocol: String,
    pub xray_online: bool,
}

/// Which phase of the synchronization transaction failed.
enum SyncFailure {
    /// Config write failed; the on-disk file is untouched.
    Write(PanelError),
    /// Restart failed; the new config is already on disk but the running
    /// daemon has not picked it up.
    Restart(PanelError),
}

/// Owns the registry and keeps it, the daemon config file, and the daemon
/// process state in step.
///
/// Every mutation runs under the registry write lock together with the
/// synchronization transaction it triggers, so at most one
/// mutation-plus-sync sequence is in flight at a time and readers only ever
/// observe fully committed registries.
pub struct UserService {
    registry: RwLock<Registry>,
    writer: ConfigWriter,
    manager: Arc<dyn ServiceManager>,
    store: Store,
    link: LinkSettings,
}

impl UserService {
    /// Create a service over an initial registry (typically loaded from the
    /// configured store at startup).
    pub fn new(
        registry: Registry,
        writer: ConfigWriter,
        manager: Arc<dyn ServiceManager>,
        store: Store,
        link: LinkSettings,
    ) -> Self {
        Self {
            registry: RwLock::new(registry),
            writer,
            manager,
            store,
            link,
        }
    }

    /// Provision a new user and synchronize the daemon.
    ///
    /// The record is only returned once both the config write and the
    /// restart succeeded; a creation that failed to synchronize is never
    /// reported as success. On a config-write failure the record is rolled
    /// back; on a restart failure it is kept, because the config file is
    /// already committed.
    pub async fn create_user(&self, remark: &str) -> Result<UserRecord, PanelError> {
        let remark = remark.trim();
        if remark.is_empty() {
            return Err(PanelError::EmptyRemark);
        }

        let record = UserRecord::provision(remark.to_string(), &self.link.host, self.link.port);

        let mut registry = self.registry.write().await;
        registry.push(record.clone());

        match self.sync(&registry).await {
            Ok(()) => {}
            Err(SyncFailure::Write(e)) => {
                registry.pop();
                warn!(remark, error = %e, "Config write failed, user creation rolled back");
                return Err(e);
            }
            Err(SyncFailure::Restart(e)) => {
                warn!(
                    remark,
                    error = %e,
                    "Restart failed after config write; on-disk config now diverges from the running daemon"
                );
                return Err(e);
            }
        }

        self.snapshot(&registry).await;
        info!(user_id = %record.id, remark, "User created");
        Ok(record)
    }

    /// Delete a user and synchronize the daemon.
    ///
    /// Returns `UserNotFound` for an unknown id. Rollback mirrors
    /// `create_user`: a config-write failure re-inserts the record at its
    /// original position, a restart failure keeps the deletion.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), PanelError> {
        let mut registry = self.registry.write().await;
        let (index, record) = registry.remove(&id).ok_or(PanelError::UserNotFound(id))?;

        match self.sync(&registry).await {
            Ok(()) => {}
            Err(SyncFailure::Write(e)) => {
                registry.insert_at(index, record);
                warn!(user_id = %id, error = %e, "Config write failed, user deletion rolled back");
                return Err(e);
            }
            Err(SyncFailure::Restart(e)) => {
                warn!(
                    user_id = %id,
                    error = %e,
                    "Restart failed after config write; on-disk config now diverges from the running daemon"
                );
                return Err(e);
            }
        }

        self.snapshot(&registry).await;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Consistent snapshot of all users in insertion order.
    pub async fn list_users(&self) -> Vec<UserRecord> {
        self.registry.read().await.users().to_vec()
    }

    /// Aggregate status: user count, advertised listener settings, and
    /// daemon liveness. A failed liveness query degrades to `false` here;
    /// this is the only place a service-manager error is swallowed.
    pub async fn status(&self) -> PanelStatus {
        let user_count = self.registry.read().await.count();
        let xray_online = self.manager.is_active().await.unwrap_or(false);

        PanelStatus {
            user_count,
            port: self.link.port,
            protocol: self.link.protocol.clone(),
            xray_online,
        }
    }

    /// Restart the daemon without touching the registry or config file.
    pub async fn restart_daemon(&self) -> Result<(), PanelError> {
        // Takes the write lock so a manual restart cannot race a
        // mutation-triggered one on the shared daemon.
        let _registry = self.registry.write().await;
        self.manager.restart().await?;
        info!("Daemon restarted");
        Ok(())
    }

    /// Two-phase synchronization: render and persist the full config, then
    /// restart the daemon. Binary outcome; no degraded success.
    async fn sync(&self, registry: &Registry) -> Result<(), SyncFailure> {
        let document =
            XrayDocument::render(registry.users(), self.link.port, &self.link.protocol);

        self.writer
            .persist(&document)
            .await
            .map_err(SyncFailure::Write)?;

        self.manager
            .restart()
            .await
            .map_err(|e| SyncFailure::Restart(e.into()))?;

        Ok(())
    }

    /// Persist a registry snapshot after a committed mutation. A snapshot
    /// failure does not undo the committed sync; it is reported in the log
    /// and the in-memory registry stays authoritative.
    async fn snapshot(&self, registry: &Registry) {
        if let Err(e) = self.store.save(registry).await {
            warn!(error = %e, "Failed to persist registry snapshot");
        }
    }
}
