//! Provisioned user registry.

mod memory;
mod service;
mod store;

pub use memory::Registry;
pub use service::{LinkSettings, PanelStatus, UserService};
pub use store::{FileStore, MemoryStore, Store};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provisioned proxy user.
///
/// Records are immutable once created; changing a user means deleting and
/// re-creating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique client identifier, used as the VLESS client id
    pub id: Uuid,

    /// Caller-supplied display label (not guaranteed unique)
    pub remark: String,

    /// When the user was provisioned
    pub created_at: DateTime<Utc>,

    /// Derived connection URI for this user
    pub vless: String,
}

impl UserRecord {
    /// Create a record with a fresh id and a connection URI derived from the
    /// advertised host and port.
    pub fn provision(remark: String, host: &str, port: u16) -> Self {
        let id = Uuid::new_v4();
        let vless = crate::subscribe::vless_link(&id, host, port, &remark);
        Self {
            id,
            remark,
            created_at: Utc::now(),
            vless,
        }
    }
}
