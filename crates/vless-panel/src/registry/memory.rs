//! In-memory ordered registry.

use super::UserRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered set of provisioned users, unique by id.
///
/// Insertion order is contractual: it drives the client order in the xray
/// config and the proxy order in subscriptions, so records live in a `Vec`
/// rather than a map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    users: Vec<UserRecord>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Get a record by id.
    pub fn get(&self, id: &Uuid) -> Option<&UserRecord> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Append a record.
    pub fn push(&mut self, record: UserRecord) {
        self.users.push(record);
    }

    /// Remove the last record. Used to roll back a failed create.
    pub fn pop(&mut self) -> Option<UserRecord> {
        self.users.pop()
    }

    /// Remove a record by id, returning it together with its position so a
    /// failed delete can be rolled back in place.
    pub fn remove(&mut self, id: &Uuid) -> Option<(usize, UserRecord)> {
        let index = self.users.iter().position(|u| &u.id == id)?;
        Some((index, self.users.remove(index)))
    }

    /// Re-insert a record at its original position.
    pub fn insert_at(&mut self, index: usize, record: UserRecord) {
        let index = index.min(self.users.len());
        self.users.insert(index, record);
    }

    /// All records in insertion order.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Number of provisioned users.
    pub fn count(&self) -> usize {
        self.users.len()
    }
}
