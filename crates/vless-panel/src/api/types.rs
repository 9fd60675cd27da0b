//! API request and response types.

use crate::registry::UserRecord;
use serde::{Deserialize, Serialize};

/// Request to provision a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display label for the user; must be non-empty after trimming
    pub remark: String,
}

/// List of provisioned users.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
    pub total: usize,
}

/// Response after deleting a user.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub result: String,
}

/// Response after a manual daemon restart.
#[derive(Debug, Serialize)]
pub struct RestartResponse {
    pub result: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub user_count: usize,
}
