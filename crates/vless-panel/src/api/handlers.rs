//! HTTP request handlers.

use super::types::{
    CreateUserRequest, DeleteResponse, HealthResponse, RestartResponse, UsersResponse,
};
use super::AppState;
use crate::error::PanelError;
use crate::registry::{PanelStatus, UserRecord};
use crate::subscribe;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let user_count = state.users.list_users().await.len();

    Json(HealthResponse {
        status: "ok".to_string(),
        user_count,
    })
}

/// Aggregate panel status.
pub async fn get_status(State(state): State<AppState>) -> Json<PanelStatus> {
    Json(state.users.status().await)
}

/// Provision a new user.
///
/// The response only carries the record once the daemon config was written
/// and the daemon restarted; a failed synchronization surfaces as an error,
/// never as a half-created user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserRecord>, PanelError> {
    info!(remark = %request.remark, "User creation requested");
    let record = state.users.create_user(&request.remark).await?;
    Ok(Json(record))
}

/// List all provisioned users in creation order.
pub async fn list_users(State(state): State<AppState>) -> Json<UsersResponse> {
    let users = state.users.list_users().await;
    let total = users.len();
    Json(UsersResponse { users, total })
}

/// Delete a user by id.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, PanelError> {
    info!(user_id = %id, "User deletion requested");
    state.users.delete_user(id).await?;
    Ok(Json(DeleteResponse {
        result: "ok".to_string(),
    }))
}

/// Clash subscription: YAML document with one proxy per user and a selector
/// group in creation order.
pub async fn subscribe_clash(State(state): State<AppState>) -> Result<impl IntoResponse, PanelError> {
    let users = state.users.list_users().await;
    let yaml = subscribe::clash_yaml(&users, &state.link.host, state.link.port)?;
    Ok(([(header::CONTENT_TYPE, "text/yaml; charset=utf-8")], yaml))
}

/// V2ray subscription: base64 over the newline-joined connection URIs.
pub async fn subscribe_v2ray(State(state): State<AppState>) -> impl IntoResponse {
    let users = state.users.list_users().await;
    let body = subscribe::v2ray_subscription(&users);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// Manually restart the daemon.
pub async fn restart_daemon(
    State(state): State<AppState>,
) -> Result<Json<RestartResponse>, PanelError> {
    info!("Manual daemon restart requested");
    state.users.restart_daemon().await?;
    Ok(Json(RestartResponse {
        result: "restarted".to_string(),
    }))
}
