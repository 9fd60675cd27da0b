//! Integration tests for the panel API.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::PathBuf;
use std::sync::Arc;
use systemctl_client::{ServiceManager, SystemctlError};
use tempfile::TempDir;
use tower::ServiceExt;
use vless_panel::{
    api::{create_router, AppState},
    registry::{LinkSettings, Registry, Store, UserService},
    xray::ConfigWriter,
};

/// Service manager double with scriptable behaviour.
struct StubManager {
    active: bool,
    fail_restart: bool,
}

#[async_trait]
impl ServiceManager for StubManager {
    async fn is_active(&self) -> Result<bool, SystemctlError> {
        Ok(self.active)
    }

    async fn restart(&self) -> Result<(), SystemctlError> {
        if self.fail_restart {
            return Err(SystemctlError::CommandFailed {
                verb: "restart".into(),
                unit: "xray".into(),
                code: Some(1),
                stderr: "Job for xray.service failed".into(),
            });
        }
        Ok(())
    }
}

/// Create a test app with a memory-only store and a stub service manager.
/// The temp dir holds the daemon config file and must outlive the test.
fn create_test_app(manager: StubManager) -> (axum::Router, TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    let link = LinkSettings {
        host: "example.com".to_string(),
        port: 443,
        protocol: "vless".to_string(),
    };

    let users = UserService::new(
        Registry::new(),
        ConfigWriter::new(config_path.clone()),
        Arc::new(manager),
        Store::memory(),
        link.clone(),
    );

    let app = create_router(AppState::new(users, link));
    (app, dir, config_path)
}

fn healthy_manager() -> StubManager {
    StubManager {
        active: true,
        fail_restart: false,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn post_user(remark: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "remark": remark }).to_string(),
        ))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["user_count"], 0);
}

#[tokio::test]
async fn test_status_reports_count_and_liveness() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    let response = app
        .clone()
        .oneshot(post_user("alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user_count"], 1);
    assert_eq!(json["port"], 443);
    assert_eq!(json["protocol"], "vless");
    assert_eq!(json["xray_online"], true);
}

#[tokio::test]
async fn test_create_user_returns_record_with_link() {
    let (app, _dir, config_path) = create_test_app(healthy_manager());

    let response = app.oneshot(post_user("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["remark"], "alice");
    let id = json["id"].as_str().unwrap();
    assert_eq!(
        json["vless"],
        format!("vless://{}@example.com:443?encryption=none#alice", id)
    );

    // The daemon config was rewritten as part of the same request.
    let config: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&config_path).unwrap()).unwrap();
    assert_eq!(config["inbounds"][0]["settings"]["clients"][0]["id"], id);
    assert_eq!(
        config["inbounds"][0]["settings"]["clients"][0]["email"],
        "alice"
    );
}

#[tokio::test]
async fn test_create_user_rejects_blank_remark() {
    let (app, _dir, config_path) = create_test_app(healthy_manager());

    let response = app.clone().oneshot(post_user("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "EMPTY_REMARK");

    // Rejected before any state change.
    let response = app.oneshot(get("/api/users")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
    assert!(!config_path.exists());
}

#[tokio::test]
async fn test_list_users_preserves_creation_order() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    for remark in ["alice", "bob", "carol"] {
        let response = app.clone().oneshot(post_user(remark)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/users")).await.unwrap();
    let json = body_json(response).await;

    assert_eq!(json["total"], 3);
    let remarks: Vec<&str> = json["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["remark"].as_str().unwrap())
        .collect();
    assert_eq!(remarks, vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn test_delete_user_and_not_found_on_repeat() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    let response = app.clone().oneshot(post_user("alice")).await.unwrap();
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let delete_request = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/user/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["result"], "ok");

    let response = app.clone().oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "USER_NOT_FOUND");

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(body_json(response).await["total"], 0);
}

#[tokio::test]
async fn test_v2ray_subscription_decodes_to_links() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    let alice = body_json(app.clone().oneshot(post_user("alice")).await.unwrap()).await;
    let bob = body_json(app.clone().oneshot(post_user("bob")).await.unwrap()).await;

    let response = app.oneshot(get("/api/subscribe/v2ray")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let decoded =
        String::from_utf8(STANDARD.decode(body_text(response).await).unwrap()).unwrap();
    assert_eq!(
        decoded,
        format!(
            "{}\n{}",
            alice["vless"].as_str().unwrap(),
            bob["vless"].as_str().unwrap()
        )
    );
}

#[tokio::test]
async fn test_clash_subscription_selector_order() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    for remark in ["alice", "bob"] {
        app.clone().oneshot(post_user(remark)).await.unwrap();
    }

    let response = app.oneshot(get("/api/subscribe/clash")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/yaml; charset=utf-8"
    );

    let yaml: serde_json::Value =
        serde_yaml::from_str::<serde_json::Value>(&body_text(response).await).unwrap();
    let selector: Vec<&str> = yaml["proxy-groups"][0]["proxies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(selector, vec!["alice", "bob"]);
    assert_eq!(yaml["proxy-groups"][0]["name"], "auto");
    assert_eq!(yaml["proxies"][0]["type"], "vless");
}

#[tokio::test]
async fn test_restart_failure_surfaces_divergence_error() {
    let (app, _dir, config_path) = create_test_app(StubManager {
        active: false,
        fail_restart: true,
    });

    let response = app.clone().oneshot(post_user("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "SERVICE_RESTART_FAILED");

    // The config write already happened; the registry keeps the user.
    assert!(config_path.exists());
    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(body_json(response).await["total"], 1);
}

#[tokio::test]
async fn test_manual_restart_endpoint() {
    let (app, _dir, _path) = create_test_app(healthy_manager());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/xray/restart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["result"], "restarted");
}
