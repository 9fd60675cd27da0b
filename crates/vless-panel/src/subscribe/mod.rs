//! Subscription encoders.
//!
//! Three pure projections of the current user list: a per-user connection
//! URI, a merged base64 bundle for v2ray clients, and a clash YAML document.
//! No state, no I/O.

use crate::registry::UserRecord;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use urlencoding::encode;
use uuid::Uuid;

/// Build the VLESS connection URI for a single user.
///
/// The remark rides in the URI fragment and is percent-encoded, so labels
/// containing reserved characters (or non-ASCII) stay well-formed.
pub fn vless_link(id: &Uuid, host: &str, port: u16, remark: &str) -> String {
    format!(
        "vless://{}@{}:{}?encryption=none#{}",
        id,
        host,
        port,
        encode(remark)
    )
}

/// Build the merged v2ray subscription.
///
/// Per-user links are joined with `"\n"` first (no trailing newline), then
/// the UTF-8 bytes of the joined string are base64-encoded.
pub fn v2ray_subscription(users: &[UserRecord]) -> String {
    let links: Vec<&str> = users.iter().map(|u| u.vless.as_str()).collect();
    STANDARD.encode(links.join("\n").as_bytes())
}

/// Clash proxy descriptor, one per user.
#[derive(Debug, Serialize)]
pub struct ClashProxy {
    pub name: String,
    #[serde(rename = "type")]
    pub proxy_type: String,
    pub server: String,
    pub port: u16,
    pub uuid: Uuid,
    pub encryption: String,
    pub network: String,
}

/// Clash selector group listing all remarks in registry order.
#[derive(Debug, Serialize)]
pub struct ClashProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub proxies: Vec<String>,
}

/// Top-level clash subscription document.
#[derive(Debug, Serialize)]
pub struct ClashSubscription {
    pub proxies: Vec<ClashProxy>,
    #[serde(rename = "proxy-groups")]
    pub proxy_groups: Vec<ClashProxyGroup>,
}

/// Build the clash subscription document for the given user set.
pub fn clash_subscription(users: &[UserRecord], host: &str, port: u16) -> ClashSubscription {
    let proxies = users
        .iter()
        .map(|u| ClashProxy {
            name: u.remark.clone(),
            proxy_type: "vless".to_string(),
            server: host.to_string(),
            port,
            uuid: u.id,
            encryption: "none".to_string(),
            network: "tcp".to_string(),
        })
        .collect();

    let proxy_groups = vec![ClashProxyGroup {
        name: "auto".to_string(),
        group_type: "select".to_string(),
        proxies: users.iter().map(|u| u.remark.clone()).collect(),
    }];

    ClashSubscription {
        proxies,
        proxy_groups,
    }
}

/// Serialize the clash subscription to YAML text.
///
/// `serde_yaml` keeps Unicode unescaped and quotes remarks that collide with
/// YAML syntax.
pub fn clash_yaml(users: &[UserRecord], host: &str, port: u16) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&clash_subscription(users, host, port))
}
