//! VLESS panel - xray user provisioning and subscription service.
//!
//! The panel owns the authoritative user registry and keeps two external
//! representations in step with it on every mutation: the daemon's on-disk
//! JSON config (fully rewritten) and the running daemon itself (restarted
//! through systemd). Subscription endpoints project the same registry into
//! client-consumable formats.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod subscribe;
pub mod xray;

pub use config::Config;
pub use error::PanelError;
pub use registry::{LinkSettings, Registry, Store, UserRecord, UserService};
