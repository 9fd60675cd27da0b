//! Xray daemon configuration rendering and persistence.

mod config;

pub use config::{ConfigWriter, Inbound, InboundClient, InboundSettings, XrayDocument};
