//! Webhook wire types (handshake query, acknowledgement body).

use serde::{Deserialize, Serialize};

/// `hub.mode` value sent by the platform when subscribing a webhook.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Query of the verification request: `?hub.mode=&hub.verify_token=&hub.challenge=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
}

/// Acknowledgement returned for handled event deliveries: `{ "status": 200 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: u16,
}

impl StatusBody {
    pub fn ok() -> Self {
        Self { status: 200 }
    }
}
