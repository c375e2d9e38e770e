//! Messenger channel: deliver replies through the Graph API Send API (`me/messages`).

use crate::channels::outbound::{OutboundMessage, SendRequest};
use crate::channels::handle::ChannelHandle;
use crate::config::MessengerConfig;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("send api request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("send api error: {0}")]
    Api(String),
}

/// Messenger channel connector: POSTs replies to the Send API with the page access token.
pub struct MessengerChannel {
    id: String,
    send_api_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl MessengerChannel {
    pub fn new(config: &MessengerConfig, access_token: String) -> Self {
        Self {
            id: "messenger".to_string(),
            send_api_url: send_api_url(&config.graph_api_base, &config.api_version),
            access_token,
            client: reqwest::Client::new(),
        }
    }

    /// Full Send API URL this channel posts to (without the token).
    pub fn send_api_url(&self) -> &str {
        &self.send_api_url
    }

    /// POST one message to a recipient via the Send API.
    pub async fn send_message(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
    ) -> Result<(), MessengerError> {
        let body = SendRequest::new(recipient_id, message);
        let res = self
            .client
            .post(&self.send_api_url)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MessengerError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelHandle for MessengerChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_message(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
    ) -> Result<(), String> {
        MessengerChannel::send_message(self, recipient_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}

/// `<base>/<version>/me/messages`, tolerating a trailing slash on the base.
pub fn send_api_url(graph_api_base: &str, api_version: &str) -> String {
    format!(
        "{}/{}/me/messages",
        graph_api_base.trim_end_matches('/'),
        api_version.trim_matches('/')
    )
}
