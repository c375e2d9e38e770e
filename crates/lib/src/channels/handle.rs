//! Channel handle: the seam between the webhook dispatcher and an outbound connector.

use crate::channels::outbound::OutboundMessage;
use async_trait::async_trait;

/// Handle to a channel connector that can deliver replies.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel id (e.g. "messenger").
    fn id(&self) -> &str;
    /// Send a reply to a recipient (Messenger PSID).
    async fn send_message(&self, recipient_id: &str, message: &OutboundMessage)
        -> Result<(), String>;
}
