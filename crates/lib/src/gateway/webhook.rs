//! Subscription handshake and event dispatch, independent of the HTTP layer.

use crate::channels::{ChannelHandle, MessagingEvent, OutboundMessage, WebhookPayload};
use crate::gateway::protocol::{VerifyParams, SUBSCRIBE_MODE};
use crate::reply;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("webhook verification refused")]
    Forbidden,
}

/// Check the handshake. On success returns the challenge to echo back verbatim.
///
/// Mode and token must both be present, mode must be `subscribe`, and the token
/// must equal `expected`. With no expected token configured every request is refused.
pub fn verify_subscription(
    params: &VerifyParams,
    expected: Option<&str>,
) -> Result<String, VerifyError> {
    let (Some(mode), Some(token)) = (params.mode.as_deref(), params.verify_token.as_deref()) else {
        return Err(VerifyError::Forbidden);
    };
    let Some(expected) = expected else {
        return Err(VerifyError::Forbidden);
    };
    if mode != SUBSCRIBE_MODE || token != expected {
        return Err(VerifyError::Forbidden);
    }
    Ok(params.challenge.clone().unwrap_or_default())
}

/// Dispatch every entry of a page payload: first messaging event only, message
/// before postback, one Send API call per reply. Returns the number of replies sent
/// (attempted; send failures are logged, not counted separately).
pub async fn dispatch_payload(payload: &WebhookPayload, channel: &dyn ChannelHandle) -> usize {
    let mut sent = 0;
    for entry in &payload.entry {
        let Some(event) = entry.first_event() else {
            log::warn!(
                "webhook: entry {} has no messaging event, skipping",
                entry.id.as_deref().unwrap_or("?")
            );
            continue;
        };
        log::debug!("webhook event: {:?}", event);
        let Some(reply) = reply_for_event(event) else {
            log::debug!(
                "webhook: no reply for event from {}, ignoring",
                event.sender.id
            );
            continue;
        };
        call_send_api(channel, &event.sender.id, &reply).await;
        sent += 1;
    }
    sent
}

fn reply_for_event(event: &MessagingEvent) -> Option<OutboundMessage> {
    if let Some(message) = event.message.as_ref().filter(|m| !m.is_empty()) {
        reply::reply_for_message(message)
    } else if let Some(ref postback) = event.postback {
        reply::reply_for_postback(postback)
    } else {
        None
    }
}

/// Fire-and-forget send: failures are logged only.
async fn call_send_api(channel: &dyn ChannelHandle, recipient_id: &str, message: &OutboundMessage) {
    match channel.send_message(recipient_id, message).await {
        Ok(()) => log::info!("{}: message sent to {}", channel.id(), recipient_id),
        Err(e) => log::warn!("{}: unable to send message: {}", channel.id(), e),
    }
}
