//! Scripted replies: map a received message or postback to a canned response.
//!
//! Text is echoed back; an attachment gets a picture-confirmation template whose
//! Yes!/No! buttons come back as postbacks. Anything else gets no reply.

use crate::channels::{Button, Element, OutboundMessage, Postback, ReceivedMessage};

pub const POSTBACK_YES: &str = "yes";
pub const POSTBACK_NO: &str = "no";

const CONFIRM_TITLE: &str = "Is this the right picture?";
const CONFIRM_SUBTITLE: &str = "Tap a button to answer.";
const YES_REPLY: &str = "Thanks";
const NO_REPLY: &str = "Oops, try sending another image.";

/// Reply for a received message. Text takes precedence over attachments.
pub fn reply_for_message(message: &ReceivedMessage) -> Option<OutboundMessage> {
    if let Some(text) = message.text() {
        return Some(echo_reply(text));
    }
    let attachment = message.first_attachment()?;
    Some(confirm_picture_reply(attachment.payload.url.clone()))
}

/// Reply for a postback from one of the confirmation buttons.
pub fn reply_for_postback(postback: &Postback) -> Option<OutboundMessage> {
    match postback.payload.as_str() {
        POSTBACK_YES => Some(OutboundMessage::text(YES_REPLY)),
        POSTBACK_NO => Some(OutboundMessage::text(NO_REPLY)),
        _ => None,
    }
}

fn echo_reply(text: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "You sent the message: \"{}\". Now send me an attachment!",
        text
    ))
}

fn confirm_picture_reply(image_url: Option<String>) -> OutboundMessage {
    OutboundMessage::generic_template(vec![Element {
        title: CONFIRM_TITLE.to_string(),
        subtitle: CONFIRM_SUBTITLE.to_string(),
        image_url,
        buttons: vec![
            Button::postback("Yes!", POSTBACK_YES),
            Button::postback("No!", POSTBACK_NO),
        ],
    }])
}
