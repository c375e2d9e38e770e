//! Send API request body: `{ "recipient": { "id" }, "message": { ... } }`.

use serde::Serialize;

/// Full body POSTed to `me/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest<'a> {
    pub recipient: Recipient<'a>,
    pub message: &'a OutboundMessage,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient<'a> {
    pub id: &'a str,
}

impl<'a> SendRequest<'a> {
    pub fn new(recipient_id: &'a str, message: &'a OutboundMessage) -> Self {
        Self {
            recipient: Recipient { id: recipient_id },
            message,
        }
    }
}

/// Reply message: plain text or a template attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Text { text: String },
    Attachment { attachment: TemplateAttachment },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    /// Generic template with the given elements.
    pub fn generic_template(elements: Vec<Element>) -> Self {
        OutboundMessage::Attachment {
            attachment: TemplateAttachment {
                kind: "template".to_string(),
                payload: TemplatePayload {
                    template_type: "generic".to_string(),
                    elements,
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: TemplatePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePayload {
    pub template_type: String,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn postback(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: "postback".to_string(),
            title: title.into(),
            payload: payload.into(),
        }
    }
}
