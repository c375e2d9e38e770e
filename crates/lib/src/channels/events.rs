//! Inbound webhook payload: the JSON body Messenger POSTs to `/webhook`.

use serde::Deserialize;

/// Value of `object` for events coming from a Page subscription.
pub const PAGE_OBJECT: &str = "page";

/// Top-level webhook body. Batched deliveries carry several entries.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    pub entry: Vec<Entry>,
}

impl WebhookPayload {
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

impl Entry {
    /// The platform only ever puts one event in `messaging`; later items are ignored.
    pub fn first_event(&self) -> Option<&MessagingEvent> {
        self.messaging.first()
    }
}

/// One messaging event: a message or a postback from a user (PSID).
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    #[serde(default)]
    pub recipient: Option<Participant>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<ReceivedMessage>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceivedMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

impl ReceivedMessage {
    /// No fields at all (`"message": {}`); dispatch treats it as no message.
    pub fn is_empty(&self) -> bool {
        self.mid.is_none() && self.text.is_none() && self.attachments.is_none()
    }

    /// Text, when present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// First attachment, when the list is present and non-empty.
    pub fn first_attachment(&self) -> Option<&Attachment> {
        self.attachments.as_ref().and_then(|a| a.first())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub payload: AttachmentPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default)]
    pub url: Option<String>,
}

/// Button click on a postback button (e.g. the Yes!/No! buttons of the picture template).
#[derive(Debug, Clone, Deserialize)]
pub struct Postback {
    #[serde(default)]
    pub title: Option<String>,
    pub payload: String,
}
