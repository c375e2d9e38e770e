//! Communication channels (Messenger).
//!
//! Webhook payload types, reply message types, and the Send API connector.
//! The gateway talks to a channel only through [`ChannelHandle`].

mod events;
mod handle;
mod messenger;
mod outbound;

pub use events::{
    Attachment, AttachmentPayload, Entry, MessagingEvent, Participant, Postback, ReceivedMessage,
    WebhookPayload, PAGE_OBJECT,
};
pub use handle::ChannelHandle;
pub use messenger::{MessengerChannel, MessengerError};
pub use outbound::{
    Button, Element, OutboundMessage, Recipient, SendRequest, TemplateAttachment,
    TemplatePayload,
};
