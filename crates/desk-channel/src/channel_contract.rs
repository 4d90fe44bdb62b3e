//! Inbound event contract for the Telegram transport.
//!
//! Ingress and routing code only consumes events that passed the validation
//! here, so downstream handlers never re-check identity or content presence.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ChannelEventKind` values.
pub enum ChannelEventKind {
    Command,
    Text,
    Media,
    Contact,
}

impl ChannelEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Text => "text",
            Self::Media => "media",
            Self::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ChannelMediaKind` values.
pub enum ChannelMediaKind {
    Document,
    Photo,
    Video,
    Audio,
}

impl ChannelMediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A media payload carried by an inbound message, with the size the provider
/// declared (0 when unknown).
pub struct ChannelMedia {
    pub kind: ChannelMediaKind,
    pub file_id: String,
    pub file_name: String,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A shared contact card from the chat.
pub struct ChannelContact {
    pub phone_number: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Normalized inbound chat event consumed by the dialogue router.
pub struct ChannelInboundEvent {
    pub kind: ChannelEventKind,
    pub update_id: u64,
    pub chat_id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media: Option<ChannelMedia>,
    #[serde(default)]
    pub contact: Option<ChannelContact>,
}

pub fn validate_channel_inbound_event(event: &ChannelInboundEvent) -> Result<()> {
    if event.chat_id.trim().is_empty() {
        bail!("inbound event has empty chat_id");
    }
    if event.user_id.trim().is_empty() {
        bail!("inbound event has empty user_id");
    }
    if event.timestamp_ms == 0 {
        bail!("inbound event has zero timestamp_ms");
    }
    match event.kind {
        ChannelEventKind::Command | ChannelEventKind::Text => {
            if event.text.trim().is_empty() {
                bail!("{} event must carry non-empty text", event.kind.as_str());
            }
        }
        ChannelEventKind::Media => {
            let Some(media) = event.media.as_ref() else {
                bail!("media event must carry a media payload");
            };
            if media.file_id.trim().is_empty() {
                bail!("media payload has empty file_id");
            }
            if media.file_name.trim().is_empty() {
                bail!("media payload has empty file_name");
            }
        }
        ChannelEventKind::Contact => {
            let Some(contact) = event.contact.as_ref() else {
                bail!("contact event must carry a contact payload");
            };
            if contact.phone_number.trim().is_empty() {
                bail!("contact payload has empty phone_number");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(text: &str) -> ChannelInboundEvent {
        ChannelInboundEvent {
            kind: ChannelEventKind::Text,
            update_id: 1,
            chat_id: "chat-1".to_string(),
            user_id: "user-1".to_string(),
            username: String::new(),
            timestamp_ms: 1,
            text: text.to_string(),
            media: None,
            contact: None,
        }
    }

    #[test]
    fn unit_validate_accepts_plain_text_event() {
        validate_channel_inbound_event(&text_event("hello")).expect("valid event");
    }

    #[test]
    fn unit_validate_rejects_empty_identifiers() {
        let mut event = text_event("hello");
        event.user_id = " ".to_string();
        let error = validate_channel_inbound_event(&event).expect_err("empty user id");
        assert!(error.to_string().contains("empty user_id"));
    }

    #[test]
    fn unit_validate_rejects_media_event_without_payload() {
        let mut event = text_event("");
        event.kind = ChannelEventKind::Media;
        let error = validate_channel_inbound_event(&event).expect_err("missing media");
        assert!(error.to_string().contains("media payload"));
    }

    #[test]
    fn regression_validate_rejects_contact_without_phone() {
        let mut event = text_event("");
        event.kind = ChannelEventKind::Contact;
        event.contact = Some(ChannelContact {
            phone_number: "  ".to_string(),
            user_id: String::new(),
            full_name: String::new(),
        });
        let error = validate_channel_inbound_event(&event).expect_err("empty phone");
        assert!(error.to_string().contains("empty phone_number"));
    }
}
