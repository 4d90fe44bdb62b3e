//! Update-payload normalization for the Telegram transport.
//!
//! Raw Bot API updates are converted into canonical [`ChannelInboundEvent`]s
//! before routing. Parse failures carry reason codes so the connector can
//! report malformed ingress without dropping the whole poll cycle.

use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

use crate::channel_contract::{
    validate_channel_inbound_event, ChannelContact, ChannelEventKind, ChannelInboundEvent,
    ChannelMedia, ChannelMediaKind,
};
use desk_core::{format_unix_time_compact, normalize_optional_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `ChannelIngressReasonCode` values.
pub enum ChannelIngressReasonCode {
    InvalidJson,
    MissingField,
    InvalidFieldType,
    InvalidTimestamp,
    EmptyContent,
    UnsupportedUpdate,
    InvalidNormalizedEvent,
}

impl ChannelIngressReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::MissingField => "missing_field",
            Self::InvalidFieldType => "invalid_field_type",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::EmptyContent => "empty_content",
            Self::UnsupportedUpdate => "unsupported_update",
            Self::InvalidNormalizedEvent => "invalid_normalized_event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parse failure raised while normalizing a raw update.
pub struct ChannelIngressParseError {
    pub code: ChannelIngressReasonCode,
    pub message: String,
}

impl Display for ChannelIngressParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ChannelIngressParseError {}

fn parse_error(
    code: ChannelIngressReasonCode,
    message: impl Into<String>,
) -> ChannelIngressParseError {
    ChannelIngressParseError {
        code,
        message: message.into(),
    }
}

pub fn parse_channel_update(raw: &str) -> Result<ChannelInboundEvent, ChannelIngressParseError> {
    let payload = serde_json::from_str::<Value>(raw).map_err(|error| {
        parse_error(ChannelIngressReasonCode::InvalidJson, error.to_string())
    })?;
    parse_channel_update_value(&payload)
}

pub fn parse_channel_update_value(
    update: &Value,
) -> Result<ChannelInboundEvent, ChannelIngressParseError> {
    let payload = as_object(update, "update must be a JSON object")?;
    let update_id = payload
        .get("update_id")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let message = payload
        .get("message")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            parse_error(
                ChannelIngressReasonCode::UnsupportedUpdate,
                "update does not carry a message payload",
            )
        })?;
    let chat = object_field(message, "chat", "message.chat")?;
    let from = object_field(message, "from", "message.from")?;

    let timestamp_secs = message.get("date").and_then(Value::as_u64).ok_or_else(|| {
        parse_error(
            ChannelIngressReasonCode::InvalidTimestamp,
            "message.date must be a positive integer",
        )
    })?;
    if timestamp_secs == 0 {
        return Err(parse_error(
            ChannelIngressReasonCode::InvalidTimestamp,
            "message.date cannot be zero",
        ));
    }

    let chat_id = required_id_field(chat, "id", "message.chat.id")?;
    let user_id = required_id_field(from, "id", "message.from.id")?;
    let username = optional_string_field(from, "username").unwrap_or_default();

    let text = optional_string_field(message, "text").unwrap_or_default();
    let media = extract_media(message, timestamp_secs)?;
    let contact = extract_contact(message);

    let kind = if contact.is_some() {
        ChannelEventKind::Contact
    } else if media.is_some() {
        ChannelEventKind::Media
    } else if text.trim().starts_with('/') {
        ChannelEventKind::Command
    } else if !text.trim().is_empty() {
        ChannelEventKind::Text
    } else {
        return Err(parse_error(
            ChannelIngressReasonCode::EmptyContent,
            "message carries neither text, media, nor contact",
        ));
    };

    let event = ChannelInboundEvent {
        kind,
        update_id,
        chat_id,
        user_id,
        username,
        timestamp_ms: timestamp_secs.saturating_mul(1000),
        text,
        media,
        contact,
    };
    validate_channel_inbound_event(&event).map_err(|error| {
        parse_error(
            ChannelIngressReasonCode::InvalidNormalizedEvent,
            error.to_string(),
        )
    })?;
    Ok(event)
}

fn extract_media(
    message: &Map<String, Value>,
    timestamp_secs: u64,
) -> Result<Option<ChannelMedia>, ChannelIngressParseError> {
    if let Some(document) = message.get("document").and_then(Value::as_object) {
        let file_id = required_id_field(document, "file_id", "message.document.file_id")?;
        let file_name = optional_string_field(document, "file_name")
            .unwrap_or_else(|| format!("document_{}.bin", format_unix_time_compact(timestamp_secs)));
        return Ok(Some(ChannelMedia {
            kind: ChannelMediaKind::Document,
            file_id,
            file_name,
            size_bytes: document.get("file_size").and_then(Value::as_u64).unwrap_or(0),
        }));
    }
    if let Some(sizes) = message.get("photo").and_then(Value::as_array) {
        // Telegram orders photo sizes smallest first; the last entry is the original.
        let Some(largest) = sizes.last().and_then(Value::as_object) else {
            return Err(parse_error(
                ChannelIngressReasonCode::InvalidFieldType,
                "message.photo must be a non-empty array of size objects",
            ));
        };
        let file_id = required_id_field(largest, "file_id", "message.photo[].file_id")?;
        return Ok(Some(ChannelMedia {
            kind: ChannelMediaKind::Photo,
            file_id,
            file_name: format!("photo_{}.jpg", format_unix_time_compact(timestamp_secs)),
            size_bytes: largest.get("file_size").and_then(Value::as_u64).unwrap_or(0),
        }));
    }
    if let Some(video) = message.get("video").and_then(Value::as_object) {
        let file_id = required_id_field(video, "file_id", "message.video.file_id")?;
        let file_name = optional_string_field(video, "file_name")
            .unwrap_or_else(|| format!("video_{}.mp4", file_id));
        return Ok(Some(ChannelMedia {
            kind: ChannelMediaKind::Video,
            file_id,
            file_name,
            size_bytes: video.get("file_size").and_then(Value::as_u64).unwrap_or(0),
        }));
    }
    if let Some(audio) = message.get("audio").and_then(Value::as_object) {
        let file_id = required_id_field(audio, "file_id", "message.audio.file_id")?;
        let file_name = optional_string_field(audio, "file_name")
            .unwrap_or_else(|| format!("audio_{}.mp3", file_id));
        return Ok(Some(ChannelMedia {
            kind: ChannelMediaKind::Audio,
            file_id,
            file_name,
            size_bytes: audio.get("file_size").and_then(Value::as_u64).unwrap_or(0),
        }));
    }
    Ok(None)
}

fn extract_contact(message: &Map<String, Value>) -> Option<ChannelContact> {
    let contact = message.get("contact").and_then(Value::as_object)?;
    let phone_number = optional_string_field(contact, "phone_number")?;
    let full_name = [
        optional_string_field(contact, "first_name"),
        optional_string_field(contact, "last_name"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<String>>()
    .join(" ");
    Some(ChannelContact {
        phone_number,
        user_id: contact
            .get("user_id")
            .map(id_value_to_string)
            .unwrap_or_default(),
        full_name,
    })
}

fn as_object<'a>(
    value: &'a Value,
    message: &str,
) -> Result<&'a Map<String, Value>, ChannelIngressParseError> {
    value
        .as_object()
        .ok_or_else(|| parse_error(ChannelIngressReasonCode::InvalidFieldType, message))
}

fn object_field<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    label: &str,
) -> Result<&'a Map<String, Value>, ChannelIngressParseError> {
    object
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            parse_error(
                ChannelIngressReasonCode::MissingField,
                format!("{label} is required"),
            )
        })
}

fn required_id_field(
    object: &Map<String, Value>,
    key: &str,
    label: &str,
) -> Result<String, ChannelIngressParseError> {
    let value = object.get(key).map(id_value_to_string).unwrap_or_default();
    if value.trim().is_empty() {
        return Err(parse_error(
            ChannelIngressReasonCode::MissingField,
            format!("{label} is required"),
        ));
    }
    Ok(value)
}

fn optional_string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    normalize_optional_text(object.get(key).and_then(Value::as_str))
}

fn id_value_to_string(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}
