// Chat message domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Default page size for chat history
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Kind of chat message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    File,
    Audio,
    System,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Text => write!(f, "text"),
            MessageType::Image => write!(f, "image"),
            MessageType::File => write!(f, "file"),
            MessageType::Audio => write!(f, "audio"),
            MessageType::System => write!(f, "system"),
        }
    }
}

impl From<&str> for MessageType {
    fn from(s: &str) -> Self {
        match s {
            "image" => MessageType::Image,
            "file" => MessageType::File,
            "audio" => MessageType::Audio,
            "system" => MessageType::System,
            _ => MessageType::Text,
        }
    }
}

/// Delivery status of a chat message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::Read => write!(f, "read"),
        }
    }
}

impl From<&str> for DeliveryStatus {
    fn from(s: &str) -> Self {
        match s {
            "delivered" => DeliveryStatus::Delivered,
            "read" => DeliveryStatus::Read,
            _ => DeliveryStatus::Sent,
        }
    }
}

/// File attached to a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Attachment {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl Attachment {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type: None,
            filename: None,
            size: None,
        }
    }
}

/// Message - one chat entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub message_type: MessageType,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewMessage {
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Defaults to `text` when omitted
    #[serde(default)]
    pub message_type: Option<MessageType>,
    /// Defaults to `sent` when omitted
    #[serde(default)]
    pub status: Option<DeliveryStatus>,
}

impl NewMessage {
    /// Plain text message from `sender_id` into `chat_id`
    pub fn text(chat_id: Uuid, sender_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender_id,
            recipient_id: None,
            text: Some(text.into()),
            attachments: Vec::new(),
            message_type: None,
            status: None,
        }
    }
}

/// Offset pagination over chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// One page of chat history together with the chat's total message count
///
/// `items` and `total` come from two independent reads; under concurrent
/// writes `total` may differ by the messages inserted between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessagePage {
    pub items: Vec<Message>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::default();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_attachment_skips_absent_fields() {
        let json = serde_json::to_value(Attachment::new("https://cdn.example.com/a.png")).unwrap();
        assert_eq!(json, serde_json::json!({"url": "https://cdn.example.com/a.png"}));
    }

    #[test]
    fn test_new_message_defaults_from_json() {
        let msg: NewMessage = serde_json::from_value(serde_json::json!({
            "chat_id": Uuid::now_v7(),
            "sender_id": Uuid::now_v7(),
            "text": "hello",
        }))
        .unwrap();

        assert!(msg.attachments.is_empty());
        assert!(msg.message_type.is_none());
        assert!(msg.status.is_none());
    }

    #[test]
    fn test_enum_fallbacks() {
        assert_eq!(MessageType::from("sticker"), MessageType::Text);
        assert_eq!(DeliveryStatus::from("queued"), DeliveryStatus::Sent);
        assert_eq!(DeliveryStatus::from("read"), DeliveryStatus::Read);
    }
}
