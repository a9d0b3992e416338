// Database-backed MessageRepository implementation
//
// Attachments are stored as a JSONB array and decoded on read.

use async_trait::async_trait;
use collab_core::{
    Attachment, DeliveryStatus, Message, MessageRepository, MessageType, NewMessage, Pagination,
    Result, ServiceError,
};
use uuid::Uuid;

use crate::models::{CreateMessageRow, MessageRow};
use crate::repositories::Database;
use crate::store_error;

/// Database-backed message repository
#[derive(Clone)]
pub struct DbMessageRepository {
    db: Database,
}

impl DbMessageRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_message(row: MessageRow) -> Result<Message> {
        let attachments: Vec<Attachment> =
            serde_json::from_value(row.attachments).map_err(|e| {
                ServiceError::persistence(format!(
                    "invalid attachments on message {}: {}",
                    row.id, e
                ))
            })?;

        Ok(Message {
            id: row.id,
            chat_id: row.chat_id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            text: row.text,
            attachments,
            message_type: MessageType::from(row.message_type.as_str()),
            status: DeliveryStatus::from(row.status.as_str()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Decode a page of rows; one undecodable row fails the whole page
    fn rows_to_messages(rows: Vec<MessageRow>) -> Result<Vec<Message>> {
        rows.into_iter().map(Self::row_to_message).collect()
    }
}

#[async_trait]
impl MessageRepository for DbMessageRepository {
    async fn create(&self, input: NewMessage) -> Result<Message> {
        let attachments = serde_json::to_value(&input.attachments)
            .map_err(|e| ServiceError::persistence(e.to_string()))?;

        let row = self
            .db
            .create_message(CreateMessageRow {
                chat_id: input.chat_id,
                sender_id: input.sender_id,
                recipient_id: input.recipient_id,
                text: input.text,
                attachments,
                message_type: input.message_type.unwrap_or_default().to_string(),
                status: input.status.unwrap_or_default().to_string(),
            })
            .await
            .map_err(store_error)?;

        Self::row_to_message(row)
    }

    async fn list_by_chat(&self, chat_id: Uuid, page: Pagination) -> Result<Vec<Message>> {
        let rows = self
            .db
            .list_messages(chat_id, i64::from(page.limit), i64::from(page.offset))
            .await
            .map_err(store_error)?;

        tracing::debug!(
            chat_id = %chat_id,
            limit = page.limit,
            offset = page.offset,
            rows = rows.len(),
            "Loaded message page"
        );
        Self::rows_to_messages(rows)
    }

    async fn count_by_chat(&self, chat_id: Uuid) -> Result<u64> {
        let count = self.db.count_messages(chat_id).await.map_err(store_error)?;
        Ok(count.max(0) as u64)
    }
}
