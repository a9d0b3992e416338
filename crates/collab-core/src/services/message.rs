// Message service for chat history
//
// Thin facade: no validation beyond what the repository enforces.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::message::{Message, MessagePage, NewMessage, Pagination};
use crate::traits::MessageRepository;

pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn create_message(&self, payload: NewMessage) -> Result<Message> {
        let message = self.messages.create(payload).await?;
        tracing::debug!(
            message_id = %message.id,
            chat_id = %message.chat_id,
            sender_id = %message.sender_id,
            "Message stored"
        );
        Ok(message)
    }

    /// One page of a chat, newest first
    pub async fn list_by_chat(&self, chat_id: Uuid, page: Pagination) -> Result<Vec<Message>> {
        self.messages.list_by_chat(chat_id, page).await
    }

    /// One page of a chat plus the chat's total count.
    ///
    /// The page and the count are two separate reads with no shared snapshot.
    pub async fn list_by_chat_with_total(
        &self,
        chat_id: Uuid,
        page: Pagination,
    ) -> Result<MessagePage> {
        let items = self.messages.list_by_chat(chat_id, page).await?;
        let total = self.messages.count_by_chat(chat_id).await?;

        Ok(MessagePage {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        })
    }
}
