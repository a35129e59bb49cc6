//! Chat endpoints

use serde::{Deserialize, Serialize};

use crate::api::client::{ApiClient, ApiRequest};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub content: String,
    pub from_user: i64,
    pub to_user: i64,
    #[serde(default)]
    pub is_read: bool,
}

impl ApiClient {
    /// Conversation with `user_id`, oldest first
    pub async fn chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>> {
        self.send(ApiRequest::get(format!("/chat/messages/{}", user_id)))
            .await
    }
}
