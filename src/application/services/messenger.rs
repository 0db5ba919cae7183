use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::Chat;

#[derive(Debug, Clone)]
pub struct CreateChatParams {
    pub instance_id: Uuid,
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendMessageParams {
    pub instance_id: Uuid,
    pub chat_id: String,
    pub phone: String,
    pub body: String,
}

/// Capability set a dispatch run needs from the messaging provider.
#[async_trait]
pub trait MessagingBackend: Send + Sync {
    async fn load_chats(&self, instance_id: Uuid) -> anyhow::Result<Vec<Chat>>;
    async fn create_chat(&self, params: CreateChatParams) -> anyhow::Result<Chat>;
    async fn send_message(&self, params: SendMessageParams) -> anyhow::Result<()>;
}

/// Keeps only ASCII digits, so `+55 (11) 9 8765-4321` becomes `5511987654321`.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}
