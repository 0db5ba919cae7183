use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::services::messenger::{CreateChatParams, MessagingBackend, SendMessageParams},
    domain::models::Chat,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub instance_id: Uuid,
    pub chat_id: String,
    pub phone: String,
    pub body: String,
}

const DEFAULT_HISTORY_LIMIT: usize = 1_000;

/// Backend that keeps chats in process and nothing leaves the machine. Only
/// the most recent sent messages are retained.
pub struct InMemoryMessagingBackend {
    chats: Arc<RwLock<HashMap<Uuid, Vec<Chat>>>>,
    sent: Arc<RwLock<VecDeque<SentMessage>>>,
    history_limit: usize,
}

impl Default for InMemoryMessagingBackend {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl InMemoryMessagingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            chats: Arc::default(),
            sent: Arc::default(),
            history_limit,
        }
    }

    /// Oldest first.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.read().await.iter().cloned().collect()
    }

    pub async fn chats(&self, instance_id: Uuid) -> Vec<Chat> {
        self.chats
            .read()
            .await
            .get(&instance_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessagingBackend for InMemoryMessagingBackend {
    async fn load_chats(&self, instance_id: Uuid) -> anyhow::Result<Vec<Chat>> {
        Ok(self.chats(instance_id).await)
    }

    async fn create_chat(&self, params: CreateChatParams) -> anyhow::Result<Chat> {
        let chat = Chat {
            id: Uuid::new_v4().to_string(),
            instance_id: params.instance_id,
            phone: params.phone,
            name: params.name,
        };
        let mut chats = self.chats.write().await;
        chats.entry(params.instance_id).or_default().push(chat.clone());
        Ok(chat)
    }

    async fn send_message(&self, params: SendMessageParams) -> anyhow::Result<()> {
        info!(
            instance_id = %params.instance_id,
            chat_id = %params.chat_id,
            "[in-memory] message accepted"
        );
        if self.history_limit == 0 {
            return Ok(());
        }
        let mut sent = self.sent.write().await;
        if sent.len() == self.history_limit {
            sent.pop_front();
        }
        sent.push_back(SentMessage {
            instance_id: params.instance_id,
            chat_id: params.chat_id,
            phone: params.phone,
            body: params.body,
        });
        Ok(())
    }
}
