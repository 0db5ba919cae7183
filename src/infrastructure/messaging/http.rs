use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    application::services::messenger::{CreateChatParams, MessagingBackend, SendMessageParams},
    domain::models::Chat,
};

#[derive(Clone)]
pub struct HttpMessagingConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// REST adapter over the hosted messaging backend.
pub struct HttpMessagingBackend {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpMessagingBackend {
    pub fn new(config: HttpMessagingConfig) -> anyhow::Result<Arc<dyn MessagingBackend>> {
        let http = Client::builder()
            .user_agent("broker-dispatch/http")
            .timeout(config.timeout)
            .build()
            .context("failed to build messaging http client")?;

        Ok(Arc::new(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }) as Arc<dyn MessagingBackend>)
    }

    fn build_url(&self, instance_id: Uuid, resource: &str) -> String {
        format!("{}/instances/{}/{}", self.base_url, instance_id, resource)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key),
            None => request,
        }
    }

    async fn ensure_success(response: Response, action: &str) -> anyhow::Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or(body);
        anyhow::bail!("messaging backend failed to {action} ({status}): {detail}")
    }
}

#[async_trait]
impl MessagingBackend for HttpMessagingBackend {
    async fn load_chats(&self, instance_id: Uuid) -> anyhow::Result<Vec<Chat>> {
        let response = self
            .authorize(self.http.get(self.build_url(instance_id, "chats")))
            .send()
            .await?;
        let payload: Vec<ChatPayload> = Self::ensure_success(response, "load chats")
            .await?
            .json()
            .await?;

        debug!(%instance_id, chats = payload.len(), "loaded chats");
        Ok(payload
            .into_iter()
            .map(|chat| chat.into_chat(instance_id))
            .collect())
    }

    async fn create_chat(&self, params: CreateChatParams) -> anyhow::Result<Chat> {
        let response = self
            .authorize(self.http.post(self.build_url(params.instance_id, "chats")))
            .json(&CreateChatBody {
                phone: &params.phone,
                name: params.name.as_deref(),
            })
            .send()
            .await?;
        let payload: ChatPayload = Self::ensure_success(response, "create chat")
            .await?
            .json()
            .await?;
        Ok(payload.into_chat(params.instance_id))
    }

    async fn send_message(&self, params: SendMessageParams) -> anyhow::Result<()> {
        let response = self
            .authorize(self.http.post(self.build_url(params.instance_id, "messages")))
            .json(&SendMessageBody {
                chat_id: &params.chat_id,
                phone: &params.phone,
                text: &params.body,
            })
            .send()
            .await?;
        Self::ensure_success(response, "send message").await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    id: String,
    #[serde(alias = "contact_phone")]
    phone: String,
    #[serde(default, alias = "contact_name")]
    name: Option<String>,
}

impl ChatPayload {
    fn into_chat(self, instance_id: Uuid) -> Chat {
        Chat {
            id: self.id,
            instance_id,
            phone: self.phone,
            name: self.name,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateChatBody<'a> {
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    phone: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}
