use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{DispatchConfiguration, MessagingInstance};

#[async_trait]
pub trait DispatchConfigurationRepository: Send + Sync {
    async fn insert(&self, configuration: DispatchConfiguration) -> anyhow::Result<DispatchConfiguration>;
    async fn update(&self, configuration: DispatchConfiguration) -> anyhow::Result<Option<DispatchConfiguration>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DispatchConfiguration>>;
    /// Ordered by priority (highest first), then name.
    async fn list(&self) -> anyhow::Result<Vec<DispatchConfiguration>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Highest-priority active configuration, if any.
    async fn find_active(&self) -> anyhow::Result<Option<DispatchConfiguration>>;
}

#[async_trait]
pub trait MessagingInstanceRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<MessagingInstance>>;
    async fn upsert(&self, instance: MessagingInstance) -> anyhow::Result<MessagingInstance>;
}
