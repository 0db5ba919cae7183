use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{DispatchConfiguration, MessagingInstance},
    repositories::{DispatchConfigurationRepository, MessagingInstanceRepository},
};

#[derive(Default)]
pub struct InMemoryDispatchConfigurationRepository {
    configurations: Arc<RwLock<HashMap<Uuid, DispatchConfiguration>>>,
}

impl InMemoryDispatchConfigurationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_priority(a: &DispatchConfiguration, b: &DispatchConfiguration) -> std::cmp::Ordering {
    b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl DispatchConfigurationRepository for InMemoryDispatchConfigurationRepository {
    async fn insert(&self, configuration: DispatchConfiguration) -> anyhow::Result<DispatchConfiguration> {
        let mut configurations = self.configurations.write().await;
        if configurations.contains_key(&configuration.id) {
            anyhow::bail!("dispatch configuration {} already exists", configuration.id);
        }
        configurations.insert(configuration.id, configuration.clone());
        Ok(configuration)
    }

    async fn update(
        &self,
        mut configuration: DispatchConfiguration,
    ) -> anyhow::Result<Option<DispatchConfiguration>> {
        let mut configurations = self.configurations.write().await;
        let Some(existing) = configurations.get_mut(&configuration.id) else {
            return Ok(None);
        };
        configuration.created_at = existing.created_at;
        configuration.updated_at = Utc::now();
        *existing = configuration.clone();
        Ok(Some(configuration))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DispatchConfiguration>> {
        let configurations = self.configurations.read().await;
        Ok(configurations.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<DispatchConfiguration>> {
        let configurations = self.configurations.read().await;
        let mut list: Vec<_> = configurations.values().cloned().collect();
        list.sort_by(by_priority);
        Ok(list)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut configurations = self.configurations.write().await;
        Ok(configurations.remove(&id).is_some())
    }

    async fn find_active(&self) -> anyhow::Result<Option<DispatchConfiguration>> {
        let configurations = self.configurations.read().await;
        Ok(configurations
            .values()
            .filter(|c| c.is_active)
            .min_by(|a, b| by_priority(a, b))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryMessagingInstanceRepository {
    instances: Arc<RwLock<HashMap<Uuid, MessagingInstance>>>,
}

impl InMemoryMessagingInstanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingInstanceRepository for InMemoryMessagingInstanceRepository {
    async fn list(&self) -> anyhow::Result<Vec<MessagingInstance>> {
        let instances = self.instances.read().await;
        let mut list: Vec<_> = instances.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn upsert(&self, instance: MessagingInstance) -> anyhow::Result<MessagingInstance> {
        let mut instances = self.instances.write().await;
        instances.insert(instance.id, instance.clone());
        Ok(instance)
    }
}
