use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{InstanceStatus, MessagingInstance},
    repositories::MessagingInstanceRepository,
};

pub struct RegisterInstanceUseCase {
    repo: Arc<dyn MessagingInstanceRepository>,
}

pub struct RegisterInstanceRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub broker_id: Option<String>,
    pub status: InstanceStatus,
    pub phone: Option<String>,
}

impl RegisterInstanceUseCase {
    pub fn new(repo: Arc<dyn MessagingInstanceRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, request: RegisterInstanceRequest) -> anyhow::Result<MessagingInstance> {
        if request.name.trim().is_empty() {
            return Err(DomainError::Validation("instance name is required".to_string()).into());
        }

        let instance = MessagingInstance {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            name: request.name,
            broker_id: request.broker_id.filter(|b| !b.trim().is_empty()),
            status: request.status,
            phone: request.phone,
        };

        let stored = self.repo.upsert(instance).await?;
        info!(instance_id = %stored.id, status = stored.status.as_str(), "messaging instance registered");
        Ok(stored)
    }
}
