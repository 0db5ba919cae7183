use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{errors::DomainError, repositories::DispatchConfigurationRepository};

pub struct DeleteConfigurationUseCase {
    repo: Arc<dyn DispatchConfigurationRepository>,
}

impl DeleteConfigurationUseCase {
    pub fn new(repo: Arc<dyn DispatchConfigurationRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: Uuid) -> anyhow::Result<()> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::NotFound(format!("dispatch configuration {id}")).into());
        }
        info!(configuration_id = %id, "dispatch configuration deleted");
        Ok(())
    }
}
