use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    errors::DomainError, models::DispatchConfiguration,
    repositories::DispatchConfigurationRepository,
};

pub struct GetConfigurationUseCase {
    repo: Arc<dyn DispatchConfigurationRepository>,
}

impl GetConfigurationUseCase {
    pub fn new(repo: Arc<dyn DispatchConfigurationRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: Uuid) -> anyhow::Result<DispatchConfiguration> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("dispatch configuration {id}")).into())
    }
}
