use std::sync::Arc;

use crate::domain::{models::DispatchConfiguration, repositories::DispatchConfigurationRepository};

pub struct ListConfigurationsUseCase {
    repo: Arc<dyn DispatchConfigurationRepository>,
}

impl ListConfigurationsUseCase {
    pub fn new(repo: Arc<dyn DispatchConfigurationRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> anyhow::Result<Vec<DispatchConfiguration>> {
        self.repo.list().await
    }
}
