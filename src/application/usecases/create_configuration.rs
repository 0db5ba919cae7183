use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{services::validation::validate_configuration, usecases::ConfigurationDraft},
    domain::{
        errors::DomainError, models::DispatchConfiguration,
        repositories::DispatchConfigurationRepository,
    },
};

pub struct CreateConfigurationUseCase {
    repo: Arc<dyn DispatchConfigurationRepository>,
}

impl CreateConfigurationUseCase {
    pub fn new(repo: Arc<dyn DispatchConfigurationRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, draft: ConfigurationDraft) -> anyhow::Result<DispatchConfiguration> {
        let configuration = draft.into_configuration(Uuid::new_v4(), Utc::now());

        let report = validate_configuration(&configuration);
        if !report.is_valid {
            return Err(DomainError::Validation(report.errors.join("; ")).into());
        }

        let stored = self.repo.insert(configuration).await?;
        info!(configuration_id = %stored.id, name = %stored.name, "dispatch configuration created");
        Ok(stored)
    }
}
