use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    application::{services::validation::validate_configuration, usecases::ConfigurationDraft},
    domain::{
        errors::DomainError, models::DispatchConfiguration,
        repositories::DispatchConfigurationRepository,
    },
};

pub struct UpdateConfigurationUseCase {
    repo: Arc<dyn DispatchConfigurationRepository>,
}

impl UpdateConfigurationUseCase {
    pub fn new(repo: Arc<dyn DispatchConfigurationRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        id: Uuid,
        draft: ConfigurationDraft,
    ) -> anyhow::Result<DispatchConfiguration> {
        let existing = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("dispatch configuration {id}")))?;

        let configuration = draft.into_configuration(existing.id, existing.created_at);
        let report = validate_configuration(&configuration);
        if !report.is_valid {
            return Err(DomainError::Validation(report.errors.join("; ")).into());
        }

        let updated = self
            .repo
            .update(configuration)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("dispatch configuration {id}")))?;
        info!(configuration_id = %id, "dispatch configuration updated");
        Ok(updated)
    }
}
