use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::handlers::dispatch_orchestrator::{DispatchContext, DispatchOrchestrator},
    domain::{
        errors::DomainError,
        models::{DispatchConfiguration, DispatchResult, DispatchRow},
        repositories::{DispatchConfigurationRepository, MessagingInstanceRepository},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationSelector {
    /// Run without a configuration: single default bucket, no time window.
    Unconfigured,
    /// Highest-priority active configuration, or none if there is none.
    Active,
    Explicit(Uuid),
}

pub struct RunDispatchRequest {
    pub configuration: ConfigurationSelector,
    pub rows: Vec<DispatchRow>,
    pub message_template: Option<String>,
}

pub struct RunDispatchUseCase {
    config_repo: Arc<dyn DispatchConfigurationRepository>,
    instance_repo: Arc<dyn MessagingInstanceRepository>,
    orchestrator: Arc<DispatchOrchestrator>,
}

impl RunDispatchUseCase {
    pub fn new(
        config_repo: Arc<dyn DispatchConfigurationRepository>,
        instance_repo: Arc<dyn MessagingInstanceRepository>,
        orchestrator: Arc<DispatchOrchestrator>,
    ) -> Self {
        Self {
            config_repo,
            instance_repo,
            orchestrator,
        }
    }

    pub async fn execute(&self, request: RunDispatchRequest) -> anyhow::Result<DispatchResult> {
        let configuration = self.resolve_configuration(request.configuration).await?;
        let instances = self.instance_repo.list().await?;

        let mut context = DispatchContext::new(instances);
        if let Some(configuration) = configuration {
            context = context.with_configuration(configuration);
        }
        if let Some(template) = request.message_template.filter(|t| !t.trim().is_empty()) {
            context = context.with_template(template);
        }
        if context.effective_template().trim().is_empty() {
            return Err(DomainError::Validation("message template is required".to_string()).into());
        }

        let configuration_id = context.configuration.as_ref().map(|c| c.id);
        info!(
            configuration_id = ?configuration_id,
            rows = request.rows.len(),
            instances = context.instances.len(),
            "dispatch requested"
        );

        let result = self.orchestrator.run(request.rows, &context).await?;
        if !result.is_complete_success() {
            warn!(
                configuration_id = ?configuration_id,
                sent = result.total_sent,
                errors = result.total_errors,
                "dispatch finished with errors"
            );
        }
        Ok(result)
    }

    async fn resolve_configuration(
        &self,
        selector: ConfigurationSelector,
    ) -> anyhow::Result<Option<DispatchConfiguration>> {
        match selector {
            ConfigurationSelector::Unconfigured => Ok(None),
            ConfigurationSelector::Active => self.config_repo.find_active().await,
            ConfigurationSelector::Explicit(id) => {
                let configuration = self
                    .config_repo
                    .get(id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound(format!("dispatch configuration {id}")))?;
                if !configuration.is_active {
                    return Err(DomainError::Forbidden(format!(
                        "dispatch configuration {id} is inactive"
                    ))
                    .into());
                }
                Ok(Some(configuration))
            }
        }
    }
}
