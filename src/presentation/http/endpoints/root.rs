use std::sync::Arc;

use poem_openapi::Tags;

use crate::{
    application::handlers::dispatch_orchestrator::DispatchOrchestrator,
    application::usecases::{
        create_configuration::CreateConfigurationUseCase,
        delete_configuration::DeleteConfigurationUseCase,
        get_configuration::GetConfigurationUseCase,
        list_configurations::ListConfigurationsUseCase, list_instances::ListInstancesUseCase,
        register_instance::RegisterInstanceUseCase, run_dispatch::RunDispatchUseCase,
        update_configuration::UpdateConfigurationUseCase,
        validate_configuration::ValidateConfigurationUseCase,
    },
    domain::{
        errors::{DispatchError, DomainError},
        repositories::{DispatchConfigurationRepository, MessagingInstanceRepository},
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub create_configuration_usecase: Arc<CreateConfigurationUseCase>,
    pub update_configuration_usecase: Arc<UpdateConfigurationUseCase>,
    pub get_configuration_usecase: Arc<GetConfigurationUseCase>,
    pub list_configurations_usecase: Arc<ListConfigurationsUseCase>,
    pub delete_configuration_usecase: Arc<DeleteConfigurationUseCase>,
    pub validate_configuration_usecase: Arc<ValidateConfigurationUseCase>,
    pub list_instances_usecase: Arc<ListInstancesUseCase>,
    pub register_instance_usecase: Arc<RegisterInstanceUseCase>,
    pub run_dispatch_usecase: Arc<RunDispatchUseCase>,
}

impl ApiState {
    pub fn new(
        config_repo: Arc<dyn DispatchConfigurationRepository>,
        instance_repo: Arc<dyn MessagingInstanceRepository>,
        orchestrator: Arc<DispatchOrchestrator>,
    ) -> Self {
        Self {
            create_configuration_usecase: Arc::new(CreateConfigurationUseCase::new(config_repo.clone())),
            update_configuration_usecase: Arc::new(UpdateConfigurationUseCase::new(config_repo.clone())),
            get_configuration_usecase: Arc::new(GetConfigurationUseCase::new(config_repo.clone())),
            list_configurations_usecase: Arc::new(ListConfigurationsUseCase::new(config_repo.clone())),
            delete_configuration_usecase: Arc::new(DeleteConfigurationUseCase::new(config_repo.clone())),
            validate_configuration_usecase: Arc::new(ValidateConfigurationUseCase::new()),
            list_instances_usecase: Arc::new(ListInstancesUseCase::new(instance_repo.clone())),
            register_instance_usecase: Arc::new(RegisterInstanceUseCase::new(instance_repo.clone())),
            run_dispatch_usecase: Arc::new(RunDispatchUseCase::new(
                config_repo,
                instance_repo,
                orchestrator,
            )),
        }
    }
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Configurations,
    Instances,
    Dispatch,
}

pub fn map_error(err: anyhow::Error) -> poem::Error {
    use poem::http::StatusCode;

    let status = if let Some(domain) = err.downcast_ref::<DomainError>() {
        match domain {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    } else if err.downcast_ref::<DispatchError>().is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if status.is_server_error() {
        tracing::error!(error = ?err, "request failed");
    }
    poem::Error::from_string(err.to_string(), status)
}
