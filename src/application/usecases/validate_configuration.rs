use chrono::Utc;
use uuid::Uuid;

use crate::application::{
    services::validation::{ConfigurationValidation, validate_configuration},
    usecases::ConfigurationDraft,
};

#[derive(Default)]
pub struct ValidateConfigurationUseCase;

impl ValidateConfigurationUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, draft: ConfigurationDraft) -> ConfigurationValidation {
        validate_configuration(&draft.into_configuration(Uuid::nil(), Utc::now()))
    }
}
