pub mod create_configuration;
pub mod delete_configuration;
pub mod get_configuration;
pub mod list_configurations;
pub mod list_instances;
pub mod register_instance;
pub mod run_dispatch;
pub mod update_configuration;
pub mod validate_configuration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{AssignmentStrategy, DispatchConfiguration, TimeWindows};

/// Operator-editable fields of a dispatch configuration.
#[derive(Debug, Clone)]
pub struct ConfigurationDraft {
    pub name: String,
    pub assigned_brokers: Vec<String>,
    pub strategy: AssignmentStrategy,
    pub time_windows: Option<TimeWindows>,
    pub interval_between_messages_ms: u64,
    pub message_template: String,
    pub is_active: bool,
    pub priority: i32,
}

impl ConfigurationDraft {
    pub(crate) fn into_configuration(
        self,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> DispatchConfiguration {
        DispatchConfiguration {
            id,
            name: self.name,
            assigned_brokers: self.assigned_brokers,
            strategy: self.strategy,
            time_windows: self.time_windows,
            interval_between_messages_ms: self.interval_between_messages_ms,
            message_template: self.message_template,
            is_active: self.is_active,
            priority: self.priority,
            created_at,
            updated_at: Utc::now(),
        }
    }
}
