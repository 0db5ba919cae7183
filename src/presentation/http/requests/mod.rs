use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{InstanceStatusKind, StrategyKind, TimeWindowsDto};

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ConfigurationRequestDto {
    pub name: String,
    pub assigned_brokers: Vec<String>,
    #[oai(default)]
    pub broker_assignment_strategy: StrategyKind,
    pub time_windows: Option<TimeWindowsDto>,
    #[oai(default)]
    pub interval_between_messages: u64,
    pub message_template: String,
    #[oai(default = "default_active")]
    pub is_active: bool,
    #[oai(default)]
    pub priority: i32,
}

fn default_active() -> bool {
    true
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct InstanceRequestDto {
    pub id: Option<Uuid>,
    #[oai(validator(min_length = 1))]
    pub name: String,
    pub broker_id: Option<String>,
    pub status: InstanceStatusKind,
    pub phone: Option<String>,
}

#[derive(Object, Debug, Clone)]
pub struct DispatchRowDto {
    pub nome: String,
    pub telefone: String,
    #[oai(default)]
    pub email: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct DispatchRunRequestDto {
    /// Configuration to apply; takes precedence over `useActiveConfiguration`.
    pub configuration_id: Option<Uuid>,
    #[oai(default)]
    pub use_active_configuration: bool,
    /// Overrides the configuration's template.
    pub message_template: Option<String>,
    pub rows: Vec<DispatchRowDto>,
}
