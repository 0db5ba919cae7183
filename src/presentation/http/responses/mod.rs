use std::collections::BTreeMap;

use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{InstanceStatusKind, StrategyKind, TimeWindowsDto};

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct ConfigurationDto {
    pub id: Uuid,
    pub name: String,
    pub assigned_brokers: Vec<String>,
    pub broker_assignment_strategy: StrategyKind,
    pub time_windows: Option<TimeWindowsDto>,
    pub interval_between_messages: u64,
    pub message_template: String,
    pub is_active: bool,
    pub priority: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct ValidationReportDto {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct InstanceDto {
    pub id: Uuid,
    pub name: String,
    pub broker_id: Option<String>,
    pub status: InstanceStatusKind,
    pub phone: Option<String>,
}

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct DispatchFailureDto {
    pub broker_id: String,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub rows: u64,
    pub message: String,
}

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct DispatchResultDto {
    pub total_sent: u64,
    pub total_errors: u64,
    pub errors: Vec<DispatchFailureDto>,
    /// Milliseconds.
    pub duration: u64,
    pub broker_distribution: BTreeMap<String, u64>,
}
