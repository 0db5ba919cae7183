use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::TimeWindows;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    #[default]
    RoundRobin,
    Random,
    /// Not yet defined; dispatch falls back to round-robin.
    LeastBusy,
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStrategy::RoundRobin => "round_robin",
            AssignmentStrategy::Random => "random",
            AssignmentStrategy::LeastBusy => "least_busy",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "round_robin" => Some(AssignmentStrategy::RoundRobin),
            "random" => Some(AssignmentStrategy::Random),
            "least_busy" => Some(AssignmentStrategy::LeastBusy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfiguration {
    pub id: Uuid,
    pub name: String,
    pub assigned_brokers: Vec<String>,
    pub strategy: AssignmentStrategy,
    pub time_windows: Option<TimeWindows>,
    pub interval_between_messages_ms: u64,
    pub message_template: String,
    pub is_active: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
