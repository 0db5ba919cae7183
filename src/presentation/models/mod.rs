use poem_openapi::{Enum, Object};

use crate::domain::models::{AssignmentStrategy, InstanceStatus};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Default)]
#[oai(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
    LeastBusy,
}

impl From<StrategyKind> for AssignmentStrategy {
    fn from(value: StrategyKind) -> Self {
        match value {
            StrategyKind::RoundRobin => AssignmentStrategy::RoundRobin,
            StrategyKind::Random => AssignmentStrategy::Random,
            StrategyKind::LeastBusy => AssignmentStrategy::LeastBusy,
        }
    }
}

impl From<AssignmentStrategy> for StrategyKind {
    fn from(value: AssignmentStrategy) -> Self {
        match value {
            AssignmentStrategy::RoundRobin => StrategyKind::RoundRobin,
            AssignmentStrategy::Random => StrategyKind::Random,
            AssignmentStrategy::LeastBusy => StrategyKind::LeastBusy,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[oai(rename_all = "snake_case")]
pub enum InstanceStatusKind {
    Connected,
    Connecting,
    Disconnected,
}

impl From<InstanceStatusKind> for InstanceStatus {
    fn from(value: InstanceStatusKind) -> Self {
        match value {
            InstanceStatusKind::Connected => InstanceStatus::Connected,
            InstanceStatusKind::Connecting => InstanceStatus::Connecting,
            InstanceStatusKind::Disconnected => InstanceStatus::Disconnected,
        }
    }
}

impl From<InstanceStatus> for InstanceStatusKind {
    fn from(value: InstanceStatus) -> Self {
        match value {
            InstanceStatus::Connected => InstanceStatusKind::Connected,
            InstanceStatus::Connecting => InstanceStatusKind::Connecting,
            InstanceStatus::Disconnected => InstanceStatusKind::Disconnected,
        }
    }
}

/// `start` and `end` are `HH:MM`; malformed values surface in the validation
/// report rather than as a parse error.
#[derive(Object, Clone, Debug, PartialEq, Eq)]
pub struct TimeWindowDto {
    pub start: String,
    pub end: String,
    #[oai(default)]
    pub enabled: bool,
}

#[derive(Object, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeWindowsDto {
    pub monday: Option<TimeWindowDto>,
    pub tuesday: Option<TimeWindowDto>,
    pub wednesday: Option<TimeWindowDto>,
    pub thursday: Option<TimeWindowDto>,
    pub friday: Option<TimeWindowDto>,
    pub saturday: Option<TimeWindowDto>,
    pub sunday: Option<TimeWindowDto>,
}
