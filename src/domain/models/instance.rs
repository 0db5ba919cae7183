use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Connected => "connected",
            InstanceStatus::Connecting => "connecting",
            InstanceStatus::Disconnected => "disconnected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "connected" | "open" => Some(InstanceStatus::Connected),
            "connecting" => Some(InstanceStatus::Connecting),
            "disconnected" | "close" => Some(InstanceStatus::Disconnected),
            _ => None,
        }
    }
}

/// A single messaging-account connection, e.g. one WhatsApp number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingInstance {
    pub id: Uuid,
    pub name: String,
    pub broker_id: Option<String>,
    pub status: InstanceStatus,
    pub phone: Option<String>,
}

impl MessagingInstance {
    pub fn is_connected(&self) -> bool {
        self.status == InstanceStatus::Connected
    }

    pub fn is_owned_by(&self, broker_id: &str) -> bool {
        self.broker_id.as_deref() == Some(broker_id)
    }
}
