use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One contact supplied to a dispatch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchRow {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchFailure {
    pub broker_id: String,
    pub phone: Option<String>,
    pub name: Option<String>,
    /// Number of input rows this failure accounts for.
    pub rows: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DispatchResult {
    pub total_sent: usize,
    pub total_errors: usize,
    pub errors: Vec<DispatchFailure>,
    pub duration: Duration,
    pub broker_distribution: BTreeMap<String, usize>,
}

impl DispatchResult {
    pub(crate) fn record_failure(&mut self, failure: DispatchFailure) {
        self.total_errors += failure.rows;
        self.errors.push(failure);
    }

    pub fn is_complete_success(&self) -> bool {
        self.total_errors == 0
    }
}
