use thiserror::Error;

use crate::domain::models::DayOfWeek;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Operation not allowed: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures that abort a dispatch run before any message is sent.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch is outside the allowed time window ({day} {time})")]
    OutsideTimeWindow { day: DayOfWeek, time: String },
}
