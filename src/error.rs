//! Error types for the planning engine, the store, and the orchestrator

use thiserror::Error;

/// Inputs the allocator refuses to plan against. None of these are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("no topics to plan")]
    EmptyTopics,
    #[error("hours per day must be positive, got {0}")]
    NonPositiveHours(f64),
    #[error("deadline must be at least one day")]
    NonPositiveDeadline,
    #[error("topic '{topic}' needs at least 0.01 estimated hours, got {hours}")]
    InvalidEstimate { topic: String, hours: f64 },
    #[error("topic '{0}' appears more than once")]
    DuplicateTopic(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("stored JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored timestamp is invalid: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
