//! Error types for the postcal scheduling engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in postcal operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Caption generation failed: {0}")]
    Generation(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input problems that block a save or a session from opening.
/// Non-fatal: the draft stays as it was so the user can fix it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Caption cannot be empty")]
    EmptyCaption,

    #[error("No date selected")]
    MissingDate,

    #[error("Cannot schedule in the past ({0})")]
    PastDate(NaiveDate),
}

/// Result type alias for postcal operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
