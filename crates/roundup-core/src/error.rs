use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoundupError {
    #[error("not initialized: run 'roundup init'")]
    NotInitialized,

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("{start} moved by {n} working days is outside the supported calendar")]
    DateOutOfRange { start: NaiveDate, n: i64 },

    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("unknown action '{0}': valid actions are send, remind, report")]
    UnknownAction(String),

    #[error("population source not found: {}", .0.display())]
    PopulationMissing(PathBuf),

    #[error("action runner '{0}' not found on PATH")]
    RunnerNotFound(String),

    #[error("failed to spawn action runner: {0}")]
    ActionSpawnFailed(String),

    #[error("action '{action}' failed: {hint}")]
    ActionFailed { action: String, hint: String },

    #[error("failed to notify {recipient}: {reason}")]
    NotifyFailed { recipient: String, reason: String },

    #[error("The submission period has ended. Data cannot be saved.")]
    SubmissionClosed,

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoundupError>;
