//! Error types for the scroll observer

use thiserror::Error;

/// Which part of a condition was running when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionStage {
    /// The predicate
    Test,
    /// The callback for a true outcome
    OnTrue,
    /// The callback for a false outcome
    OnFalse,
}

impl std::fmt::Display for ConditionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStage::Test => f.write_str("test"),
            ConditionStage::OnTrue => f.write_str("on_true"),
            ConditionStage::OnFalse => f.write_str("on_false"),
        }
    }
}

/// Errors produced by the scroll observer
#[derive(Error, Debug)]
pub enum ObserverError {
    /// A string selector matched nothing at construction
    #[error("Selector did not match any element: {0}")]
    Unresolved(String),

    /// A predicate or callback panicked and the check pass was aborted
    #[error("Check pass aborted: {stage} of condition {condition} on entry {entry} panicked: {message}")]
    CallbackPanicked {
        entry: usize,
        condition: usize,
        stage: ConditionStage,
        message: String,
    },

    /// The observer was stopped and cannot be started again
    #[error("Observer has been stopped")]
    Stopped,

    /// The check thread could not be spawned
    #[error("Failed to spawn check thread: {0}")]
    Spawn(std::io::Error),

    /// A configuration file could not be read
    #[error("Failed to read observer configuration: {0}")]
    ConfigRead(std::io::Error),

    /// Configuration text could not be parsed
    #[error("Invalid observer configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for observer operations
pub type Result<T> = std::result::Result<T, ObserverError>;
