use thiserror::Error;

/// Unified error type for the Sense controller.
#[derive(Error, Debug)]
pub enum SenseError {
    // ── World call errors ──────────────────────────────────────
    #[error("world call failed: {action}: {reason}")]
    WorldCall { action: String, reason: String },

    #[error("not holding {0}")]
    NotHolding(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("no block at {0}")]
    NoBlock(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("agent disconnected")]
    Disconnected,

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SenseError {
    /// Shorthand for a rejected world call.
    pub fn world_call(action: impl Into<String>, reason: impl Into<String>) -> Self {
        SenseError::WorldCall {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SenseError>;
