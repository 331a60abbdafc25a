use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures surfaced by the headless DOM engine.
///
/// Errors thrown by page code that the host did not invoke directly
/// (inline scripts, event listeners, timers) are not returned through
/// this type; the engine records them instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("invalid document url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("script bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("script error in {origin}: {message}")]
    Script { origin: String, message: String },

    #[error("unreadable script result: {0}")]
    Decode(String),
}

impl DomError {
    /// Message of a script error, if this is one.
    pub fn script_message(&self) -> Option<&str> {
        match self {
            Self::Script { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
