//! Page console output, forwarded to tracing.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Tracing target for messages written by page scripts.
pub const CONSOLE_TARGET: &str = "mockview::console";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
}

impl ConsoleMessage {
    pub(crate) fn emit(&self) {
        let message = self.message.as_str();
        match self.level {
            ConsoleLevel::Error => error!(target: "mockview::console", "{message}"),
            ConsoleLevel::Warn => warn!(target: "mockview::console", "{message}"),
            ConsoleLevel::Log | ConsoleLevel::Info => {
                info!(target: "mockview::console", "{message}")
            }
            ConsoleLevel::Debug => debug!(target: "mockview::console", "{message}"),
        }
    }
}
