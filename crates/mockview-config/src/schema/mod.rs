//! Configuration schema types for mockview.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod logging;
mod runtime;

pub use backend::*;
pub use logging::*;
pub use runtime::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MockviewConfig {
    pub backend: BackendDefaults,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}
