//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::MockviewConfig;
use mockview_common::ConfigError;

use helpers::{validate_min_u64, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &MockviewConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_backend(&mut errors, config);
    validate_runtime(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_backend(errors: &mut Vec<String>, config: &MockviewConfig) {
    let base_url = &config.backend.base_url;
    if let Err(e) = url::Url::parse(base_url) {
        errors.push(format!("backend.base_url = '{base_url}' is not a valid URL: {e}"));
    }
    if config.backend.user_agent.contains(['\n', '\r']) {
        errors.push("backend.user_agent must be a single line".into());
    }
}

fn validate_runtime(errors: &mut Vec<String>, config: &MockviewConfig) {
    let runtime = &config.runtime;
    validate_range(errors, "runtime.recursion_limit", runtime.recursion_limit, 16, 10_000);
    validate_range(
        errors,
        "runtime.stack_size_limit",
        runtime.stack_size_limit,
        256,
        1_048_576,
    );
    validate_min_u64(
        errors,
        "runtime.loop_iteration_limit",
        runtime.loop_iteration_limit,
        1_000,
    );
    validate_range(errors, "runtime.max_timer_runs", runtime.max_timer_runs, 1, 100_000);
}
