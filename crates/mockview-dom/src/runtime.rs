//! Thin wrapper over the boa context with hardening limits applied.

use boa_engine::{Context, JsValue, Source};

/// Script engine limits, applied to every document's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLimits {
    pub recursion_limit: usize,
    pub stack_size_limit: usize,
    pub loop_iteration_limit: u64,
    /// Timer callbacks run per flush; bounds `setInterval` loops.
    pub max_timer_runs: usize,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        Self {
            recursion_limit: 512,
            stack_size_limit: 10 * 1024,
            loop_iteration_limit: 1_000_000,
            max_timer_runs: 1_000,
        }
    }
}

pub(crate) struct ScriptRuntime {
    context: Context,
}

impl ScriptRuntime {
    pub(crate) fn new(limits: &RuntimeLimits) -> Self {
        let mut context = Context::default();
        let runtime_limits = context.runtime_limits_mut();
        runtime_limits.set_recursion_limit(limits.recursion_limit);
        runtime_limits.set_stack_size_limit(limits.stack_size_limit);
        runtime_limits.set_loop_iteration_limit(limits.loop_iteration_limit);
        Self { context }
    }

    /// Evaluate `source` as a classic script and drain the job queue.
    pub(crate) fn eval(&mut self, source: &str) -> Result<JsValue, String> {
        let result = self.context.eval(Source::from_bytes(source.as_bytes()));
        self.context.run_jobs();
        result.map_err(|e| e.to_string())
    }

    pub(crate) fn eval_string(&mut self, source: &str) -> Result<String, String> {
        let value = self.eval(source)?;
        value
            .to_string(&mut self.context)
            .map(|s| s.to_std_string_escaped())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_to_string() {
        let mut runtime = ScriptRuntime::new(&RuntimeLimits::default());
        assert_eq!(runtime.eval_string("1 + 2").unwrap(), "3");
    }

    #[test]
    fn loop_limit_aborts_runaway_script() {
        let limits = RuntimeLimits {
            loop_iteration_limit: 1_000,
            ..Default::default()
        };
        let mut runtime = ScriptRuntime::new(&limits);
        assert!(runtime.eval("while (true) {}").is_err());
    }

    #[test]
    fn thrown_errors_become_messages() {
        let mut runtime = ScriptRuntime::new(&RuntimeLimits::default());
        let message = runtime.eval("throw new TypeError('bad input')").unwrap_err();
        assert!(message.contains("bad input"));
    }
}
