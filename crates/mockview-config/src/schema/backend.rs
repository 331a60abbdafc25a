//! Defaults applied to every mounted backend unless the caller overrides them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendDefaults {
    /// `navigator.userAgent` seen by page scripts. Empty means the engine default.
    pub user_agent: String,
    /// Document URL used when the source is inline HTML.
    pub base_url: String,
    pub javascript_enabled: bool,
}

impl Default for BackendDefaults {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            base_url: "about:blank".into(),
            javascript_enabled: true,
        }
    }
}

impl BackendDefaults {
    pub fn user_agent(&self) -> Option<&str> {
        let ua = self.user_agent.trim();
        (!ua.is_empty()).then_some(ua)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_user_agent_means_engine_default() {
        let defaults = BackendDefaults::default();
        assert_eq!(defaults.user_agent(), None);

        let defaults = BackendDefaults {
            user_agent: "  fixture-agent/1.0 ".into(),
            ..Default::default()
        };
        assert_eq!(defaults.user_agent(), Some("fixture-agent/1.0"));
    }
}
