use serde::Serialize;

use super::BackendState;

/// Test-only render output: a tagged container with no visual content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderView {
    pub test_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlaceholderView>,
}

impl PlaceholderView {
    /// `backend-<state>-<cycle>`, with a `backend-loading-<cycle>` child once loaded.
    pub fn for_state(state: BackendState, cycle: u64) -> Self {
        let children = match state {
            BackendState::Loading => Vec::new(),
            BackendState::Loaded => vec![Self::leaf(format!("backend-loading-{cycle}"))],
        };
        Self {
            test_id: format!("backend-{state}-{cycle}"),
            children,
        }
    }

    fn leaf(test_id: String) -> Self {
        Self {
            test_id,
            children: Vec::new(),
        }
    }

    /// Depth-first search by test id, including `self`.
    pub fn find(&self, test_id: &str) -> Option<&PlaceholderView> {
        if self.test_id == test_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(test_id))
    }
}
