use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identifies one mounted backend for log correlation.
///
/// Displayed in its short (first eight hex digits) form so log lines stay
/// readable; the full id is kept for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountId(String);

impl MountId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn mount_id_short_form() {
        let mid = MountId::new();
        assert_eq!(mid.short().len(), 8);
        assert!(mid.as_str().starts_with(mid.short()));
        assert_eq!(mid.to_string(), mid.short());
    }

    #[test]
    fn mount_id_equality() {
        let mid = MountId::new();
        assert_eq!(mid, mid.clone());
        assert_ne!(mid, MountId::default());
    }

    #[test]
    fn mount_id_serialization() {
        let mid = MountId::new();
        let json = serde_json::to_string(&mid).unwrap();
        let back: MountId = serde_json::from_str(&json).unwrap();
        assert_eq!(mid, back);
    }
}
