use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated caller identity, supplied by the host per call.
///
/// The default value is the nil identity. Records that have never been
/// written read back with a nil owner, so authorization checks against them
/// fail for every real caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(Uuid);

impl Identity {
    /// Mint a fresh identity (hosts would derive these from credentials).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nil() {
        assert!(Identity::default().is_nil());
        assert_eq!(Identity::default(), Identity::nil());
    }

    #[test]
    fn fresh_identities_are_distinct() {
        assert_ne!(Identity::new(), Identity::new());
        assert!(!Identity::new().is_nil());
    }
}
