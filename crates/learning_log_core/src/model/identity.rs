//! Authenticated identity reference.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Username handed over by the authentication collaborator.
///
/// Opaque to the core beyond equality comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Identity;

    #[test]
    fn identity_serializes_as_plain_string() {
        let json = serde_json::to_string(&Identity::new("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }

    #[test]
    fn identities_compare_by_name() {
        assert_eq!(Identity::new("alice"), Identity::new("alice"));
        assert_ne!(Identity::new("alice"), Identity::new("Alice"));
    }
}
