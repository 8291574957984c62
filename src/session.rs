/// A profile identity. Budget documents are scoped per identity, and nothing
/// below the entry point runs without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity(String);

impl Identity {
    /// A blank name is no identity.
    pub(crate) fn new(name: impl Into<String>) -> Option<Identity> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(Identity(name))
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolve the active identity: an explicit `--profile` value beats the
/// SPENDGUARD_PROFILE environment variable, which beats "default".
pub(crate) fn current_identity(explicit: Option<&str>) -> Option<Identity> {
    if let Some(name) = explicit {
        return Identity::new(name);
    }
    if let Ok(name) = std::env::var("SPENDGUARD_PROFILE") {
        return Identity::new(name);
    }
    Identity::new("default")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rejects_blank() {
        assert!(Identity::new("").is_none());
        assert!(Identity::new("   ").is_none());
    }

    #[test]
    fn test_identity_trims() {
        let id = Identity::new("  alice  ").expect("identity");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(format!("{id}"), "alice");
    }

    #[test]
    fn test_explicit_profile_wins() {
        let id = current_identity(Some("bob")).expect("identity");
        assert_eq!(id.as_str(), "bob");
        // Blank explicit value is no identity, not a fallback
        assert!(current_identity(Some("  ")).is_none());
    }
}
