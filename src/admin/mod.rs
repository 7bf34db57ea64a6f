//! Admin gate
//!
//! A shared-secret comparison that decides whether editing operations are
//! offered. This only hides the edit surface; it does not protect anything.

/// Holds the configured admin password
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Compare `attempt` against the configured password
    pub fn check(&self, attempt: &str) -> bool {
        attempt == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        let gate = AdminGate::new("secret");
        assert!(gate.check("secret"));
        assert!(!gate.check("Secret"));
        assert!(!gate.check(""));
    }
}
