//! Process environment captured once at start-up.
//!
//! The publishing code never calls `std::env` itself; the CLI bootstrap takes a
//! snapshot here and passes the values it needs down explicitly.

use std::collections::HashMap;

use crate::error::{PreconditionError, Result};

/// Environment variable holding the GitHub access token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Immutable snapshot of the process environment
#[derive(Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs (used by tests)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a variable, treating empty values as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }

    /// The GitHub access token, required before any other work happens
    pub fn github_token(&self) -> Result<String> {
        self.get(GITHUB_TOKEN_VAR).ok_or_else(|| {
            PreconditionError::MissingCredential {
                variable: GITHUB_TOKEN_VAR.to_string(),
            }
            .into()
        })
    }
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may hold credentials
        f.debug_struct("EnvConfig")
            .field("vars", &self.vars.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[test]
    fn test_github_token_present() {
        let env = EnvConfig::from_pairs([(GITHUB_TOKEN_VAR, "ghp_abc")]);
        assert_eq!(env.github_token().unwrap(), "ghp_abc");
    }

    #[test]
    fn test_github_token_missing() {
        let env = EnvConfig::from_pairs(Vec::<(String, String)>::new());
        assert!(matches!(
            env.github_token(),
            Err(ReleaseError::Precondition(PreconditionError::MissingCredential { .. }))
        ));
    }

    #[test]
    fn test_github_token_empty_is_missing() {
        let env = EnvConfig::from_pairs([(GITHUB_TOKEN_VAR, "  ")]);
        assert!(env.github_token().is_err());
    }

    #[test]
    fn test_debug_does_not_leak_values() {
        let env = EnvConfig::from_pairs([(GITHUB_TOKEN_VAR, "ghp_secret")]);
        assert!(!format!("{env:?}").contains("ghp_secret"));
    }
}
