//! WorkflowHub API token lookup.
//!
//! The token comes from the `WORKFLOWHUB_API_TOKEN` environment variable,
//! the same place the operator's account settings page tells them to export
//! it. It is never persisted and never printed unmasked.

use std::fmt;

use crate::error::{Error, Result};

/// Environment variable holding the WorkflowHub API token.
pub const WORKFLOWHUB_API_TOKEN: &str = "WORKFLOWHUB_API_TOKEN";

/// A WorkflowHub API token.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap an already-obtained token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the token from the environment.
    pub fn from_env() -> Result<Self> {
        match std::env::var(WORKFLOWHUB_API_TOKEN) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value)),
            _ => Err(Error::Credential(format!(
                "Environment variable {} is not set",
                WORKFLOWHUB_API_TOKEN
            ))),
        }
    }

    /// Whether a token is present in the environment.
    pub fn is_configured() -> bool {
        Self::from_env().is_ok()
    }

    /// The raw token value, for the authorization header only.
    pub fn reveal(&self) -> &str {
        &self.0
    }

    /// Masked form for display.
    pub fn masked(&self) -> String {
        mask_value(&self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&"[REDACTED]").finish()
    }
}

/// Mask a credential value for display.
pub fn mask_value(value: &str) -> String {
    if value.len() <= 4 {
        "*".repeat(value.len())
    } else {
        format!("{}...{}", &value[..2], &value[value.len() - 2..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("ab"), "**");
        assert_eq!(mask_value("abcd"), "****");
        assert_eq!(mask_value("abcde"), "ab...de");
        assert_eq!(mask_value("secret123"), "se...23");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = ApiToken("very-secret".to_string());
        let formatted = format!("{:?}", token);
        assert!(formatted.contains("REDACTED"));
        assert!(!formatted.contains("very-secret"));
    }

    #[test]
    fn test_from_env_roundtrip() {
        std::env::set_var(WORKFLOWHUB_API_TOKEN, "tok-12345");
        let token = ApiToken::from_env().unwrap();
        assert_eq!(token.reveal(), "tok-12345");
        assert_eq!(token.masked(), "to...45");
        assert!(ApiToken::is_configured());

        std::env::remove_var(WORKFLOWHUB_API_TOKEN);
        assert!(ApiToken::from_env().is_err());
        assert!(!ApiToken::is_configured());
    }
}
