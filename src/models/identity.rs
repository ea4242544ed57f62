//! Canonical identity record produced by provider adapters.

use std::fmt;
use std::str::FromStr;

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "facebook" => Ok(Provider::Facebook),
            _ => Err(()),
        }
    }
}

/// Remote identity normalized from a provider's raw payload.
///
/// Each provider adapter maps its own field names (Google's
/// `given_name`/`family_name`, Facebook's single `name`) into this record
/// before it reaches the upsert logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    pub provider: Provider,
    /// Provider-issued user id
    pub provider_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

impl RemoteIdentity {
    /// Display name for the local account ("first last", trimmed).
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_str() {
        assert_eq!("google".parse(), Ok(Provider::Google));
        assert_eq!("facebook".parse(), Ok(Provider::Facebook));
        assert!(Provider::from_str("twitter").is_err());
    }

    #[test]
    fn full_name_trims_missing_last_name() {
        let identity = RemoteIdentity {
            provider: Provider::Facebook,
            provider_id: "1".to_string(),
            email: "solo@example.com".to_string(),
            first_name: "Cher".to_string(),
            last_name: String::new(),
            avatar_url: None,
        };
        assert_eq!(identity.full_name(), "Cher");
    }
}
