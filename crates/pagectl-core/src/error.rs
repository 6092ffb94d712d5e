#![forbid(unsafe_code)]

//! Error types shared across pagectl crates.
//!
//! Nothing in the controller is fatal. These errors exist so collaborators
//! and configuration loaders can report *why* they degraded; callers log them
//! and fall back to simpler behavior.

use std::fmt;

/// Failure reported by an injected collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The collaborator is not present in this environment.
    Unavailable(&'static str),
    /// The collaborator was present but refused the request.
    Rejected(String),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(what) => write!(f, "capability unavailable: {what}"),
            Self::Rejected(msg) => write!(f, "capability rejected request: {msg}"),
        }
    }
}

impl std::error::Error for CapabilityError {}

/// Errors loading or validating a [`SiteConfig`](crate::config::SiteConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        let e = CapabilityError::Unavailable("serviceWorker");
        assert_eq!(e.to_string(), "capability unavailable: serviceWorker");
        let e = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "validation errors: a; b");
    }
}
