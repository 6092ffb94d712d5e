#![forbid(unsafe_code)]

//! Errors raised while binding the controller to a live document.

use std::fmt;

use pagectl_core::ConfigError;

/// Why the browser binding could not start or had to degrade.
#[derive(Debug)]
pub enum WebBindError {
    /// A global the binding needs (`window`, `document`, `body`) is absent.
    MissingGlobal(&'static str),
    /// Init options were not a JSON object or had a mistyped key.
    InvalidOptions(String),
    /// The `config` section failed to parse or validate.
    Config(ConfigError),
    /// A browser API threw.
    Js(String),
}

impl fmt::Display for WebBindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGlobal(name) => write!(f, "missing browser global: {name}"),
            Self::InvalidOptions(msg) => write!(f, "invalid init options: {msg}"),
            Self::Config(e) => write!(f, "invalid site config: {e}"),
            Self::Js(msg) => write!(f, "browser API error: {msg}"),
        }
    }
}

impl std::error::Error for WebBindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebBindError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
