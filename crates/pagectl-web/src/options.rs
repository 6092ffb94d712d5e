#![forbid(unsafe_code)]

//! Init options accepted by `startPageController`.
//!
//! The page passes a plain object; the binding serializes it to JSON and
//! parses it here so the same rules apply on every target.
//!
//! ```json
//! { "reducedMotion": true, "config": { "filter": { "transition_ms": 250 } } }
//! ```
//!
//! Keys accept both camelCase and snake_case spellings. Unknown keys are
//! ignored.

use pagectl_core::SiteConfig;
use serde_json::{Map, Value};

use crate::error::WebBindError;

/// Parsed init options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitOptions {
    pub config: SiteConfig,
    /// Forces the motion preference instead of querying the media query.
    pub reduced_motion: Option<bool>,
}

impl InitOptions {
    /// Parse options from their JSON text. Empty text, `null` and
    /// `undefined` select the defaults.
    pub fn from_json(text: &str) -> Result<Self, WebBindError> {
        let text = text.trim();
        if text.is_empty() || text == "null" || text == "undefined" {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(text)
            .map_err(|e| WebBindError::InvalidOptions(e.to_string()))?;
        let Value::Object(obj) = value else {
            return Err(WebBindError::InvalidOptions(
                "expected an object".to_owned(),
            ));
        };

        let config = match obj.get("config") {
            None | Some(Value::Null) => SiteConfig::default(),
            Some(section @ Value::Object(_)) => SiteConfig::from_json_str(&section.to_string())?,
            Some(_) => {
                return Err(WebBindError::InvalidOptions(
                    "config must be an object".to_owned(),
                ));
            }
        };
        let reduced_motion = match parse_bool(&obj, "reducedMotion")? {
            Some(v) => Some(v),
            None => parse_bool(&obj, "reduced_motion")?,
        };

        Ok(Self {
            config,
            reduced_motion,
        })
    }
}

fn parse_bool(obj: &Map<String, Value>, key: &str) -> Result<Option<bool>, WebBindError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(v)) => Ok(Some(*v)),
        Some(other) => Err(WebBindError::InvalidOptions(format!(
            "{key} must be a boolean, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn absent_options_select_defaults() {
        for text in ["", "  ", "null", "undefined", "{}"] {
            assert_eq!(InitOptions::from_json(text).unwrap(), InitOptions::default());
        }
    }

    #[test]
    fn both_spellings_of_reduced_motion() {
        let camel = InitOptions::from_json(r#"{"reducedMotion": true}"#).unwrap();
        assert_eq!(camel.reduced_motion, Some(true));
        let snake = InitOptions::from_json(r#"{"reduced_motion": false}"#).unwrap();
        assert_eq!(snake.reduced_motion, Some(false));
        let both =
            InitOptions::from_json(r#"{"reducedMotion": false, "reduced_motion": true}"#).unwrap();
        assert_eq!(both.reduced_motion, Some(false));
    }

    #[test]
    fn config_section_overrides_defaults() {
        let opts = InitOptions::from_json(
            r#"{"config": {"nav": {"breakpoint_px": 900}, "filter": {"transition_ms": 250}}}"#,
        )
        .unwrap();
        assert_eq!(opts.config.nav.breakpoint_px, 900);
        assert_eq!(opts.config.filter.transition, Duration::from_millis(250));
        assert_eq!(opts.config.scroll, SiteConfig::default().scroll);
    }

    #[test]
    fn invalid_config_is_reported() {
        let err = InitOptions::from_json(r#"{"config": {"nav": {"breakpoint_px": 0}}}"#)
            .unwrap_err();
        assert!(matches!(err, WebBindError::Config(_)));
        assert!(err.to_string().contains("breakpoint_px"));
    }

    #[test]
    fn mistyped_options_are_rejected() {
        for text in [
            "[1, 2]",
            r#"{"reducedMotion": "yes"}"#,
            r#"{"config": 3}"#,
            "{not json",
        ] {
            let err = InitOptions::from_json(text).unwrap_err();
            assert!(
                matches!(err, WebBindError::InvalidOptions(_)),
                "{text}: {err}"
            );
        }
    }
}
