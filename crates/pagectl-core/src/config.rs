#![forbid(unsafe_code)]

//! Named timing and threshold values for every controller component.
//!
//! All delays that sequence visual transitions live here instead of being
//! scattered as literals, so tests can reason about them on a virtual clock
//! and a site can retune them without code changes.
//!
//! # Loading
//!
//! With the `config` feature, [`SiteConfig`] can be loaded from JSON (the
//! wasm binding passes its init options this way) or TOML. Durations are
//! integer milliseconds; missing keys keep their defaults.
//!
//! ```json
//! { "nav": { "breakpoint_px": 900 }, "filter": { "transition_ms": 250 } }
//! ```
//!
//! # Defaults
//!
//! `SiteConfig::default()` reproduces the behavior the markup and style sheet
//! were authored against.

use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::capability::ObserverOptions;
use crate::error::ConfigError;

/// Top-level configuration for the page controller.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SiteConfig {
    pub nav: NavConfig,
    pub scroll: ScrollConfig,
    pub viewport: ViewportConfig,
    pub form: FormConfig,
    pub filter: FilterConfig,
    pub anchor: AnchorConfig,
    pub offline: OfflineConfig,
}

impl SiteConfig {
    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Return `self` if valid, otherwise every violation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters. Returns a list of human-readable violations.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.nav.breakpoint_px == 0 {
            errors.push("nav.breakpoint_px must be > 0".into());
        }
        if !(self.scroll.cta_viewport_fraction > 0.0 && self.scroll.cta_viewport_fraction <= 1.0) {
            errors.push(format!(
                "scroll.cta_viewport_fraction must be in (0, 1], got {}",
                self.scroll.cta_viewport_fraction
            ));
        }
        if self.scroll.header_elevation_px < 0.0 {
            errors.push(format!(
                "scroll.header_elevation_px must be >= 0, got {}",
                self.scroll.header_elevation_px
            ));
        }
        for (name, threshold) in [
            ("viewport.lazy_threshold", self.viewport.lazy_threshold),
            ("viewport.reveal_threshold", self.viewport.reveal_threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                errors.push(format!("{name} must be in [0, 1], got {threshold}"));
            }
        }
        if self.filter.transition.is_zero() {
            errors.push("filter.transition_ms must be > 0".into());
        }
        if self.filter.announcement_lifetime.is_zero() {
            errors.push("filter.announcement_lifetime_ms must be > 0".into());
        }
        if self.offline.worker_url.is_empty() {
            errors.push("offline.worker_url must not be empty".into());
        }

        errors
    }
}

/// Navigation menu and dropdown parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NavConfig {
    /// Widest viewport (inclusive, CSS px) treated as narrow/mobile.
    pub breakpoint_px: u32,
    /// Accessible label of the menu button while the menu is closed.
    pub open_label: String,
    /// Accessible label of the menu button while the menu is open.
    pub close_label: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 768,
            open_label: "Open menu".into(),
            close_label: "Close menu".into(),
        }
    }
}

impl NavConfig {
    /// Whether `viewport_width` is in narrow (mobile) mode.
    #[must_use]
    pub fn is_narrow(&self, viewport_width: f64) -> bool {
        viewport_width <= f64::from(self.breakpoint_px)
    }
}

/// Scroll-linked visibility parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScrollConfig {
    /// Sticky call-to-action shows once scroll offset exceeds this fraction
    /// of the viewport height.
    pub cta_viewport_fraction: f64,
    /// Header switches to the raised shadow past this offset (px).
    pub header_elevation_px: f64,
    /// Quiet window for header elevation updates.
    #[cfg_attr(feature = "config", serde(rename = "header_debounce_ms", with = "millis"))]
    pub header_debounce: Duration,
    /// Header shadow while at the top of the page.
    pub header_shadow_resting: String,
    /// Header shadow once scrolled past the elevation threshold.
    pub header_shadow_raised: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            cta_viewport_fraction: 0.5,
            header_elevation_px: 50.0,
            header_debounce: Duration::from_millis(10),
            header_shadow_resting: "0 4px 6px rgba(0, 0, 0, 0.1)".into(),
            header_shadow_raised: "0 4px 20px rgba(0, 0, 0, 0.15)".into(),
        }
    }
}

/// Viewport intersection parameters for lazy images and entrance reveals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewportConfig {
    pub lazy_root_margin: String,
    pub lazy_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_threshold: f64,
    /// Transform applied before an element has entered.
    pub reveal_offset: String,
    /// Duration of the entrance transition.
    #[cfg_attr(feature = "config", serde(rename = "reveal_duration_ms", with = "millis"))]
    pub reveal_duration: Duration,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            lazy_root_margin: "50px 0px".into(),
            lazy_threshold: 0.01,
            reveal_root_margin: "0px 0px -50px 0px".into(),
            reveal_threshold: 0.1,
            reveal_offset: "translateY(20px)".into(),
            reveal_duration: Duration::from_millis(500),
        }
    }
}

impl ViewportConfig {
    #[must_use]
    pub fn lazy_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: self.lazy_root_margin.clone(),
            threshold: self.lazy_threshold,
        }
    }

    #[must_use]
    pub fn reveal_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: self.reveal_root_margin.clone(),
            threshold: self.reveal_threshold,
        }
    }

    /// CSS `transition` declaration for reveal targets.
    #[must_use]
    pub fn reveal_transition(&self) -> String {
        let ms = self.reveal_duration.as_millis();
        format!("opacity {ms}ms ease, transform {ms}ms ease")
    }
}

/// Contact form submission parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FormConfig {
    /// Delay standing in for the remote round trip.
    #[cfg_attr(feature = "config", serde(rename = "submission_delay_ms", with = "millis"))]
    pub submission_delay: Duration,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submission_delay: Duration::from_millis(1000),
            success_message:
                "Thank you for your quote request! We will contact you within 24 hours.".into(),
            failure_message: "Sorry, we could not send your request. Please call us instead."
                .into(),
        }
    }
}

/// Gallery filter parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FilterConfig {
    /// The one transition duration for gallery items: emitted as the CSS
    /// transition and used as the hide-collapse delay.
    #[cfg_attr(feature = "config", serde(rename = "transition_ms", with = "millis"))]
    pub transition: Duration,
    /// Delay between un-hiding an item and starting its fade-in.
    #[cfg_attr(feature = "config", serde(rename = "show_delay_ms", with = "millis"))]
    pub show_delay: Duration,
    /// How long a status announcement stays in the document.
    #[cfg_attr(
        feature = "config",
        serde(rename = "announcement_lifetime_ms", with = "millis")
    )]
    pub announcement_lifetime: Duration,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(300),
            show_delay: Duration::from_millis(10),
            announcement_lifetime: Duration::from_millis(1000),
        }
    }
}

impl FilterConfig {
    /// CSS `transition` declaration for gallery items.
    #[must_use]
    pub fn item_transition(&self) -> String {
        let ms = self.transition.as_millis();
        format!("opacity {ms}ms ease, transform {ms}ms ease")
    }
}

/// In-page anchor navigation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AnchorConfig {
    /// Gap left between the sticky header and the scrolled-to target (px).
    pub scroll_margin_px: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            scroll_margin_px: 20.0,
        }
    }
}

/// Offline-support registration parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OfflineConfig {
    pub worker_url: String,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            worker_url: "/sw.js".into(),
        }
    }
}

#[cfg(feature = "config")]
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(SiteConfig::default().validate().is_empty());
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let nav = NavConfig::default();
        assert!(nav.is_narrow(768.0));
        assert!(!nav.is_narrow(769.0));
    }

    #[test]
    fn filter_transition_drives_css_declaration() {
        let filter = FilterConfig {
            transition: Duration::from_millis(250),
            ..FilterConfig::default()
        };
        assert_eq!(
            filter.item_transition(),
            "opacity 250ms ease, transform 250ms ease"
        );
    }

    #[test]
    fn validate_collects_every_violation() {
        let mut config = SiteConfig::default();
        config.nav.breakpoint_px = 0;
        config.viewport.reveal_threshold = 1.5;
        config.filter.transition = Duration::ZERO;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(v)) if v.len() == 3
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_overrides_merge_with_defaults() {
        let config = SiteConfig::from_json_str(
            r#"{ "nav": { "breakpoint_px": 900 }, "filter": { "transition_ms": 250 } }"#,
        )
        .unwrap();
        assert_eq!(config.nav.breakpoint_px, 900);
        assert_eq!(config.nav.open_label, "Open menu");
        assert_eq!(config.filter.transition, Duration::from_millis(250));
        assert_eq!(config.filter.show_delay, Duration::from_millis(10));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_loads_and_validates() {
        let config = SiteConfig::from_toml_str(
            "[scroll]\nheader_elevation_px = 80.0\n\n[form]\nsubmission_delay_ms = 250\n",
        )
        .unwrap();
        assert_eq!(config.scroll.header_elevation_px, 80.0);
        assert_eq!(config.form.submission_delay, Duration::from_millis(250));

        let err = SiteConfig::from_toml_str("[offline]\nworker_url = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
