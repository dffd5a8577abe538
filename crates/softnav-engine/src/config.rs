//! Navigation configuration
//!
//! Every selector, class name and timing constant the behavior layer
//! depends on. Defaults match the site markup; a JSON file can override
//! any subset of fields.

use serde::{Deserialize, Serialize};
use softnav_dom::{SelectorError, SelectorList};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector for `{field}`: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Marker class names toggled by the behavior layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassNames {
    /// Current nav link
    pub active: String,
    /// Revealed `.fade-up` element
    pub visible: String,
    /// Header after scrolling
    pub scrolled: String,
    /// Open mobile toggle/panel/overlay
    pub open: String,
    /// Nav while a soft navigation is in flight
    pub navigating: String,
    /// Nav with a positioned pill
    pub has_active_pill: String,
    /// Outgoing content region
    pub transition_out: String,
    /// Incoming content region, for one frame
    pub transition_in: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: "active".into(),
            visible: "visible".into(),
            scrolled: "scrolled".into(),
            open: "open".into(),
            navigating: "is-navigating".into(),
            has_active_pill: "has-active-pill".into(),
            transition_out: "page-transition-out".into(),
            transition_in: "page-transition-in".into(),
        }
    }
}

/// Behavior-layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// `id` of the swappable content region
    pub content_region_id: String,
    /// Exit-transition delay before fetching, in milliseconds
    pub transition_ms: u64,
    /// Document a bare directory path maps to
    pub index_document: String,

    pub link_selector: String,
    pub nav_selector: String,
    /// Links that take part in active-state tracking
    pub nav_link_selector: String,
    /// Desktop links that drive the pill indicator
    pub pill_link_selector: String,
    pub header_selector: String,
    pub toggle_selector: String,
    pub mobile_nav_selector: String,
    pub overlay_selector: String,
    pub reveal_selector: String,

    /// Fraction of an element that must be visible to reveal it
    pub reveal_threshold: f32,
    /// Pixels shaved off the bottom of the viewport for reveal checks
    pub reveal_bottom_margin: f32,
    /// Scroll offset above which the header is `scrolled`
    pub header_scroll_threshold: f32,
    /// Viewport width at or below which the pill is not positioned
    pub pill_breakpoint: f32,

    pub classes: ClassNames,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            content_region_id: "page-content".into(),
            transition_ms: 260,
            index_document: "index.html".into(),
            link_selector: "a[href]".into(),
            nav_selector: ".nav-links".into(),
            nav_link_selector: ".nav-links a:not(.nav-cta), .mobile-nav a".into(),
            pill_link_selector: ".nav-links a:not(.nav-cta)".into(),
            header_selector: ".site-header".into(),
            toggle_selector: ".nav-toggle".into(),
            mobile_nav_selector: ".mobile-nav".into(),
            overlay_selector: ".nav-overlay".into(),
            reveal_selector: ".fade-up".into(),
            reveal_threshold: 0.15,
            reveal_bottom_margin: 40.0,
            header_scroll_threshold: 10.0,
            pill_breakpoint: 900.0,
            classes: ClassNames::default(),
        }
    }
}

/// Selectors compiled from a [`NavConfig`]
#[derive(Debug, Clone)]
pub struct Selectors {
    pub link: SelectorList,
    pub nav: SelectorList,
    pub nav_links: SelectorList,
    pub pill_links: SelectorList,
    pub header: SelectorList,
    pub toggle: SelectorList,
    pub mobile_nav: SelectorList,
    pub overlay: SelectorList,
    pub reveal: SelectorList,
}

impl NavConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.compile()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Exit-transition delay
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Validate values and compile selectors
    pub fn compile(&self) -> Result<Selectors, ConfigError> {
        if self.content_region_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "content_region_id",
                reason: "must not be empty".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::Invalid {
                field: "reveal_threshold",
                reason: format!("{} is outside [0, 1]", self.reveal_threshold),
            });
        }
        if self.reveal_bottom_margin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "reveal_bottom_margin",
                reason: "must not be negative".into(),
            });
        }

        let parse = |field: &'static str, source: &str| {
            SelectorList::parse(source).map_err(|source| ConfigError::Selector { field, source })
        };
        Ok(Selectors {
            link: parse("link_selector", &self.link_selector)?,
            nav: parse("nav_selector", &self.nav_selector)?,
            nav_links: parse("nav_link_selector", &self.nav_link_selector)?,
            pill_links: parse("pill_link_selector", &self.pill_link_selector)?,
            header: parse("header_selector", &self.header_selector)?,
            toggle: parse("toggle_selector", &self.toggle_selector)?,
            mobile_nav: parse("mobile_nav_selector", &self.mobile_nav_selector)?,
            overlay: parse("overlay_selector", &self.overlay_selector)?,
            reveal: parse("reveal_selector", &self.reveal_selector)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_compile() {
        let config = NavConfig::default();
        assert!(config.compile().is_ok());
        assert_eq!(config.transition_delay(), Duration::from_millis(260));
        assert_eq!(config.classes.navigating, "is-navigating");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NavConfig::from_json_str(
            r#"{ "content_region_id": "main", "classes": { "active": "current" } }"#,
        )
        .unwrap();
        assert_eq!(config.content_region_id, "main");
        assert_eq!(config.classes.active, "current");
        assert_eq!(config.classes.visible, "visible");
        assert_eq!(config.reveal_threshold, 0.15);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            NavConfig::from_json_str(r#"{ "reveal_threshold": 1.5 }"#),
            Err(ConfigError::Invalid { field: "reveal_threshold", .. })
        ));
        assert!(matches!(
            NavConfig::from_json_str(r#"{ "content_region_id": " " }"#),
            Err(ConfigError::Invalid { field: "content_region_id", .. })
        ));
        assert!(matches!(
            NavConfig::from_json_str(r#"{ "reveal_selector": ".fade-up:hover" }"#),
            Err(ConfigError::Selector { field: "reveal_selector", .. })
        ));
        assert!(matches!(
            NavConfig::from_json_str(r#"{ "unknown": true }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
