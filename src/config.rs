//! Tunables shared by enumeration and window placement.

use crate::display::Dpi;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label used for metadata fields that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Distance a window may hang past the primary work area before it is
/// pulled back, in logical units.
pub const EDGE_MARGIN: f64 = 20.0;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Overhang tolerated by edge correction.
    pub edge_margin: f64,
    /// DPI reported when the per-monitor query fails.
    pub fallback_dpi: Dpi,
    /// Text substituted for missing manufacturer/model/serial values.
    pub unknown_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            edge_margin: EDGE_MARGIN,
            fallback_dpi: Dpi::default(),
            unknown_label: UNKNOWN.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_margin(mut self, margin: f64) -> Self {
        self.edge_margin = margin;
        self
    }

    pub fn with_fallback_dpi(mut self, dpi: Dpi) -> Self {
        self.fallback_dpi = dpi;
        self
    }

    pub fn with_unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.edge_margin, 20.0);
        assert_eq!(config.fallback_dpi, Dpi::new(96, 96));
        assert_eq!(config.unknown_label, "Unknown");
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_edge_margin(8.0)
            .with_fallback_dpi(Dpi::new(120, 120))
            .with_unknown_label("n/a");
        assert_eq!(config.edge_margin, 8.0);
        assert_eq!(config.fallback_dpi.x, 120);
        assert_eq!(config.unknown_label, "n/a");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{ "edge_margin": 4.0 }"#).unwrap();
        assert_eq!(config.edge_margin, 4.0);
        assert_eq!(config.unknown_label, "Unknown");
    }
}
