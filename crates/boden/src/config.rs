//! Configuration of a UI context.
//!
//! Every field has a default, so an empty document is a valid
//! configuration:
//!
//! ```
//! use boden::config::UiConfig;
//!
//! let config = UiConfig::from_toml_str("[layout]\nepsilon = 0.5\n").unwrap();
//! assert_eq!(config.layout.epsilon, 0.5);
//! assert_eq!(config.headless.em_dips, 23.0);
//! ```

use boden_core::{BodenError, Margin, Rect, Result, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub layout: LayoutConfig,
    pub headless: HeadlessConfig,
}

impl UiConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BodenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| BodenError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.layout.epsilon.is_finite() && self.layout.epsilon >= 0.0) {
            return Err(BodenError::Config(format!(
                "layout.epsilon must be a non-negative number, got {}",
                self.layout.epsilon
            )));
        }
        if !(self.headless.pixels_per_dip.is_finite() && self.headless.pixels_per_dip > 0.0) {
            return Err(BodenError::Config(format!(
                "headless.pixels_per_dip must be positive, got {}",
                self.headless.pixels_per_dip
            )));
        }
        Ok(())
    }
}

/// Tunables of the layout algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Differences below this many DIPs are treated as rounding noise.
    pub epsilon: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { epsilon: 0.01 }
    }
}

/// Metrics of the headless backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub pixels_per_dip: f64,
    /// Size of one `em`.
    pub em_dips: f64,
    /// Size of one `sem` (the system font's em).
    pub sem_dips: f64,
    /// Advance of every character of the virtual font.
    pub char_width: f64,
    pub line_height: f64,
    pub vertical_scrollbar_width: f64,
    pub horizontal_scrollbar_height: f64,
    pub window_border: Margin,
    pub min_window_size: Size,
    pub screen_area: Rect,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            pixels_per_dip: 3.0,
            em_dips: 23.0,
            sem_dips: 20.0,
            char_width: 9.75,
            line_height: 19.667,
            vertical_scrollbar_width: 15.0,
            horizontal_scrollbar_height: 15.0,
            window_border: Margin::new(20.0, 11.0, 12.0, 13.0),
            min_window_size: Size::new(100.0, 32.0),
            screen_area: Rect::new(0.0, 0.0, 1920.0, 1080.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(UiConfig::from_toml_str("").unwrap(), UiConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = UiConfig::from_toml_str(
            r#"
            [headless]
            pixels_per_dip = 2.0
            window_border = { left = 1.0, top = 2.0, right = 3.0, bottom = 4.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.headless.pixels_per_dip, 2.0);
        assert_eq!(config.headless.window_border, Margin::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(config.headless.char_width, 9.75);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_round_trip_through_text() {
        let mut config = UiConfig::default();
        config.layout.epsilon = 0.25;
        let text = config.to_toml_string().unwrap();
        assert_eq!(UiConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        let err = UiConfig::from_toml_str("[layout]\nepsilon = -1.0\n").unwrap_err();
        assert!(matches!(err, BodenError::Config(_)));

        let err = UiConfig::from_toml_str("[headless]\npixels_per_dip = 0.0\n").unwrap_err();
        assert!(matches!(err, BodenError::Config(_)));

        let err = UiConfig::from_toml_str("[layout\n").unwrap_err();
        assert!(matches!(err, BodenError::Config(_)));
    }
}
