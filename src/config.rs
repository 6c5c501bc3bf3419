use crate::error::ConfigError;
use crate::event::ModifierKey;

/// Default fraction of each edge distance applied per zoom step.
pub const DEFAULT_ZOOM_AMOUNT: f64 = 0.02;
/// Default pinch pan/zoom tolerance window in pixels.
pub const DEFAULT_PINCH_TOLERANCE: f64 = 2.0;
/// Default smallest extent a viewport may have on either axis.
pub const DEFAULT_MIN_EXTENT: f64 = 1e-12;

/// Tunables for the viewport gesture engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Fraction of the midpoint-to-edge distance moved by one zoom step.
    pub zoom_amount: f64,
    /// Pixel window within which a two-finger gesture counts as a pan.
    pub pinch_tolerance: f64,
    /// Smallest extent a viewport may have on either axis.
    pub min_extent: f64,
    /// Modifier that switches mouse drags from panning to marquee select.
    pub marquee_modifier: ModifierKey,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom_amount: DEFAULT_ZOOM_AMOUNT,
            pinch_tolerance: DEFAULT_PINCH_TOLERANCE,
            min_extent: DEFAULT_MIN_EXTENT,
            marquee_modifier: ModifierKey::Shift,
        }
    }
}

impl EngineConfig {
    /// Set the zoom step fraction.
    pub fn with_zoom_amount(mut self, zoom_amount: f64) -> Self {
        self.zoom_amount = zoom_amount;
        self
    }

    /// Set the pinch tolerance window in pixels.
    pub fn with_pinch_tolerance(mut self, pinch_tolerance: f64) -> Self {
        self.pinch_tolerance = pinch_tolerance;
        self
    }

    /// Set the minimum viewport extent.
    pub fn with_min_extent(mut self, min_extent: f64) -> Self {
        self.min_extent = min_extent;
        self
    }

    /// Set the modifier that selects marquee mode.
    pub fn with_marquee_modifier(mut self, modifier: ModifierKey) -> Self {
        self.marquee_modifier = modifier;
        self
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_amount > 0.0 && self.zoom_amount < 1.0) {
            return Err(ConfigError::ZoomAmount(self.zoom_amount));
        }
        if !(self.pinch_tolerance.is_finite() && self.pinch_tolerance >= 0.0) {
            return Err(ConfigError::PinchTolerance(self.pinch_tolerance));
        }
        if !(self.min_extent.is_finite() && self.min_extent >= 0.0) {
            return Err(ConfigError::MinExtent(self.min_extent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.zoom_amount, 0.02);
        assert_eq!(config.pinch_tolerance, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = EngineConfig::default().with_zoom_amount(1.5);
        assert_eq!(config.validate(), Err(ConfigError::ZoomAmount(1.5)));
        let config = EngineConfig::default().with_pinch_tolerance(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::PinchTolerance(-1.0)));
        let config = EngineConfig::default().with_min_extent(f64::INFINITY);
        assert!(matches!(config.validate(), Err(ConfigError::MinExtent(_))));
        let config = EngineConfig::default().with_zoom_amount(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::ZoomAmount(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "pinch_tolerance": 4.0, "marquee_modifier": "Ctrl" }"#)
                .expect("config parses");
        assert_eq!(config.pinch_tolerance, 4.0);
        assert_eq!(config.zoom_amount, DEFAULT_ZOOM_AMOUNT);
        assert_eq!(config.marquee_modifier, ModifierKey::Ctrl);
    }
}
