//! Render session configuration

use crate::document::InsertionUnits;
use crate::tables::Layer;

/// How host colors become entity colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Nearest AutoCAD Color Index; pure black becomes index 7
    #[default]
    Indexed,
    /// 24-bit true color
    TrueColor,
}

/// What happens to host alpha and opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaPolicy {
    /// `alpha * opacity` becomes the entity transparency
    #[default]
    Transparency,
    /// Everything is emitted opaque
    Drop,
}

/// How text is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Native TEXT entities
    #[default]
    Native,
    /// Glyph outlines from the session's outline provider, native text
    /// when the provider does not know the font
    Outline,
}

/// Configuration of one render session
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Canvas width in host units
    pub canvas_width: f64,
    /// Canvas height in host units
    pub canvas_height: f64,
    /// Host units per inch
    pub dpi: f64,
    /// Maximum flattening deviation in document units
    pub tolerance: f64,
    /// Document units per host unit
    pub units_scale: f64,
    /// Document insertion units
    pub insertion_units: InsertionUnits,
    /// Color policy
    pub color_mode: ColorMode,
    /// Alpha policy
    pub alpha_policy: AlphaPolicy,
    /// Text policy
    pub text_mode: TextMode,
    /// Emit curves as SPLINE entities when they are not clipped
    pub native_splines: bool,
    /// Route each open group to a layer of the same name
    pub layer_per_group: bool,
    /// Layer used when nothing else is selected
    pub default_layer: String,
    /// Global linetype scale written to `$LTSCALE`
    pub linetype_scale: f64,
    /// Size of one image pixel in document units, recorded on image definitions
    pub image_pixel_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            canvas_width: 640.0,
            canvas_height: 480.0,
            dpi: 72.0,
            tolerance: 0.01,
            units_scale: 1.0,
            insertion_units: InsertionUnits::default(),
            color_mode: ColorMode::default(),
            alpha_policy: AlphaPolicy::default(),
            text_mode: TextMode::default(),
            native_splines: false,
            layer_per_group: false,
            default_layer: Layer::DEFAULT_NAME.to_string(),
            linetype_scale: 1.0,
            image_pixel_size: 1.0,
        }
    }
}

impl RenderConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: canvas size in host units
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Builder: host resolution
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Builder: flattening tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder: document units per host unit
    pub fn with_units_scale(mut self, scale: f64) -> Self {
        self.units_scale = scale;
        self
    }

    /// Builder: insertion units
    pub fn with_insertion_units(mut self, units: InsertionUnits) -> Self {
        self.insertion_units = units;
        self
    }

    /// Builder: color policy
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Builder: alpha policy
    pub fn with_alpha_policy(mut self, policy: AlphaPolicy) -> Self {
        self.alpha_policy = policy;
        self
    }

    /// Builder: text policy
    pub fn with_text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = mode;
        self
    }

    /// Builder: native spline output
    pub fn with_native_splines(mut self, enabled: bool) -> Self {
        self.native_splines = enabled;
        self
    }

    /// Builder: one layer per group
    pub fn with_layer_per_group(mut self, enabled: bool) -> Self {
        self.layer_per_group = enabled;
        self
    }

    /// Builder: default layer name
    pub fn with_default_layer(mut self, name: impl Into<String>) -> Self {
        self.default_layer = name.into();
        self
    }

    /// Builder: linetype scale
    pub fn with_linetype_scale(mut self, scale: f64) -> Self {
        self.linetype_scale = scale;
        self
    }

    /// Builder: image pixel size
    pub fn with_image_pixel_size(mut self, size: f64) -> Self {
        self.image_pixel_size = size;
        self
    }

    /// Convert a length in points to document units
    pub fn points_to_units(&self, points: f64) -> f64 {
        points / 72.0 * self.dpi * self.units_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.color_mode, ColorMode::Indexed);
        assert_eq!(config.alpha_policy, AlphaPolicy::Transparency);
        assert_eq!(config.default_layer, "0");
    }

    #[test]
    fn test_points_to_units() {
        let config = RenderConfig::new().with_dpi(144.0).with_units_scale(0.5);
        assert!((config.points_to_units(72.0) - 72.0).abs() < 1e-12);
        assert!((RenderConfig::new().points_to_units(10.0) - 10.0).abs() < 1e-12);
    }
}
