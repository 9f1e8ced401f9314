//! Transparency representation for CAD entities

use std::fmt;

/// Represents entity transparency
///
/// - 0 = fully opaque (0% transparent)
/// - 255 = fully transparent (100% transparent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Transparency(u8);

impl Transparency {
    /// Fully opaque (0% transparent)
    pub const OPAQUE: Transparency = Transparency(0);

    /// Fully transparent (100% transparent)
    pub const TRANSPARENT: Transparency = Transparency(255);

    /// Create transparency from a percentage (0.0 = opaque, 1.0 = transparent)
    pub fn from_percent(percent: f64) -> Self {
        Transparency((percent.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Create transparency from an opacity/alpha value (1.0 = opaque)
    pub fn from_alpha(alpha: f64) -> Self {
        if alpha.is_nan() {
            return Transparency::OPAQUE;
        }
        Self::from_percent(1.0 - alpha)
    }

    /// Get the raw value (0-255)
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Get transparency as a percentage (0.0 = opaque, 1.0 = transparent)
    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 255.0
    }

    /// Check if fully opaque
    pub const fn is_opaque(&self) -> bool {
        self.0 == 0
    }

    /// Check if fully transparent
    pub const fn is_transparent(&self) -> bool {
        self.0 == 255
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.as_percent() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparency_from_alpha() {
        assert_eq!(Transparency::from_alpha(1.0), Transparency::OPAQUE);
        assert_eq!(Transparency::from_alpha(0.0), Transparency::TRANSPARENT);
        assert_eq!(Transparency::from_alpha(0.5).value(), 128);
        assert_eq!(Transparency::from_alpha(f64::NAN), Transparency::OPAQUE);
    }

    #[test]
    fn test_transparency_checks() {
        assert!(Transparency::OPAQUE.is_opaque());
        assert!(Transparency::TRANSPARENT.is_transparent());
        assert!(!Transparency::from_alpha(0.5).is_opaque());
    }

    #[test]
    fn test_transparency_display() {
        assert_eq!(Transparency::OPAQUE.to_string(), "0.0%");
        assert_eq!(Transparency::TRANSPARENT.to_string(), "100.0%");
    }
}
