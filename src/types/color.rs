//! Color representation for CAD entities
//!
//! Includes the AutoCAD Color Index (ACI) palette so that arbitrary RGB
//! colors coming from a plotting host can be mapped onto indexed colors.

use once_cell::sync::Lazy;
use std::fmt;

/// Represents a color in a DXF drawing
///
/// Colors can be represented in multiple ways:
/// - By index (1-255): AutoCAD Color Index (ACI)
/// - By RGB values: True color
/// - By layer: Use the layer's color
/// - By block: Use the block's color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
    /// True color with RGB values
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a true color from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Get RGB values; indexed colors are looked up in the ACI palette
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb { r, g, b } => Some((*r, *g, *b)),
            Color::Index(i) => Some(aci_rgb(*i)),
            _ => None,
        }
    }

    /// Common color constants
    pub const RED: Color = Color::Index(1);
    pub const YELLOW: Color = Color::Index(2);
    pub const GREEN: Color = Color::Index(3);
    pub const CYAN: Color = Color::Index(4);
    pub const BLUE: Color = Color::Index(5);
    pub const MAGENTA: Color = Color::Index(6);
    pub const WHITE: Color = Color::Index(7);
    pub const GRAY: Color = Color::Index(8);
    pub const LIGHT_GRAY: Color = Color::Index(9);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}

/// The 256-entry ACI palette. Entry 0 (ByBlock) is black and never matched.
static ACI_PALETTE: Lazy<[(u8, u8, u8); 256]> = Lazy::new(build_palette);

fn build_palette() -> [(u8, u8, u8); 256] {
    let mut palette = [(0u8, 0u8, 0u8); 256];
    let fixed = [
        (255, 0, 0),
        (255, 255, 0),
        (0, 255, 0),
        (0, 255, 255),
        (0, 0, 255),
        (255, 0, 255),
        (255, 255, 255),
        (128, 128, 128),
        (192, 192, 192),
    ];
    palette[1..10].copy_from_slice(&fixed);

    // 10..=249: 24 hues in 15 degree steps, five value levels each, with a
    // full-saturation entry followed by a half-saturation entry.
    const VALUES: [f64; 5] = [255.0, 204.0, 153.0, 127.0, 76.0];
    for index in 10..250usize {
        let hue = ((index - 10) / 10) as f64 * 15.0;
        let step = (index - 10) % 10;
        let value = VALUES[step / 2];
        let saturation = if step % 2 == 0 { 1.0 } else { 0.5 };
        palette[index] = hsv_to_rgb(hue, saturation, value);
    }

    const GRAYS: [u8; 6] = [51, 91, 132, 173, 214, 255];
    for (offset, gray) in GRAYS.iter().enumerate() {
        palette[250 + offset] = (*gray, *gray, *gray);
    }
    palette
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let min = value * (1.0 - saturation);
    let sector = hue / 60.0;
    let rising = min + (value - min) * sector.fract();
    let falling = value - (value - min) * sector.fract();
    let (r, g, b) = match sector as u32 {
        0 => (value, rising, min),
        1 => (falling, value, min),
        2 => (min, value, rising),
        3 => (min, falling, value),
        4 => (rising, min, value),
        _ => (value, min, falling),
    };
    (r.floor() as u8, g.floor() as u8, b.floor() as u8)
}

/// RGB value of an ACI palette entry
pub fn aci_rgb(index: u8) -> (u8, u8, u8) {
    ACI_PALETTE[index as usize]
}

/// Find the ACI index (1-255) closest to the given RGB color
///
/// Distance is squared euclidean distance in RGB space; ties resolve to the
/// lowest index so the result is stable.
pub fn nearest_index(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 7u8;
    let mut best_distance = i32::MAX;
    for index in 1..=255u8 {
        let (pr, pg, pb) = ACI_PALETTE[index as usize];
        let dr = pr as i32 - r as i32;
        let dg = pg as i32 - g as i32;
        let db = pb as i32 - b as i32;
        let distance = dr * dr + dg * dg + db * db;
        if distance < best_distance {
            best_distance = distance;
            best = index;
            if distance == 0 {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb() {
        let color = Color::from_rgb(255, 128, 64);
        assert_eq!(color.rgb(), Some((255, 128, 64)));
        assert_eq!(Color::RED.rgb(), Some((255, 0, 0)));
        assert_eq!(Color::ByLayer.rgb(), None);
    }

    #[test]
    fn test_palette_known_entries() {
        assert_eq!(aci_rgb(10), (255, 0, 0));
        assert_eq!(aci_rgb(11), (255, 127, 127));
        assert_eq!(aci_rgb(13), (204, 102, 102));
        assert_eq!(aci_rgb(19), (76, 38, 38));
        assert_eq!(aci_rgb(20), (255, 63, 0));
        assert_eq!(aci_rgb(90), (0, 255, 0));
        assert_eq!(aci_rgb(250), (51, 51, 51));
        assert_eq!(aci_rgb(255), (255, 255, 255));
    }

    #[test]
    fn test_nearest_index_exact_and_ties() {
        assert_eq!(nearest_index(255, 0, 0), 1);
        assert_eq!(nearest_index(0, 0, 255), 5);
        // white exists at 7 and 255, lowest wins
        assert_eq!(nearest_index(255, 255, 255), 7);
        assert_eq!(nearest_index(128, 128, 128), 8);
    }

    #[test]
    fn test_nearest_index_off_palette() {
        assert_eq!(nearest_index(250, 2, 3), 1);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::ByLayer.to_string(), "ByLayer");
        assert_eq!(Color::from_rgb(255, 0, 0).to_string(), "RGB(255, 0, 0)");
    }
}
