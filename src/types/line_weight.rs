//! Line weight representation for CAD entities

use std::fmt;

/// Represents line weight in a DXF drawing
///
/// Line weights are specified in 1/100 mm or can be special values
/// like ByLayer, ByBlock, or Default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LineWeight {
    /// Use the layer's line weight
    #[default]
    ByLayer,
    /// Use the block's line weight
    ByBlock,
    /// Default line weight
    Default,
    /// Specific line weight in 1/100 mm (0-211)
    Value(i16),
}

/// Line weights a DXF reader accepts, in 1/100 mm
pub const STANDARD_WEIGHTS: [i16; 24] = [
    0, 5, 9, 13, 15, 18, 20, 25, 30, 35, 40, 50, 53, 60, 70, 80, 90, 100, 106, 120, 140, 158,
    200, 211,
];

impl LineWeight {
    /// Snap a width in millimeters to the nearest standard line weight
    ///
    /// Non-positive or non-finite widths yield `LineWeight::Default`.
    pub fn from_millimeters(mm: f64) -> Self {
        if !mm.is_finite() || mm <= 0.0 {
            return LineWeight::Default;
        }
        let hundredths = mm * 100.0;
        let nearest = STANDARD_WEIGHTS
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (*a as f64 - hundredths).abs();
                let db = (*b as f64 - hundredths).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        LineWeight::Value(nearest)
    }

    /// Get the raw value
    pub fn value(&self) -> i16 {
        match self {
            LineWeight::ByLayer => -1,
            LineWeight::ByBlock => -2,
            LineWeight::Default => -3,
            LineWeight::Value(v) => *v,
        }
    }

    pub const W0_00: LineWeight = LineWeight::Value(0);
    pub const W0_13: LineWeight = LineWeight::Value(13);
    pub const W0_25: LineWeight = LineWeight::Value(25);
    pub const W0_35: LineWeight = LineWeight::Value(35);
    pub const W0_50: LineWeight = LineWeight::Value(50);
    pub const W1_00: LineWeight = LineWeight::Value(100);
    pub const W2_11: LineWeight = LineWeight::Value(211);
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => write!(f, "ByLayer"),
            LineWeight::ByBlock => write!(f, "ByBlock"),
            LineWeight::Default => write!(f, "Default"),
            LineWeight::Value(v) => write!(f, "{:.2}mm", *v as f64 / 100.0),
        }
    }
}
