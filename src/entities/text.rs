//! Text entity (single-line text)

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHorizontalAlignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
    Aligned = 3,
    Middle = 4,
    Fit = 5,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVerticalAlignment {
    #[default]
    Baseline = 0,
    Bottom = 1,
    Middle = 2,
    Top = 3,
}

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// First alignment point
    pub insertion_point: Vector2,
    /// Second alignment point, used when the alignment is not left/baseline
    pub alignment_point: Option<Vector2>,
    /// Text height
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Width factor (horizontal scaling)
    pub width_factor: f64,
    /// Text style name
    pub style: String,
    /// Horizontal alignment
    pub horizontal_alignment: TextHorizontalAlignment,
    /// Vertical alignment
    pub vertical_alignment: TextVerticalAlignment,
}

impl Text {
    /// Create a new text entity
    pub fn new(value: impl Into<String>, insertion_point: Vector2, height: f64) -> Self {
        Text {
            common: EntityCommon::new(),
            value: value.into(),
            insertion_point,
            alignment_point: None,
            height,
            rotation: 0.0,
            width_factor: 1.0,
            style: "Standard".to_string(),
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
        }
    }

    /// Builder: set rotation in degrees
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set alignment. Non-default alignments anchor on the
    /// alignment point, which is placed at the insertion point.
    pub fn with_alignment(
        mut self,
        horizontal: TextHorizontalAlignment,
        vertical: TextVerticalAlignment,
    ) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self.alignment_point = if horizontal == TextHorizontalAlignment::Left
            && vertical == TextVerticalAlignment::Baseline
        {
            None
        } else {
            Some(self.insertion_point)
        };
        self
    }

    /// Builder: set style name
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        // without font metrics only the anchor is known
        Some(BoundingBox2D::from_point(self.insertion_point))
    }

    fn entity_type(&self) -> &'static str {
        "TEXT"
    }
}
