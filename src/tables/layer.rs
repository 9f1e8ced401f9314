//! Layer table entry

use super::TableEntry;
use crate::types::{Color, Handle, LineWeight};
use bitflags::bitflags;

bitflags! {
    /// Layer state flags (DXF group code 70 plus the "off" sign of 62)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: u8 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Layer is locked
        const LOCKED = 4;
        /// Layer is off (invisible)
        const OFF = 128;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique handle
    pub handle: Handle,
    /// Layer name
    pub name: String,
    /// Layer flags
    pub flags: LayerFlags,
    /// Default color for ByLayer entities
    pub color: Color,
    /// Default line type name
    pub line_type: String,
    /// Default line weight
    pub line_weight: LineWeight,
    /// Is this layer plottable?
    pub is_plottable: bool,
}

impl Layer {
    /// Name of the layer every drawing carries
    pub const DEFAULT_NAME: &'static str = "0";

    /// Create a new visible layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: Handle::NULL,
            name: name.into(),
            flags: LayerFlags::empty(),
            color: Color::WHITE,
            line_type: super::LineType::CONTINUOUS.to_string(),
            line_weight: LineWeight::Default,
            is_plottable: true,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }

}

impl TableEntry for Layer {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_standard(&self) -> bool {
        self.name == Self::DEFAULT_NAME
    }
}
