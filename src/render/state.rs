//! Scoped graphics state

use super::style::{Rgba, Style};
use super::text::FontDescriptor;
use crate::error::{ContractViolation, GeometryError};
use crate::geometry::{ClipRegion, PolygonClipper};
use crate::types::Transform;

/// Everything that affects how the next draw call is emitted
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Logical-to-document transform set by the host
    pub transform: Transform,
    /// Clip region in document coordinates
    pub clip: ClipRegion,
    /// Stroke and fill style
    pub style: Style,
    /// Explicit target layer, `None` for the default
    pub layer: Option<String>,
    /// Host hatch string
    pub hatch: Option<String>,
    /// Color of hatch patterns
    pub hatch_color: Rgba,
    /// Font for text calls
    pub font: FontDescriptor,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            transform: Transform::identity(),
            clip: ClipRegion::Unbounded,
            style: Style::default(),
            layer: None,
            hatch: None,
            hatch_color: Rgba::BLACK,
            font: FontDescriptor::default(),
        }
    }
}

/// Stack of state snapshots
///
/// The bottom entry is the initial state and can never be popped.
#[derive(Debug, Clone)]
pub struct StateStack {
    stack: Vec<GraphicsState>,
}

impl StateStack {
    /// Create a stack holding only the initial state
    pub fn new() -> Self {
        StateStack {
            stack: vec![GraphicsState::default()],
        }
    }

    /// The current snapshot
    pub fn current(&self) -> &GraphicsState {
        // never empty: pop refuses to remove the bottom entry
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut GraphicsState {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Copy the current snapshot onto the stack
    pub fn push(&mut self) {
        let snapshot = self.current().clone();
        self.stack.push(snapshot);
    }

    /// Restore the previous snapshot
    pub fn pop(&mut self) -> Result<(), ContractViolation> {
        if self.stack.len() <= 1 {
            return Err(ContractViolation::UnbalancedScope);
        }
        self.stack.pop();
        Ok(())
    }

    /// Replace the current transform. Degenerate transforms are refused
    /// and leave the state untouched.
    pub fn set_transform(&mut self, transform: Transform) -> Result<(), GeometryError> {
        check_transform(&transform)?;
        self.top_mut().transform = transform;
        Ok(())
    }

    /// Apply `transform` before the current one
    pub fn concat_transform(&mut self, transform: &Transform) -> Result<(), GeometryError> {
        let combined = transform.then(&self.current().transform);
        check_transform(&combined)?;
        self.top_mut().transform = combined;
        Ok(())
    }

    /// Narrow the clip region. `None` keeps the inherited region.
    pub fn set_clip(&mut self, region: Option<ClipRegion>, clipper: &dyn PolygonClipper) {
        if let Some(region) = region {
            let top = self.top_mut();
            top.clip = top.clip.intersect(&region, clipper);
        }
    }

    /// Replace the style
    pub fn set_style(&mut self, style: Style) {
        self.top_mut().style = style;
    }

    /// Replace the target layer
    pub fn set_layer(&mut self, layer: Option<String>) {
        self.top_mut().layer = layer;
    }

    /// Replace the hatch
    pub fn set_hatch(&mut self, hatch: Option<String>, color: Rgba) {
        let top = self.top_mut();
        top.hatch = hatch;
        top.hatch_color = color;
    }

    /// Replace the font
    pub fn set_font(&mut self, font: FontDescriptor) {
        self.top_mut().font = font;
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

fn check_transform(transform: &Transform) -> Result<(), GeometryError> {
    if !transform.is_finite() {
        return Err(GeometryError::NonFinite("transform"));
    }
    if transform.is_degenerate() {
        return Err(GeometryError::DegenerateTransform(transform.determinant()));
    }
    Ok(())
}
