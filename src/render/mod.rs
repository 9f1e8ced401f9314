//! The translation core: graphics state, style resolution, emission and
//! the session that ties them together

pub mod config;
pub mod emitter;
pub mod renderer;
pub mod state;
pub mod style;
pub mod text;

pub use config::{AlphaPolicy, ColorMode, RenderConfig, TextMode};
pub use emitter::{EntityEmitter, ImageData, ImagePlacement};
pub use renderer::{
    render_commands, render_sessions, DrawCommand, PathCollection, RenderJob, RenderOutput, Renderer,
    SessionState,
};
pub use state::{GraphicsState, StateStack};
pub use style::{DashPattern, LayerResolver, LinetypeResolver, ResolvedStyle, Rgba, Style, StyleResolver};
pub use text::{
    FontDescriptor, Glyph, GlyphOutlines, HorizontalAlign, RotationMode, TextOptions, VerticalAlign,
};
