//! Render session: the drawing-primitive contract a plotting host drives
//!
//! A `Renderer` owns one document and everything needed to fill it. Draw
//! calls are handled strictly in arrival order. Problems with a single
//! primitive are recorded as diagnostics and the session continues;
//! protocol violations end the session.

use super::config::{RenderConfig, TextMode};
use super::emitter::{EntityEmitter, ImageData, ImagePlacement};
use super::state::{GraphicsState, StateStack};
use super::style::{hatch_patterns, LayerResolver, Rgba, Style, StyleResolver};
use super::text::{clean_text, layout_outline, map_alignment, FontDescriptor, GlyphOutlines, TextOptions, CAP_HEIGHT};
use crate::document::CadDocument;
use crate::entities::Text;
use crate::error::{ContractViolation, GeometryError, RenderError};
use crate::geometry::polygon::{convex_hull, dedupe, is_convex, to_ccw, validate_points};
use crate::geometry::{flatten_path, ClipRegion, ConvexClipper, Path, PathSegment, PolygonClipper};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::{BoundingBox2D, Handle, Transform, Vector2};
use crate::Result;
use rayon::prelude::*;
use std::sync::Arc;

/// Native text height relative to the font size
pub const TEXT_HEIGHT_FACTOR: f64 = 0.5;

/// Lifecycle of a render session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No call received yet
    Init,
    /// Accepting calls
    Rendering,
    /// Finished or aborted; every further call is refused
    Finalized,
}

/// What a finished session hands to the serializer
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub document: CadDocument,
    pub diagnostics: NotificationCollection,
}

/// Several paths drawn with per-item offsets and cycling colors
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathCollection {
    pub paths: Vec<Path>,
    /// Logical offsets, cycled
    pub offsets: Vec<Vector2>,
    /// Fill colors, cycled; empty keeps the current fill
    pub face_colors: Vec<Rgba>,
    /// Stroke colors, cycled; empty keeps the current stroke
    pub edge_colors: Vec<Rgba>,
    /// Line widths in points, cycled
    pub line_widths: Vec<f64>,
}

impl PathCollection {
    /// Collection over `paths`
    pub fn new(paths: Vec<Path>) -> Self {
        PathCollection {
            paths,
            ..Self::default()
        }
    }

    /// Builder: offsets
    pub fn with_offsets(mut self, offsets: Vec<Vector2>) -> Self {
        self.offsets = offsets;
        self
    }

    /// Builder: fill colors
    pub fn with_face_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.face_colors = colors;
        self
    }

    /// Builder: stroke colors
    pub fn with_edge_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.edge_colors = colors;
        self
    }

    /// Builder: line widths
    pub fn with_line_widths(mut self, widths: Vec<f64>) -> Self {
        self.line_widths = widths;
        self
    }

    /// Number of items drawn
    pub fn len(&self) -> usize {
        if self.paths.is_empty() {
            0
        } else {
            self.paths.len().max(self.offsets.len())
        }
    }

    /// True when nothing would be drawn
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item_style(&self, index: usize, base: &Style) -> Style {
        let mut style = base.clone();
        if let Some(color) = cycle(&self.face_colors, index) {
            style.fill = Some(*color);
        }
        if let Some(color) = cycle(&self.edge_colors, index) {
            style.stroke = Some(*color);
        }
        if let Some(width) = cycle(&self.line_widths, index) {
            style.line_width = *width;
        }
        style
    }
}

fn cycle<T>(items: &[T], index: usize) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(index % items.len())
    }
}

/// One host call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginScope,
    EndScope,
    SetTransform(Transform),
    ConcatTransform(Transform),
    SetClip(Option<Vec<Vector2>>),
    SetStyle(Style),
    SetLayer(Option<String>),
    SetHatch(Option<String>, Rgba),
    SetFont(FontDescriptor),
    DrawPath(Path),
    DrawText {
        position: Vector2,
        text: String,
        font: Option<FontDescriptor>,
        options: TextOptions,
    },
    DrawImage {
        bounds: BoundingBox2D,
        image: ImageData,
    },
    DrawMarkers {
        marker: Path,
        marker_transform: Transform,
        path: Path,
    },
    DrawPathCollection(PathCollection),
    OpenGroup(String),
    CloseGroup(String),
}

/// A render session
pub struct Renderer {
    config: RenderConfig,
    base: Transform,
    stack: StateStack,
    document: CadDocument,
    styles: StyleResolver,
    layers: LayerResolver,
    emitter: EntityEmitter,
    clipper: Arc<dyn PolygonClipper>,
    glyphs: Option<Arc<dyn GlyphOutlines>>,
    diagnostics: NotificationCollection,
    groups: Vec<String>,
    session: SessionState,
    call_index: usize,
}

impl Renderer {
    /// Start a session with the default clipper and no glyph provider
    pub fn new(config: RenderConfig) -> Self {
        let mut document = CadDocument::new();
        document.header.insertion_units = config.insertion_units;
        document.header.linetype_scale = config.linetype_scale;
        Renderer {
            base: Transform::scaling(config.units_scale, config.units_scale),
            stack: StateStack::new(),
            document,
            styles: StyleResolver::new(config.color_mode, config.alpha_policy),
            layers: LayerResolver::new(),
            emitter: EntityEmitter::new(config.image_pixel_size),
            clipper: Arc::new(ConvexClipper::new()),
            glyphs: None,
            diagnostics: NotificationCollection::new(),
            groups: Vec::new(),
            session: SessionState::Init,
            call_index: 0,
            config,
        }
    }

    /// Builder: polygon clipping implementation
    pub fn with_clipper(mut self, clipper: Arc<dyn PolygonClipper>) -> Self {
        self.clipper = clipper;
        self
    }

    /// Builder: glyph outline provider for outlined text
    pub fn with_glyphs(mut self, glyphs: Arc<dyn GlyphOutlines>) -> Self {
        self.glyphs = Some(glyphs);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn session_state(&self) -> SessionState {
        self.session
    }

    /// The document being filled
    pub fn document(&self) -> &CadDocument {
        &self.document
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &NotificationCollection {
        &self.diagnostics
    }

    /// The current graphics state
    pub fn current_state(&self) -> &GraphicsState {
        self.stack.current()
    }

    /// Number of open scopes
    pub fn scope_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Canvas width in host units
    pub fn width(&self) -> f64 {
        self.config.canvas_width
    }

    /// Canvas height in host units
    pub fn height(&self) -> f64 {
        self.config.canvas_height
    }

    pub fn dpi(&self) -> f64 {
        self.config.dpi
    }

    /// Convert a length in points to document units
    pub fn points_to_units(&self, points: f64) -> f64 {
        self.config.points_to_units(points)
    }

    /// Save the graphics state
    pub fn begin_scope(&mut self) -> Result<()> {
        self.enter("begin_scope")?;
        self.stack.push();
        Ok(())
    }

    /// Restore the graphics state saved by the matching `begin_scope`
    pub fn end_scope(&mut self) -> Result<()> {
        self.enter("end_scope")?;
        let result = self.stack.pop().map_err(RenderError::from);
        self.settle(result)
    }

    /// Replace the logical-to-host transform
    pub fn set_transform(&mut self, transform: Transform) -> Result<()> {
        self.enter("set_transform")?;
        let result = self.stack.set_transform(transform).map_err(RenderError::from);
        self.settle(result)
    }

    /// Apply `transform` before the current transform
    pub fn concat_transform(&mut self, transform: &Transform) -> Result<()> {
        self.enter("concat_transform")?;
        let result = self.stack.concat_transform(transform).map_err(RenderError::from);
        self.settle(result)
    }

    /// Narrow the clip region to a polygon in logical coordinates.
    /// `None` keeps the current region.
    pub fn set_clip(&mut self, polygon: Option<&[Vector2]>) -> Result<()> {
        self.enter("set_clip")?;
        let result = self.set_clip_polygon(polygon);
        self.settle(result)
    }

    /// Narrow the clip region to a rectangle in logical coordinates
    pub fn set_clip_rect(&mut self, bounds: &BoundingBox2D) -> Result<()> {
        self.set_clip(Some(&bounds.corners()))
    }

    /// Replace the stroke and fill style
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.enter("set_style")?;
        let result = if !style.line_width.is_finite()
            || !style.dash.offset.is_finite()
            || style.dash.lengths.iter().any(|l| !l.is_finite())
        {
            Err(GeometryError::NonFinite("style").into())
        } else {
            self.stack.set_style(style);
            Ok(())
        };
        self.settle(result)
    }

    /// Select the layer for following draw calls, `None` for the default
    pub fn set_layer(&mut self, layer: Option<&str>) -> Result<()> {
        self.enter("set_layer")?;
        self.stack.set_layer(layer.map(str::to_string));
        Ok(())
    }

    /// Select a hatch for following filled shapes
    pub fn set_hatch(&mut self, hatch: Option<&str>, color: Rgba) -> Result<()> {
        self.enter("set_hatch")?;
        if let Some(code) = hatch {
            let (_, unknown) = hatch_patterns(code, self.hatch_cell());
            if !unknown.is_empty() {
                self.diagnostics.notify(
                    NotificationType::Warning,
                    self.call_index,
                    format!("unsupported hatch characters {:?} ignored", unknown),
                );
            }
        }
        self.stack.set_hatch(hatch.map(str::to_string), color);
        Ok(())
    }

    /// Replace the font used by `draw_text` calls without an explicit font
    pub fn set_font(&mut self, font: FontDescriptor) -> Result<()> {
        self.enter("set_font")?;
        self.stack.set_font(font);
        Ok(())
    }

    /// Draw a path with the current style
    pub fn draw_path(&mut self, path: &Path) -> Result<()> {
        self.enter("draw_path")?;
        let to_doc = self.effective_transform();
        let style = self.stack.current().style.clone();
        let result = self.render_path(path, &to_doc, &style);
        self.settle(result)
    }

    /// Draw a string anchored at `position`
    pub fn draw_text(
        &mut self,
        position: Vector2,
        text: &str,
        font: Option<&FontDescriptor>,
        options: &TextOptions,
    ) -> Result<()> {
        self.enter("draw_text")?;
        let result = self.render_text(position, text, font, options);
        self.settle(result)
    }

    /// Draw an image filling `bounds` (logical coordinates)
    pub fn draw_image(&mut self, bounds: &BoundingBox2D, image: &ImageData) -> Result<()> {
        self.enter("draw_image")?;
        let result = self.render_image(bounds, image);
        self.settle(result)
    }

    /// Stamp `marker` at every vertex of `path`
    ///
    /// `marker_transform` maps the marker into host units around the
    /// vertex; the marker itself is not affected by the current transform.
    pub fn draw_markers(&mut self, marker: &Path, marker_transform: &Transform, path: &Path) -> Result<()> {
        self.enter("draw_markers")?;
        let result = self.render_markers(marker, marker_transform, path);
        self.settle(result)
    }

    /// Draw every item of a collection
    ///
    /// Items fail independently: a bad item is recorded and the rest are
    /// still drawn.
    pub fn draw_path_collection(&mut self, collection: &PathCollection) -> Result<()> {
        self.enter("draw_path_collection")?;
        let to_doc = self.effective_transform();
        let base = self.stack.current().style.clone();
        for index in 0..collection.len() {
            let Some(path) = cycle(&collection.paths, index) else {
                break;
            };
            let offset = cycle(&collection.offsets, index).copied().unwrap_or(Vector2::ZERO);
            let style = collection.item_style(index, &base);
            let result = self.render_path(&path.translated(offset), &to_doc, &style);
            self.settle(result)?;
        }
        Ok(())
    }

    /// Open a named group
    pub fn open_group(&mut self, name: &str) -> Result<()> {
        self.enter("open_group")?;
        self.groups.push(name.to_string());
        Ok(())
    }

    /// Close the innermost group
    ///
    /// A name that does not match the innermost open group, or a close with
    /// no group open, is recorded as a warning. The innermost group, if any,
    /// is closed either way.
    pub fn close_group(&mut self, name: &str) -> Result<()> {
        self.enter("close_group")?;
        match self.groups.pop() {
            Some(open) if open == name => {}
            Some(open) => self.diagnostics.notify(
                NotificationType::Warning,
                self.call_index,
                format!("close_group('{}') closed open group '{}'", name, open),
            ),
            None => self.diagnostics.notify(
                NotificationType::Warning,
                self.call_index,
                format!("close_group('{}') with no group open", name),
            ),
        }
        Ok(())
    }

    /// Replay one host call
    pub fn execute(&mut self, command: &DrawCommand) -> Result<()> {
        match command {
            DrawCommand::BeginScope => self.begin_scope(),
            DrawCommand::EndScope => self.end_scope(),
            DrawCommand::SetTransform(t) => self.set_transform(*t),
            DrawCommand::ConcatTransform(t) => self.concat_transform(t),
            DrawCommand::SetClip(polygon) => self.set_clip(polygon.as_deref()),
            DrawCommand::SetStyle(style) => self.set_style(style.clone()),
            DrawCommand::SetLayer(layer) => self.set_layer(layer.as_deref()),
            DrawCommand::SetHatch(hatch, color) => self.set_hatch(hatch.as_deref(), *color),
            DrawCommand::SetFont(font) => self.set_font(font.clone()),
            DrawCommand::DrawPath(path) => self.draw_path(path),
            DrawCommand::DrawText {
                position,
                text,
                font,
                options,
            } => self.draw_text(*position, text, font.as_ref(), options),
            DrawCommand::DrawImage { bounds, image } => self.draw_image(bounds, image),
            DrawCommand::DrawMarkers {
                marker,
                marker_transform,
                path,
            } => self.draw_markers(marker, marker_transform, path),
            DrawCommand::DrawPathCollection(collection) => self.draw_path_collection(collection),
            DrawCommand::OpenGroup(name) => self.open_group(name),
            DrawCommand::CloseGroup(name) => self.close_group(name),
        }
    }

    /// End the session and hand over the document
    ///
    /// Writes the drawing extents (entities plus canvas) into the header.
    pub fn finish(&mut self) -> Result<RenderOutput> {
        self.enter("finish")?;
        self.session = SessionState::Finalized;
        let depth = self.stack.depth();
        if depth > 0 {
            return Err(ContractViolation::UnclosedScopes(depth).into());
        }
        if !self.groups.is_empty() {
            self.diagnostics.notify(
                NotificationType::Warning,
                self.call_index,
                format!("groups left open: {:?}", self.groups),
            );
        }

        let canvas = BoundingBox2D::new(
            self.base.apply(Vector2::ZERO),
            self.base.apply(Vector2::new(self.config.canvas_width, self.config.canvas_height)),
        );
        let extents = self
            .document
            .extents()
            .map_or(canvas, |e| e.merge(&canvas));
        self.document.set_extents(extents);
        log::debug!(
            "session finished after {} calls: {} entities, {} diagnostics",
            self.call_index,
            self.document.entity_count(),
            self.diagnostics.len()
        );
        Ok(RenderOutput {
            document: std::mem::take(&mut self.document),
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }

    fn enter(&mut self, call: &'static str) -> Result<()> {
        if self.session == SessionState::Finalized {
            return Err(ContractViolation::AfterFinalize(call).into());
        }
        self.session = SessionState::Rendering;
        self.call_index += 1;
        log::trace!("call #{}: {}", self.call_index, call);
        Ok(())
    }

    /// Fatal errors end the session, the rest become diagnostics
    fn settle(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => {
                log::error!("call #{}: {}", self.call_index, err);
                self.session = SessionState::Finalized;
                Err(err)
            }
            Err(err) => {
                self.diagnostics.record_error(self.call_index, &err);
                Ok(())
            }
        }
    }

    fn effective_transform(&self) -> Transform {
        self.stack.current().transform.then(&self.base)
    }

    /// Document length of one inch
    fn hatch_cell(&self) -> f64 {
        self.config.points_to_units(72.0)
    }

    fn target_layer(&mut self) -> Result<String> {
        let state = self.stack.current();
        let requested = match (&state.layer, self.groups.last()) {
            (Some(layer), _) => layer.clone(),
            (None, Some(group)) if self.config.layer_per_group => group.clone(),
            _ => self.config.default_layer.clone(),
        };
        self.layers.resolve(&requested, &mut self.document)
    }

    fn set_clip_polygon(&mut self, polygon: Option<&[Vector2]>) -> Result<()> {
        let Some(polygon) = polygon else {
            return Ok(());
        };
        validate_points(polygon, "clip")?;
        let mapped = to_ccw(&dedupe(&self.effective_transform().apply_all(polygon), true));
        let concave = mapped.len() >= 3 && !is_convex(&mapped);
        let region = if concave && !self.clipper.accepts_concave_clips() {
            self.diagnostics.notify(
                NotificationType::Warning,
                self.call_index,
                "non-convex clip polygon replaced by its convex hull",
            );
            ClipRegion::polygon(&convex_hull(&mapped))
        } else {
            ClipRegion::polygon(&mapped)
        };
        self.stack.set_clip(Some(region), self.clipper.as_ref());
        Ok(())
    }

    fn clip_area(&self, ring: &[Vector2], clip: &ClipRegion) -> Vec<Vec<Vector2>> {
        match clip.vertices() {
            Some(region) if !clip.contains_ring(ring) => self.clipper.clip_polygon(ring, region),
            _ => vec![ring.to_vec()],
        }
    }

    fn clip_open(&self, points: &[Vector2], clip: &ClipRegion) -> Vec<Vec<Vector2>> {
        match clip.vertices() {
            Some(region) if !clip.contains_all(points) => self.clipper.clip_polyline(points, region),
            _ => vec![points.to_vec()],
        }
    }

    /// Emit `path` mapped through `to_doc` with `style`
    fn render_path(&mut self, path: &Path, to_doc: &Transform, style: &Style) -> Result<()> {
        path.validate()?;
        let clip = self.stack.current().clip.clone();
        if clip.is_empty() {
            log::trace!("call #{}: clip region is empty", self.call_index);
            return Ok(());
        }

        let dash_scale = self.config.points_to_units(1.0);
        let stroke = self.styles.resolve_stroke(style, dash_scale, &mut self.document)?;
        let fill = self.styles.resolve_fill(style);
        let state = self.stack.current();
        let patterns = match (&state.hatch, self.styles.resolve_paint(&state.hatch_color, style.opacity)) {
            (Some(code), Some(paint)) => {
                let (patterns, _) = hatch_patterns(code, self.hatch_cell());
                patterns.into_iter().map(|p| (p, paint.clone())).collect()
            }
            _ => Vec::new(),
        };
        if stroke.is_none() && fill.is_none() && patterns.is_empty() {
            return Ok(());
        }
        let filled = fill.is_some() || !patterns.is_empty();
        let layer = self.target_layer()?;

        if let Some(stroke) = &stroke {
            if self.config.native_splines && !filled && path.has_curves() {
                let mapped = path.transformed(to_doc);
                let points: Vec<Vector2> = mapped.points().collect();
                if clip.contains_all(&points) {
                    for (chain, closed) in mapped.bezier_chains() {
                        self.emitter
                            .emit_spline(&mut self.document, chain, closed, stroke, &layer)?;
                    }
                    return Ok(());
                }
            }
        }

        // all loops of one path share a single even-odd hatch
        let mut rings: Vec<Vec<Vector2>> = Vec::new();
        let mut outlines: Vec<Option<Handle>> = Vec::new();
        for subpath in flatten_path(path, to_doc, self.config.tolerance)? {
            if subpath.closed || filled {
                for piece in self.clip_area(&subpath.points, &clip) {
                    let outline = match &stroke {
                        Some(stroke) if subpath.closed => self
                            .emitter
                            .emit_polyline(&mut self.document, &piece, true, stroke, &layer)?,
                        _ => None,
                    };
                    rings.push(piece);
                    outlines.push(outline);
                }
            }
            match &stroke {
                Some(stroke) if !subpath.closed => {
                    for piece in self.clip_open(&subpath.points, &clip) {
                        self.emitter
                            .emit_polyline(&mut self.document, &piece, false, stroke, &layer)?;
                    }
                }
                _ => {}
            }
        }
        if let Some(fill) = &fill {
            self.emitter
                .emit_fill(&mut self.document, &rings, &outlines, fill, &layer)?;
        }
        for (pattern, paint) in &patterns {
            self.emitter
                .emit_pattern(&mut self.document, &rings, pattern.clone(), paint, &layer)?;
        }
        Ok(())
    }

    fn render_text(
        &mut self,
        position: Vector2,
        text: &str,
        font: Option<&FontDescriptor>,
        options: &TextOptions,
    ) -> Result<()> {
        if !position.is_finite() || !options.angle.is_finite() {
            return Err(GeometryError::NonFinite("text position").into());
        }
        let state = self.stack.current();
        let font = font.cloned().unwrap_or_else(|| state.font.clone());
        let style = state.style.clone();
        let value = clean_text(text);
        if value.trim().is_empty() {
            return Ok(());
        }
        let to_doc = self.effective_transform();
        let anchor = to_doc.apply(position);
        // host angle is relative to the logical x axis
        let placed = options.with_angle((options.angle + to_doc.rotation_degrees()).rem_euclid(360.0));
        if !state.clip.contains_all(&[anchor]) {
            log::trace!("call #{}: text anchor outside clip", self.call_index);
            return Ok(());
        }
        let height = self.config.points_to_units(font.size) * TEXT_HEIGHT_FACTOR;
        if !(height.is_finite() && height > 0.0) {
            return Err(GeometryError::NonFinite("text height").into());
        }
        let color = style.stroke.or(style.fill).unwrap_or(Rgba::BLACK);

        if self.config.text_mode == TextMode::Outline {
            match self.glyphs.clone() {
                Some(glyphs) if glyphs.has_font(&font) => {
                    let outline =
                        layout_outline(glyphs.as_ref(), &font, &value, height / CAP_HEIGHT, anchor, &placed);
                    if !outline.missing.is_empty() {
                        self.diagnostics.record_error(
                            self.call_index,
                            &RenderError::ResourceResolution(format!(
                                "font '{}' has no glyph for {:?}; drew placeholders",
                                font.family, outline.missing
                            )),
                        );
                    }
                    let glyph_style = Style {
                        stroke: None,
                        fill: Some(color),
                        opacity: style.opacity,
                        ..Style::default()
                    };
                    return self.render_path(&outline.path, &Transform::identity(), &glyph_style);
                }
                _ => self.diagnostics.record_error(
                    self.call_index,
                    &RenderError::ResourceResolution(format!(
                        "no outlines for font '{}'; using native text",
                        font.family
                    )),
                ),
            }
        }

        let Some(paint) = self.styles.resolve_paint(&color, style.opacity) else {
            return Ok(());
        };
        let layer = self.target_layer()?;
        let (horizontal, vertical) = map_alignment(options);
        let entity = Text::new(value, anchor, height)
            .with_rotation(placed.angle)
            .with_alignment(horizontal, vertical);
        self.emitter.emit_text(&mut self.document, entity, &paint, &layer)?;
        Ok(())
    }

    fn render_image(&mut self, bounds: &BoundingBox2D, image: &ImageData) -> Result<()> {
        image.validate()?;
        validate_points(&[bounds.min, bounds.max], "image bounds")?;
        let clip = self.stack.current().clip.clone();
        if clip.is_empty() {
            return Ok(());
        }
        let to_doc = self.effective_transform();
        let placement = ImagePlacement {
            origin: to_doc.apply(bounds.min),
            width_vector: to_doc.apply_vector(Vector2::new(bounds.width(), 0.0)),
            height_vector: to_doc.apply_vector(Vector2::new(0.0, bounds.height())),
        };
        let layer = self.target_layer()?;
        self.emitter.emit_image(
            &mut self.document,
            image,
            &placement,
            &clip,
            self.clipper.as_ref(),
            &layer,
        )?;
        Ok(())
    }

    fn render_markers(&mut self, marker: &Path, marker_transform: &Transform, path: &Path) -> Result<()> {
        marker.validate()?;
        path.validate()?;
        if !marker_transform.is_finite() {
            return Err(GeometryError::NonFinite("marker transform").into());
        }
        if marker_transform.is_degenerate() {
            return Err(GeometryError::DegenerateTransform(marker_transform.determinant()).into());
        }
        let to_doc = self.effective_transform();
        let stamp = marker.transformed(&marker_transform.then(&self.base));
        let style = self.stack.current().style.clone();
        let vertices: Vec<Vector2> = path.segments().iter().filter_map(segment_end).collect();
        for vertex in vertices {
            let placed = stamp.translated(to_doc.apply(vertex));
            self.render_path(&placed, &Transform::identity(), &style)?;
        }
        Ok(())
    }
}

fn segment_end(segment: &PathSegment) -> Option<Vector2> {
    match *segment {
        PathSegment::MoveTo(p)
        | PathSegment::LineTo(p)
        | PathSegment::QuadTo(_, p)
        | PathSegment::CubicTo(_, _, p) => Some(p),
        PathSegment::Close => None,
    }
}

/// Run a recorded command list as one session
pub fn render_commands(config: RenderConfig, commands: &[DrawCommand]) -> Result<RenderOutput> {
    let mut renderer = Renderer::new(config);
    for command in commands {
        renderer.execute(command)?;
    }
    renderer.finish()
}

/// One independent session for `render_sessions`
#[derive(Clone)]
pub struct RenderJob {
    pub config: RenderConfig,
    pub commands: Vec<DrawCommand>,
    pub glyphs: Option<Arc<dyn GlyphOutlines>>,
}

impl RenderJob {
    /// Job without a glyph provider
    pub fn new(config: RenderConfig, commands: Vec<DrawCommand>) -> Self {
        RenderJob {
            config,
            commands,
            glyphs: None,
        }
    }
}

/// Render independent sessions in parallel
///
/// Each job gets its own renderer and document. Results are returned in
/// job order.
pub fn render_sessions(jobs: &[RenderJob]) -> Vec<Result<RenderOutput>> {
    jobs.par_iter()
        .map(|job| {
            let mut renderer = Renderer::new(job.config.clone());
            if let Some(glyphs) = &job.glyphs {
                renderer = renderer.with_glyphs(Arc::clone(glyphs));
            }
            for command in &job.commands {
                renderer.execute(command)?;
            }
            renderer.finish()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityType, TextHorizontalAlignment};
    use crate::render::text::Glyph;
    use crate::types::Color;

    fn line() -> Path {
        Path::from_points(&[Vector2::ZERO, Vector2::new(10.0, 0.0)])
    }

    fn entity_names(renderer: &Renderer) -> Vec<&'static str> {
        renderer.document().entities().map(|e| e.type_name()).collect()
    }

    struct NoGlyphs;

    impl GlyphOutlines for NoGlyphs {
        fn has_font(&self, _font: &FontDescriptor) -> bool {
            true
        }

        fn glyph(&self, _font: &FontDescriptor, _ch: char) -> Option<Glyph> {
            None
        }
    }

    #[test]
    fn test_unbalanced_end_scope_is_fatal() {
        let mut renderer = Renderer::new(RenderConfig::default());
        let err = renderer.end_scope().unwrap_err();
        assert!(matches!(
            err,
            RenderError::ContractViolation(ContractViolation::UnbalancedScope)
        ));
        assert_eq!(renderer.session_state(), SessionState::Finalized);
        let err = renderer.draw_path(&line()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ContractViolation(ContractViolation::AfterFinalize("draw_path"))
        ));
    }

    #[test]
    fn test_degenerate_transform_is_recorded() {
        let mut renderer = Renderer::new(RenderConfig::default());
        renderer.set_transform(Transform::scaling(0.0, 1.0)).unwrap();
        assert_eq!(renderer.diagnostics().count(NotificationType::GeometryError), 1);
        assert!(renderer.current_state().transform.is_identity());
        renderer.draw_path(&line()).unwrap();
        assert_eq!(renderer.document().entity_count(), 1);
    }

    #[test]
    fn test_group_mismatch_is_a_warning() {
        let mut renderer = Renderer::new(RenderConfig::default());
        renderer.open_group("axes").unwrap();
        renderer.open_group("line2d").unwrap();
        renderer.close_group("axes").unwrap();
        renderer.close_group("axes").unwrap();
        renderer.close_group("never_opened").unwrap();
        assert_eq!(renderer.diagnostics().count(NotificationType::Warning), 2);
        assert_eq!(renderer.session_state(), SessionState::Rendering);

        renderer.draw_path(&line()).unwrap();
        assert_eq!(renderer.document().entity_count(), 1);
        let output = renderer.finish().unwrap();
        // every group was closed, so finish adds no warning
        assert_eq!(output.diagnostics.count(NotificationType::Warning), 2);
    }

    #[test]
    fn test_layer_per_group() {
        let config = RenderConfig::default().with_layer_per_group(true);
        let mut renderer = Renderer::new(config);
        renderer.open_group("axes 1").unwrap();
        renderer.draw_path(&line()).unwrap();
        renderer.set_layer(Some("annotations")).unwrap();
        renderer.draw_path(&line()).unwrap();
        renderer.close_group("axes 1").unwrap();
        renderer.set_layer(None).unwrap();
        renderer.draw_path(&line()).unwrap();

        let layers: Vec<&str> = renderer
            .document()
            .entities()
            .map(|e| e.common().layer.as_str())
            .collect();
        assert_eq!(layers, vec!["axes 1", "annotations", "0"]);
    }

    #[test]
    fn test_filled_square() {
        let mut renderer = Renderer::new(RenderConfig::default());
        let style = Style::default().with_fill(Some(Rgba::rgb(0.0, 0.0, 1.0)));
        renderer.set_style(style).unwrap();
        renderer.draw_path(&Path::rect(Vector2::ZERO, 1.0, 1.0)).unwrap();
        assert_eq!(entity_names(&renderer), vec!["LWPOLYLINE", "HATCH"]);
        let hatch = renderer.document().entities().nth(1).unwrap();
        assert_eq!(hatch.common().color, Color::BLUE);
    }

    #[test]
    fn test_hatch_patterns_follow_fill() {
        let mut renderer = Renderer::new(RenderConfig::default());
        renderer.set_hatch(Some("//?"), Rgba::BLACK).unwrap();
        assert_eq!(renderer.diagnostics().count(NotificationType::Warning), 1);
        renderer.draw_path(&Path::rect(Vector2::ZERO, 1.0, 1.0)).unwrap();
        assert_eq!(entity_names(&renderer), vec!["LWPOLYLINE", "HATCH"]);
        match renderer.document().entities().nth(1) {
            Some(EntityType::Hatch(hatch)) => {
                assert!(!hatch.is_solid);
                assert_eq!(hatch.pattern.name, "ANSI31");
            }
            other => panic!("expected hatch, got {:?}", other),
        };
    }

    #[test]
    fn test_native_splines_only_when_unclipped() {
        let config = RenderConfig::default().with_native_splines(true);
        let mut renderer = Renderer::new(config);
        let circle = Path::circle(Vector2::new(100.0, 100.0), 10.0);
        renderer.draw_path(&circle).unwrap();
        renderer
            .set_clip_rect(&BoundingBox2D::new(Vector2::ZERO, Vector2::new(100.0, 200.0)))
            .unwrap();
        renderer.draw_path(&circle).unwrap();
        assert_eq!(entity_names(&renderer), vec!["SPLINE", "LWPOLYLINE"]);
    }

    #[test]
    fn test_native_text() {
        let mut renderer = Renderer::new(RenderConfig::default());
        let options = TextOptions::default().with_angle(90.0);
        renderer
            .draw_text(Vector2::new(10.0, 20.0), "$\\mathbf{x}$", None, &options)
            .unwrap();
        match renderer.document().entities().next() {
            Some(EntityType::Text(text)) => {
                assert_eq!(text.value, "x");
                assert!((text.height - 5.0).abs() < 1e-12);
                assert_eq!(text.rotation, 90.0);
                assert_eq!(text.horizontal_alignment, TextHorizontalAlignment::Right);
                assert_eq!(text.alignment_point, Some(Vector2::new(10.0, 20.0)));
            }
            other => panic!("expected text, got {:?}", other),
        };
    }

    #[test]
    fn test_native_text_follows_transform_rotation() {
        let mut renderer = Renderer::new(RenderConfig::default());
        renderer
            .set_transform(Transform::rotation(std::f64::consts::FRAC_PI_2))
            .unwrap();
        let options = TextOptions::default().with_angle(30.0);
        renderer
            .draw_text(Vector2::new(10.0, 0.0), "tick", None, &options)
            .unwrap();
        match renderer.document().entities().next() {
            Some(EntityType::Text(text)) => {
                assert!((text.rotation - 120.0).abs() < 1e-9);
                // alignment follows the host angle, not the document one
                assert_eq!(text.horizontal_alignment, TextHorizontalAlignment::Left);
                assert!(text.insertion_point.approx_eq(&Vector2::new(0.0, 10.0), 1e-9));
            }
            other => panic!("expected text, got {:?}", other),
        };
    }

    #[test]
    fn test_outline_text_placeholders() {
        let config = RenderConfig::default().with_text_mode(TextMode::Outline);
        let mut renderer = Renderer::new(config).with_glyphs(Arc::new(NoGlyphs));
        renderer
            .draw_text(Vector2::ZERO, "ab", None, &TextOptions::default())
            .unwrap();
        assert_eq!(renderer.diagnostics().count(NotificationType::ResourceResolution), 1);
        assert_eq!(entity_names(&renderer), vec!["HATCH"]);
        match renderer.document().entities().next() {
            Some(EntityType::Hatch(hatch)) => assert_eq!(hatch.paths.len(), 2),
            other => panic!("expected hatch, got {:?}", other),
        };
    }

    #[test]
    fn test_outline_mode_without_provider_falls_back() {
        let config = RenderConfig::default().with_text_mode(TextMode::Outline);
        let mut renderer = Renderer::new(config);
        renderer
            .draw_text(Vector2::ZERO, "label", None, &TextOptions::default())
            .unwrap();
        assert_eq!(renderer.diagnostics().count(NotificationType::ResourceResolution), 1);
        assert_eq!(entity_names(&renderer), vec!["TEXT"]);
    }

    #[test]
    fn test_markers() {
        let mut renderer = Renderer::new(RenderConfig::default());
        let marker = Path::rect(Vector2::new(-1.0, -1.0), 2.0, 2.0);
        let path = Path::from_points(&[Vector2::ZERO, Vector2::new(10.0, 0.0), Vector2::new(10.0, 10.0)]);
        renderer
            .draw_markers(&marker, &Transform::identity(), &path)
            .unwrap();
        assert_eq!(entity_names(&renderer), vec!["LWPOLYLINE"; 3]);
        let last = renderer.document().entities().last().unwrap();
        let bounds = last.as_entity().bounding_box().unwrap();
        assert_eq!(bounds.center(), Vector2::new(10.0, 10.0));
    }

    #[test]
    fn test_path_collection_cycles_colors() {
        let mut renderer = Renderer::new(RenderConfig::default());
        let offsets = (0..4).map(|i| Vector2::new(0.0, i as f64)).collect();
        let collection = PathCollection::new(vec![line()])
            .with_offsets(offsets)
            .with_edge_colors(vec![Rgba::rgb(1.0, 0.0, 0.0), Rgba::rgb(0.0, 0.0, 1.0)]);
        renderer.draw_path_collection(&collection).unwrap();
        let colors: Vec<Color> = renderer.document().entities().map(|e| e.common().color).collect();
        assert_eq!(colors, vec![Color::RED, Color::BLUE, Color::RED, Color::BLUE]);
    }

    #[test]
    fn test_finish() {
        let mut renderer = Renderer::new(RenderConfig::default().with_canvas(100.0, 50.0));
        renderer
            .draw_path(&Path::from_points(&[Vector2::new(-5.0, 0.0), Vector2::new(10.0, 80.0)]))
            .unwrap();
        let output = renderer.finish().unwrap();
        assert_eq!(output.document.header.extents_min, Vector2::new(-5.0, 0.0));
        assert_eq!(output.document.header.extents_max, Vector2::new(100.0, 80.0));
        assert!(renderer.finish().is_err());
    }

    #[test]
    fn test_finish_with_open_scope() {
        let mut renderer = Renderer::new(RenderConfig::default());
        renderer.begin_scope().unwrap();
        let err = renderer.finish().unwrap_err();
        assert!(matches!(
            err,
            RenderError::ContractViolation(ContractViolation::UnclosedScopes(1))
        ));
    }

    #[test]
    fn test_render_sessions_are_independent() {
        let commands = vec![
            DrawCommand::SetStyle(Style::default().with_dash(crate::render::style::DashPattern::new(0.0, vec![4.0, 2.0]))),
            DrawCommand::DrawPath(line()),
        ];
        let jobs = vec![
            RenderJob::new(RenderConfig::default(), commands.clone()),
            RenderJob::new(RenderConfig::default(), commands),
        ];
        let outputs = render_sessions(&jobs);
        assert_eq!(outputs.len(), 2);
        for output in outputs {
            let output = output.unwrap();
            assert_eq!(output.document.line_types.custom().count(), 1);
            assert_eq!(output.document.entity_count(), 1);
        }
    }
}
