//! Entity emission
//!
//! The emitter receives geometry that is already transformed and clipped,
//! together with resolved attributes, and appends entities to the document
//! in call order. Degenerate input emits nothing.

use super::style::ResolvedStyle;
use crate::document::CadDocument;
use crate::entities::{
    BoundaryPath, EntityType, Hatch, HatchPattern, ImageDefinition, Line, LwPolyline, RasterImage,
    Spline, Text,
};
use crate::error::{GeometryError, RenderError};
use crate::geometry::polygon::{area, convex_hull, dedupe, has_area, to_ccw, validate_points};
use crate::geometry::{ClipRegion, PolygonClipper};
use crate::types::{Handle, Vector2};
use crate::Result;
use ahash::{AHashMap, RandomState};

/// RGBA pixel buffer handed over by the host, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Wrap a pixel buffer
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        ImageData { width, height, rgba }
    }

    /// Check that the buffer holds exactly `width * height` RGBA pixels
    pub fn validate(&self) -> std::result::Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::InvalidImage(format!(
                "{}x{} image has no pixels",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(GeometryError::InvalidImage(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                self.width,
                self.height,
                self.rgba.len()
            )));
        }
        Ok(())
    }
}

/// Where an image lands in document coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Lower-left corner
    pub origin: Vector2,
    /// Full extent of the bottom edge
    pub width_vector: Vector2,
    /// Full extent of the left edge
    pub height_vector: Vector2,
}

impl ImagePlacement {
    /// Corners starting at the origin
    pub fn corners(&self) -> [Vector2; 4] {
        let o = self.origin;
        [
            o,
            o + self.width_vector,
            o + self.width_vector + self.height_vector,
            o + self.height_vector,
        ]
    }
}

// Fixed seeds keep definition order independent of process state
const IMAGE_HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Appends entities to a document
#[derive(Debug, Clone)]
pub struct EntityEmitter {
    images: AHashMap<u64, Vec<Handle>>,
    image_count: usize,
    pixel_size: f64,
}

impl EntityEmitter {
    /// Create an emitter. `pixel_size` is recorded on image definitions.
    pub fn new(pixel_size: f64) -> Self {
        EntityEmitter {
            images: AHashMap::new(),
            image_count: 0,
            pixel_size,
        }
    }

    /// Emit a stroked polyline
    ///
    /// An open polyline of two points becomes a `Line`.
    pub fn emit_polyline(
        &self,
        doc: &mut CadDocument,
        points: &[Vector2],
        closed: bool,
        style: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        let points = dedupe(points, closed);
        if points.len() < 2 {
            return Ok(None);
        }
        let closed = closed && points.len() >= 3;
        let mut entity = if !closed && points.len() == 2 {
            EntityType::Line(Line::from_points(points[0], points[1]))
        } else {
            EntityType::LwPolyline(LwPolyline::from_points(&points, closed))
        };
        style.apply(entity.as_entity_mut().common_mut(), layer);
        self.append(doc, entity).map(Some)
    }

    /// Emit one solid fill over all `rings`
    ///
    /// `outlines[i]`, when present, is the polyline drawn along `rings[i]`
    /// and becomes that loop's associated boundary. Rings without area are
    /// skipped.
    pub fn emit_fill(
        &self,
        doc: &mut CadDocument,
        rings: &[Vec<Vector2>],
        outlines: &[Option<Handle>],
        paint: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        self.emit_hatch(doc, Hatch::solid(), rings, outlines, paint, layer)
    }

    /// Emit a predefined pattern fill over all `rings`
    pub fn emit_pattern(
        &self,
        doc: &mut CadDocument,
        rings: &[Vec<Vector2>],
        pattern: HatchPattern,
        paint: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        self.emit_hatch(doc, Hatch::with_pattern(pattern), rings, &[], paint, layer)
    }

    fn emit_hatch(
        &self,
        doc: &mut CadDocument,
        mut hatch: Hatch,
        rings: &[Vec<Vector2>],
        outlines: &[Option<Handle>],
        paint: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        for (index, ring) in rings.iter().enumerate() {
            let ring = dedupe(ring, true);
            if !has_area(&ring) {
                continue;
            }
            let path = BoundaryPath::polyline(ring);
            match outlines.get(index).copied().flatten() {
                Some(handle) => hatch.add_path(path.with_boundary(handle)),
                None => hatch.add_path(path),
            }
        }
        if hatch.paths.is_empty() {
            return Ok(None);
        }
        paint.apply(&mut hatch.common, layer);
        self.append(doc, EntityType::Hatch(hatch)).map(Some)
    }

    /// Emit a cubic Bezier chain as a spline
    pub fn emit_spline(
        &self,
        doc: &mut CadDocument,
        control_points: Vec<Vector2>,
        closed: bool,
        style: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        if control_points.len() < 4 {
            return Ok(None);
        }
        let mut spline = Spline::from_bezier_chain(control_points, closed);
        style.apply(&mut spline.common, layer);
        self.append(doc, EntityType::Spline(spline)).map(Some)
    }

    /// Emit a native text entity. Empty strings emit nothing.
    pub fn emit_text(
        &self,
        doc: &mut CadDocument,
        mut text: Text,
        paint: &ResolvedStyle,
        layer: &str,
    ) -> Result<Option<Handle>> {
        if text.value.is_empty() {
            return Ok(None);
        }
        paint.apply(&mut text.common, layer);
        self.append(doc, EntityType::Text(text)).map(Some)
    }

    /// Emit a raster image
    ///
    /// Identical pixel buffers share one image definition. A clip region
    /// covering only part of the image becomes its clip boundary; an image
    /// clipped away entirely emits nothing.
    pub fn emit_image(
        &mut self,
        doc: &mut CadDocument,
        image: &ImageData,
        placement: &ImagePlacement,
        clip: &ClipRegion,
        clipper: &dyn PolygonClipper,
        layer: &str,
    ) -> Result<Option<Handle>> {
        image.validate()?;
        let corners = to_ccw(&placement.corners());
        validate_points(&corners, "image placement")?;
        let full_area = area(&corners);
        if full_area <= 0.0 {
            return Err(GeometryError::InvalidImage("image placement has no area".to_string()).into());
        }

        let outline = match clip.vertices() {
            None => None,
            Some(region) => {
                let pieces = clipper.clip_polygon(&corners, region);
                if pieces.is_empty() {
                    log::debug!("image clipped away entirely");
                    return Ok(None);
                }
                let visible: f64 = pieces.iter().map(|p| area(p)).sum();
                if visible >= full_area * (1.0 - 1e-9) {
                    None
                } else if pieces.len() == 1 {
                    pieces.into_iter().next()
                } else {
                    Some(convex_hull(&pieces.concat()))
                }
            }
        };

        let definition = self.definition_for(doc, image);
        let mut entity = {
            let def = doc.image_definition(definition).ok_or_else(|| {
                RenderError::Document(format!("image definition {} missing", definition))
            })?;
            RasterImage::placed(
                def,
                placement.origin,
                placement.width_vector / image.width as f64,
                placement.height_vector / image.height as f64,
            )
        };
        if let Some(outline) = outline {
            let pixels = outline.iter().map(|p| entity.to_pixel(*p)).collect();
            entity.set_clip_polygon(pixels);
        }
        entity.common.layer = layer.to_string();
        self.append(doc, EntityType::RasterImage(entity)).map(Some)
    }

    fn definition_for(&mut self, doc: &mut CadDocument, image: &ImageData) -> Handle {
        let [k0, k1, k2, k3] = IMAGE_HASH_SEEDS;
        let key = RandomState::with_seeds(k0, k1, k2, k3).hash_one((image.width, image.height, &image.rgba));
        if let Some(handles) = self.images.get(&key) {
            let existing = handles.iter().copied().find(|h| {
                doc.image_definition(*h).map_or(false, |def| {
                    def.width == image.width && def.height == image.height && def.pixels == image.rgba
                })
            });
            if let Some(handle) = existing {
                return handle;
            }
        }

        self.image_count += 1;
        let mut definition = ImageDefinition::new(
            format!("image_{}.png", self.image_count),
            image.width,
            image.height,
            image.rgba.clone(),
        );
        definition.pixel_size = Vector2::new(self.pixel_size, self.pixel_size);
        let handle = doc.add_image_definition(definition);
        log::debug!("created image definition {} ({}x{})", handle, image.width, image.height);
        self.images.entry(key).or_default().push(handle);
        handle
    }

    fn append(&self, doc: &mut CadDocument, entity: EntityType) -> Result<Handle> {
        let type_name = entity.type_name();
        let handle = doc.add_entity(entity)?;
        log::trace!("emitted {} {}", type_name, handle);
        Ok(handle)
    }
}

impl Default for EntityEmitter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
