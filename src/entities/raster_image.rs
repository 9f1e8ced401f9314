//! Raster image entity and its shared image definition

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Handle, Vector2};
use bitflags::bitflags;

bitflags! {
    /// Image display flags (DXF group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImageDisplayFlags: u16 {
        /// Show image
        const SHOW_IMAGE = 1;
        /// Show image when not aligned with screen
        const SHOW_NOT_ALIGNED = 2;
        /// Use clipping boundary
        const USE_CLIPPING_BOUNDARY = 4;
        /// Transparency is on
        const TRANSPARENCY_ON = 8;
    }
}

impl Default for ImageDisplayFlags {
    fn default() -> Self {
        Self::SHOW_IMAGE | Self::SHOW_NOT_ALIGNED
    }
}

/// Image clip boundary, in pixel coordinates of the image
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipBoundary {
    /// No clipping
    #[default]
    None,
    /// Axis-aligned rectangle given by two opposite corners
    Rectangular(Vector2, Vector2),
    /// Closed polygon
    Polygonal(Vec<Vector2>),
}

/// Pixel data shared by every raster image that shows it
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDefinition {
    /// Object handle
    pub handle: Handle,
    /// File name the serializer writes the pixels to
    pub file_name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size of one pixel in document units
    pub pixel_size: Vector2,
    /// RGBA pixels, row-major, top row first
    pub pixels: Vec<u8>,
}

impl ImageDefinition {
    /// Create a definition over an RGBA buffer
    pub fn new(file_name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        ImageDefinition {
            handle: Handle::NULL,
            file_name: file_name.into(),
            width,
            height,
            pixel_size: Vector2::new(1.0, 1.0),
            pixels,
        }
    }
}

/// A raster image placed in the drawing
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Common entity data
    pub common: EntityCommon,
    /// Insertion point (lower-left corner)
    pub insertion_point: Vector2,
    /// Extent of one pixel along the image's x axis
    pub u_vector: Vector2,
    /// Extent of one pixel along the image's y axis
    pub v_vector: Vector2,
    /// Image size in pixels
    pub size: (u32, u32),
    /// Display flags
    pub flags: ImageDisplayFlags,
    /// Is clipping enabled?
    pub clipping_enabled: bool,
    /// Clip boundary
    pub clip_boundary: ClipBoundary,
    /// Handle of the image definition
    pub definition_handle: Handle,
}

impl RasterImage {
    /// Place an image at `insertion_point` with per-pixel axis vectors
    pub fn placed(
        definition: &ImageDefinition,
        insertion_point: Vector2,
        u_vector: Vector2,
        v_vector: Vector2,
    ) -> Self {
        RasterImage {
            common: EntityCommon::new(),
            insertion_point,
            u_vector,
            v_vector,
            size: (definition.width, definition.height),
            flags: ImageDisplayFlags::default(),
            clipping_enabled: false,
            clip_boundary: ClipBoundary::None,
            definition_handle: definition.handle,
        }
    }

    /// Place an image so that it fills the axis-aligned box `bounds`
    pub fn fit_to(definition: &ImageDefinition, bounds: &BoundingBox2D) -> Self {
        let width = definition.width.max(1) as f64;
        let height = definition.height.max(1) as f64;
        Self::placed(
            definition,
            bounds.min,
            Vector2::new(bounds.width() / width, 0.0),
            Vector2::new(0.0, bounds.height() / height),
        )
    }

    /// Clip the image to a polygon given in pixel coordinates
    pub fn set_clip_polygon(&mut self, vertices: Vec<Vector2>) {
        self.clip_boundary = ClipBoundary::Polygonal(vertices);
        self.clipping_enabled = true;
        self.flags |= ImageDisplayFlags::USE_CLIPPING_BOUNDARY;
    }

    /// Map a document point into pixel coordinates of this image, measured
    /// from the insertion corner along the u and v vectors
    pub fn to_pixel(&self, point: Vector2) -> Vector2 {
        let d = point - self.insertion_point;
        let det = self.u_vector.cross(&self.v_vector);
        if det == 0.0 {
            return Vector2::ZERO;
        }
        Vector2::new(d.cross(&self.v_vector) / det, self.u_vector.cross(&d) / det)
    }

    /// Corners of the placed image, counter-clockwise for a
    /// non-mirrored placement
    pub fn corners(&self) -> [Vector2; 4] {
        let u = self.u_vector * self.size.0 as f64;
        let v = self.v_vector * self.size.1 as f64;
        let p = self.insertion_point;
        [p, p + u, p + u + v, p + v]
    }
}

impl Entity for RasterImage {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points(&self.corners())
    }

    fn entity_type(&self) -> &'static str {
        "IMAGE"
    }
}
