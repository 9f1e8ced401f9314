//! CAD document structure

use crate::entities::{EntityType, ImageDefinition};
use crate::error::RenderError;
use crate::tables::*;
use crate::types::{BoundingBox2D, Handle, Vector2};
use crate::Result;
use indexmap::IndexMap;

/// Drawing units (`$INSUNITS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionUnits {
    Unitless = 0,
    Inches = 1,
    #[default]
    Millimeters = 4,
    Centimeters = 5,
    Meters = 6,
}

/// Header variables the renderer writes
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVariables {
    /// EXTMIN - Lower-left drawing extent
    pub extents_min: Vector2,
    /// EXTMAX - Upper-right drawing extent
    pub extents_max: Vector2,
    /// INSUNITS - Insertion units
    pub insertion_units: InsertionUnits,
    /// LTSCALE - Global linetype scale
    pub linetype_scale: f64,
    /// CLAYER - Current layer name
    pub current_layer: String,
}

impl Default for HeaderVariables {
    fn default() -> Self {
        HeaderVariables {
            extents_min: Vector2::ZERO,
            extents_max: Vector2::ZERO,
            insertion_units: InsertionUnits::default(),
            linetype_scale: 1.0,
            current_layer: Layer::DEFAULT_NAME.to_string(),
        }
    }
}

/// A CAD document: header, tables, image definitions and the entity list
///
/// Entities are kept in insertion order, which is the draw order.
#[derive(Debug, Clone)]
pub struct CadDocument {
    /// Header variables
    pub header: HeaderVariables,

    /// Layer table
    pub layers: Table<Layer>,

    /// Line type table
    pub line_types: Table<LineType>,

    /// Image definitions referenced by raster images
    image_definitions: IndexMap<Handle, ImageDefinition>,

    /// All entities in draw order (indexed by handle)
    entities: IndexMap<Handle, EntityType>,

    /// Next handle to assign
    next_handle: u64,
}

impl CadDocument {
    /// Create a new empty CAD document
    pub fn new() -> Self {
        let mut doc = CadDocument {
            header: HeaderVariables::default(),
            layers: Table::new(),
            line_types: Table::new(),
            image_definitions: IndexMap::new(),
            entities: IndexMap::new(),
            // Start handle allocation above reserved table handles
            next_handle: 0x10,
        };
        doc.initialize_defaults();
        doc
    }

    /// Initialize default tables with standard entries
    fn initialize_defaults(&mut self) {
        let mut layer0 = Layer::layer_0();
        layer0.set_handle(self.allocate_handle());
        self.layers.add(layer0).ok();

        for mut line_type in [LineType::continuous(), LineType::by_layer(), LineType::by_block()] {
            line_type.set_handle(self.allocate_handle());
            self.line_types.add(line_type).ok();
        }
    }

    /// Allocate a new unique handle
    pub fn allocate_handle(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Get the next handle value (without allocating)
    pub fn next_handle(&self) -> u64 {
        self.next_handle
    }

    /// Add a layer, assigning its handle
    pub fn add_layer(&mut self, mut layer: Layer) -> Result<Handle> {
        let handle = self.allocate_handle();
        layer.set_handle(handle);
        self.layers.add(layer).map_err(RenderError::Document)?;
        Ok(handle)
    }

    /// Add a line type, assigning its handle
    pub fn add_line_type(&mut self, mut line_type: LineType) -> Result<Handle> {
        let handle = self.allocate_handle();
        line_type.set_handle(handle);
        self.line_types.add(line_type).map_err(RenderError::Document)?;
        Ok(handle)
    }

    /// Add an image definition, assigning its handle
    pub fn add_image_definition(&mut self, mut definition: ImageDefinition) -> Handle {
        let handle = self.allocate_handle();
        definition.handle = handle;
        self.image_definitions.insert(handle, definition);
        handle
    }

    /// Get an image definition by handle
    pub fn image_definition(&self, handle: Handle) -> Option<&ImageDefinition> {
        self.image_definitions.get(&handle)
    }

    /// Iterate over image definitions in creation order
    pub fn image_definitions(&self) -> impl Iterator<Item = &ImageDefinition> {
        self.image_definitions.values()
    }

    /// Add an entity to the end of the entity list
    pub fn add_entity(&mut self, mut entity: EntityType) -> Result<Handle> {
        // Allocate a handle if the entity doesn't have one
        let handle = if entity.as_entity().handle().is_null() {
            let h = self.allocate_handle();
            entity.as_entity_mut().set_handle(h);
            h
        } else {
            entity.as_entity().handle()
        };

        let layer = entity.common().layer.clone();
        if !self.layers.contains(&layer) {
            return Err(RenderError::Document(format!(
                "entity {} references unknown layer '{}'",
                handle, layer
            )));
        }
        let line_type = entity.common().line_type.clone();
        if !self.line_types.contains(&line_type) {
            return Err(RenderError::Document(format!(
                "entity {} references unknown line type '{}'",
                handle, line_type
            )));
        }
        if self.entities.contains_key(&handle) {
            return Err(RenderError::Document(format!("duplicate handle {}", handle)));
        }

        self.entities.insert(handle, entity);
        Ok(handle)
    }

    /// Get an entity by handle
    pub fn get_entity(&self, handle: Handle) -> Option<&EntityType> {
        self.entities.get(&handle)
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all entities in draw order
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.values()
    }

    /// Bounding box of every entity, `None` for an empty drawing
    pub fn extents(&self) -> Option<BoundingBox2D> {
        self.entities
            .values()
            .filter_map(|e| e.as_entity().bounding_box())
            .reduce(|a, b| a.merge(&b))
    }

    /// Write `$EXTMIN`/`$EXTMAX` from the given box
    pub fn set_extents(&mut self, extents: BoundingBox2D) {
        self.header.extents_min = extents.min;
        self.header.extents_max = extents.max;
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}
