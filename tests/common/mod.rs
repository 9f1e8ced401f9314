//! Shared test utilities for plotdxf integration tests.
//!
//! Consolidates the helpers every test crate needs (entity counting,
//! polygon checks, renderer setup) into a single module imported via
//! `mod common;`.

#![allow(dead_code)]

pub mod builders;

use plotdxf::entities::EntityType;
use plotdxf::geometry::polygon::area;
use plotdxf::notification::NotificationType;
use plotdxf::render::RenderOutput;
use plotdxf::{CadDocument, RenderConfig, Renderer, Vector2};
use std::collections::BTreeMap;

// ===========================================================================
// Renderer setup
// ===========================================================================

/// Renderer with the default configuration.
pub fn renderer() -> Renderer {
    Renderer::new(RenderConfig::default())
}

/// Finish a renderer, panicking on contract violations.
pub fn finish(mut renderer: Renderer) -> RenderOutput {
    renderer.finish().expect("session should finish cleanly")
}

// ===========================================================================
// Entity inspection
// ===========================================================================

/// DXF type names of all entities, in draw order.
pub fn entity_types(doc: &CadDocument) -> Vec<&'static str> {
    doc.entities().map(|e| e.type_name()).collect()
}

/// Count entities by DXF type name.
pub fn count_by_type(doc: &CadDocument) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for entity in doc.entities() {
        *counts.entry(entity.type_name()).or_insert(0) += 1;
    }
    counts
}

/// Vertices of every closed lightweight polyline, in draw order.
pub fn closed_polylines(doc: &CadDocument) -> Vec<Vec<Vector2>> {
    doc.entities()
        .filter_map(|e| match e {
            EntityType::LwPolyline(p) if p.is_closed => Some(p.points()),
            _ => None,
        })
        .collect()
}

/// Boundary loop count of every hatch, in draw order.
pub fn hatch_loop_counts(doc: &CadDocument) -> Vec<usize> {
    doc.entities()
        .filter_map(|e| match e {
            EntityType::Hatch(h) => Some(h.paths.len()),
            _ => None,
        })
        .collect()
}

/// Number of custom (non-standard) linetypes in the document.
pub fn custom_linetypes(doc: &CadDocument) -> usize {
    doc.line_types.custom().count()
}

/// Number of diagnostics of the given type.
pub fn diagnostics_of(output: &RenderOutput, nt: NotificationType) -> usize {
    output.diagnostics.count(nt)
}

// ===========================================================================
// Geometry assertions
// ===========================================================================

/// Assert that a polygon's area is within `tolerance` of `expected`.
pub fn assert_area(polygon: &[Vector2], expected: f64, tolerance: f64) {
    let actual = area(polygon);
    assert!(
        (actual - expected).abs() <= tolerance,
        "area {} differs from {} by more than {}",
        actual,
        expected,
        tolerance
    );
}

/// Assert that every vertex lies inside the axis-aligned box `min..max`.
pub fn assert_inside(polygon: &[Vector2], min: Vector2, max: Vector2) {
    const EPS: f64 = 1e-9;
    for p in polygon {
        assert!(
            p.x >= min.x - EPS && p.x <= max.x + EPS && p.y >= min.y - EPS && p.y <= max.y + EPS,
            "{} lies outside {}..{}",
            p,
            min,
            max
        );
    }
}
