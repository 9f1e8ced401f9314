//! Property tests for flattening, clipping and session bookkeeping.

mod common;

use common::builders::dashed;
use common::renderer;
use plotdxf::geometry::flatten::cubic_point;
use plotdxf::geometry::polygon::{area, dedupe};
use plotdxf::geometry::{flatten_path, ClipRegion, ConvexClipper, PolygonClipper};
use plotdxf::{BoundingBox2D, Path, Transform, Vector2};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Vector2> {
    (-100.0..100.0f64, -100.0..100.0f64).prop_map(|(x, y)| Vector2::new(x, y))
}

fn distance_to_polyline(p: Vector2, polyline: &[Vector2]) -> f64 {
    polyline
        .windows(2)
        .map(|w| p.distance_to_segment(&w[0], &w[1]))
        .fold(f64::INFINITY, f64::min)
}

proptest! {
    #[test]
    fn prop_flattening_stays_within_tolerance(
        p0 in point(),
        p1 in point(),
        p2 in point(),
        p3 in point(),
        tolerance in 0.001..1.0f64,
    ) {
        let path = Path::new().move_to(p0).cubic_to(p1, p2, p3);
        let subpaths = flatten_path(&path, &Transform::identity(), tolerance).unwrap();
        prop_assume!(subpaths.len() == 1);
        let polyline = &subpaths[0].points;

        prop_assert_eq!(polyline[0], p0);
        prop_assert!(polyline[polyline.len() - 1].approx_eq(&p3, 1e-9));
        for i in 0..=200 {
            let on_curve = cubic_point(p0, p1, p2, p3, i as f64 / 200.0);
            let d = distance_to_polyline(on_curve, polyline);
            prop_assert!(d <= tolerance + 1e-7, "deviation {} > {}", d, tolerance);
        }
    }

    #[test]
    fn prop_clip_inside_polygon_is_unchanged(
        x in -50.0..50.0f64,
        y in -50.0..50.0f64,
        w in 0.1..20.0f64,
        h in 0.1..20.0f64,
        margin in 0.01..10.0f64,
    ) {
        let subject = vec![
            Vector2::new(x, y),
            Vector2::new(x + w, y),
            Vector2::new(x + w / 2.0, y + h / 2.0),
            Vector2::new(x + w, y + h),
            Vector2::new(x, y + h),
        ];
        let clip = ClipRegion::rect(&BoundingBox2D::new(
            Vector2::new(x - margin, y - margin),
            Vector2::new(x + w + margin, y + h + margin),
        ));
        let region = clip.vertices().unwrap();
        let pieces = ConvexClipper::new().clip_polygon(&subject, region);

        prop_assert_eq!(pieces.len(), 1);
        let mut expected = dedupe(&subject, true);
        let mut actual = dedupe(&pieces[0], true);
        let key = |p: &Vector2| (p.x.to_bits(), p.y.to_bits());
        expected.sort_by_key(key);
        actual.sort_by_key(key);
        prop_assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            prop_assert!(a.approx_eq(e, 1e-9));
        }
        prop_assert!((area(&pieces[0]) - area(&subject)).abs() < 1e-9);
    }

    #[test]
    fn prop_linetypes_are_unique(choices in prop::collection::vec(0usize..4, 1..30)) {
        let patterns: [&[f64]; 4] = [&[4.0, 2.0], &[6.0, 2.0], &[1.0, 1.0, 3.0, 1.0], &[2.0, 5.0]];
        let mut r = renderer();
        for (i, choice) in choices.iter().enumerate() {
            r.set_style(dashed(patterns[*choice])).unwrap();
            let y = i as f64;
            r.draw_path(&Path::from_points(&[Vector2::new(0.0, y), Vector2::new(10.0, y)])).unwrap();
        }
        let mut distinct = choices.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let output = r.finish().unwrap();
        prop_assert_eq!(output.document.line_types.custom().count(), distinct.len());
        prop_assert_eq!(output.document.entity_count(), choices.len());
    }

    #[test]
    fn prop_balanced_scopes_restore_state(
        ops in prop::collection::vec((0u8..4, 0.5..4.0f64), 0..12),
    ) {
        let mut r = renderer();
        let before = r.current_state().clone();
        r.begin_scope().unwrap();
        for (kind, value) in &ops {
            match kind {
                0 => r.concat_transform(&Transform::scaling(*value, *value)).unwrap(),
                1 => r.set_layer(Some(format!("layer {}", value).as_str())).unwrap(),
                2 => r.set_clip_rect(&BoundingBox2D::new(Vector2::ZERO, Vector2::new(*value, *value))).unwrap(),
                _ => {
                    r.begin_scope().unwrap();
                    r.set_style(dashed(&[*value, 1.0])).unwrap();
                    r.end_scope().unwrap();
                }
            }
        }
        r.end_scope().unwrap();
        prop_assert_eq!(r.current_state(), &before);
        prop_assert_eq!(r.scope_depth(), 0);
    }
}
