//! Command-list builders shared by integration tests and benchmarks.
//!
//! `figure_commands()` produces a small but complete plot: axes frame,
//! dashed grid, a filled and hatched patch, markers, labels and an image,
//! nested in scopes and groups the way a plotting host issues them.

#![allow(dead_code)]

use plotdxf::render::{DashPattern, PathCollection};
use plotdxf::{
    BoundingBox2D, DrawCommand, FontDescriptor, ImageData, Path, Rgba, Style, TextOptions, Transform, Vector2,
};

/// Unit square `(0,0)..(1,1)`.
pub fn unit_square() -> Path {
    Path::rect(Vector2::ZERO, 1.0, 1.0)
}

/// Open two-point line.
pub fn segment(from: (f64, f64), to: (f64, f64)) -> Path {
    Path::from_points(&[Vector2::new(from.0, from.1), Vector2::new(to.0, to.1)])
}

/// Style with a dash pattern in points.
pub fn dashed(lengths: &[f64]) -> Style {
    Style::default().with_dash(DashPattern::new(0.0, lengths.to_vec()))
}

/// A 2x2 checkerboard image.
pub fn checkerboard() -> ImageData {
    let black = [0u8, 0, 0, 255];
    let white = [255u8, 255, 255, 255];
    let pixels = [black, white, white, black].concat();
    ImageData::new(2, 2, pixels)
}

/// Commands of a complete figure.
pub fn figure_commands() -> Vec<DrawCommand> {
    let frame = BoundingBox2D::new(Vector2::new(80.0, 60.0), Vector2::new(560.0, 420.0));
    let mut commands = vec![
        DrawCommand::OpenGroup("figure".to_string()),
        DrawCommand::BeginScope,
        DrawCommand::SetStyle(Style::default().with_line_width(0.8)),
        DrawCommand::DrawPath(Path::rect(frame.min, frame.width(), frame.height())),
        DrawCommand::OpenGroup("axes".to_string()),
        DrawCommand::BeginScope,
        DrawCommand::SetClip(Some(frame.corners().to_vec())),
        DrawCommand::SetStyle(dashed(&[3.7, 1.6])),
    ];
    for i in 1..6 {
        let x = 80.0 + 80.0 * i as f64;
        commands.push(DrawCommand::DrawPath(segment((x, 60.0), (x, 420.0))));
    }

    commands.extend([
        DrawCommand::BeginScope,
        DrawCommand::SetTransform(Transform::scaling(40.0, 30.0).then(&Transform::translation(80.0, 60.0))),
        DrawCommand::SetStyle(Style::default().with_fill(Some(Rgba::new(0.1, 0.4, 0.8, 0.5)))),
        DrawCommand::SetHatch(Some("//".to_string()), Rgba::BLACK),
        DrawCommand::DrawPath(Path::circle(Vector2::new(6.0, 6.0), 3.0)),
        DrawCommand::SetHatch(None, Rgba::BLACK),
        DrawCommand::SetStyle(Style::default().with_stroke(Some(Rgba::rgb(0.8, 0.1, 0.1)))),
        DrawCommand::DrawPath(Path::from_points(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 4.0),
            Vector2::new(4.0, 3.0),
            Vector2::new(8.0, 9.0),
            Vector2::new(13.0, 11.0),
        ])),
        DrawCommand::DrawMarkers {
            marker: Path::circle(Vector2::ZERO, 1.0),
            marker_transform: Transform::scaling(3.0, 3.0),
            path: Path::from_points(&[Vector2::new(2.0, 4.0), Vector2::new(4.0, 3.0)]),
        },
        DrawCommand::DrawPathCollection(
            PathCollection::new(vec![Path::rect(Vector2::ZERO, 0.5, 0.5)])
                .with_offsets(vec![Vector2::new(9.0, 1.0), Vector2::new(10.0, 1.0)])
                .with_face_colors(vec![Rgba::rgb(0.0, 1.0, 0.0)]),
        ),
        DrawCommand::DrawImage {
            bounds: BoundingBox2D::new(Vector2::new(9.0, 8.0), Vector2::new(11.0, 10.0)),
            image: checkerboard(),
        },
        DrawCommand::EndScope,
        DrawCommand::EndScope,
        DrawCommand::CloseGroup("axes".to_string()),
        DrawCommand::DrawText {
            position: Vector2::new(320.0, 40.0),
            text: "time [s]".to_string(),
            font: Some(FontDescriptor::new("DejaVu Sans", 12.0)),
            options: TextOptions::default().with_alignment(
                plotdxf::render::HorizontalAlign::Center,
                plotdxf::render::VerticalAlign::Top,
            ),
        },
        DrawCommand::DrawText {
            position: Vector2::new(40.0, 240.0),
            text: "$\\mathbf{amplitude}$ \u{2212}".to_string(),
            font: None,
            options: TextOptions::default().with_angle(90.0),
        },
        DrawCommand::EndScope,
        DrawCommand::CloseGroup("figure".to_string()),
    ]);
    commands
}
