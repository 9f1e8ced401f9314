//! Render a small demo plot and print what ends up in the drawing.
//!
//! ## Usage
//!     RUST_LOG=debug cargo run --bin render_demo -- [--true-color] [--splines]
//!
//! Prints the layer and linetype tables, one line per entity in draw order,
//! and every diagnostic recorded during the session.

use anyhow::{bail, Context, Result};
use plotdxf::render::{ColorMode, DashPattern, HorizontalAlign, PathCollection, VerticalAlign};
use plotdxf::{
    BoundingBox2D, DrawCommand, Path, RenderConfig, Renderer, Rgba, Style, TableEntry, TextOptions,
    Transform, Vector2,
};

fn demo_commands() -> Vec<DrawCommand> {
    let frame = BoundingBox2D::new(Vector2::new(60.0, 40.0), Vector2::new(580.0, 440.0));
    let series: Vec<Vector2> = (0..=60)
        .map(|i| {
            let x = i as f64 * 0.2;
            Vector2::new(x, (x * 1.3).sin() * 3.0 + 5.0)
        })
        .collect();

    vec![
        DrawCommand::OpenGroup("figure".to_string()),
        DrawCommand::DrawPath(Path::rect(frame.min, frame.width(), frame.height())),
        DrawCommand::OpenGroup("axes".to_string()),
        DrawCommand::BeginScope,
        DrawCommand::SetClip(Some(frame.corners().to_vec())),
        DrawCommand::SetTransform(Transform::scaling(40.0, 40.0).then(&Transform::translation(60.0, 40.0))),
        DrawCommand::SetStyle(
            Style::default()
                .with_stroke(Some(Rgba::rgb(0.12, 0.47, 0.71)))
                .with_line_width(1.5),
        ),
        DrawCommand::DrawPath(Path::from_points(&series)),
        DrawCommand::SetStyle(
            Style::default()
                .with_stroke(Some(Rgba::rgb(1.0, 0.5, 0.05)))
                .with_dash(DashPattern::new(0.0, vec![3.7, 1.6])),
        ),
        DrawCommand::DrawPath(Path::from_points(&[Vector2::new(0.0, 5.0), Vector2::new(14.0, 5.0)])),
        DrawCommand::SetStyle(Style::default().with_fill(Some(Rgba::new(0.17, 0.63, 0.17, 0.6)))),
        DrawCommand::SetHatch(Some("xx".to_string()), Rgba::BLACK),
        DrawCommand::DrawPath(Path::circle(Vector2::new(11.0, 8.0), 1.5)),
        DrawCommand::SetHatch(None, Rgba::BLACK),
        DrawCommand::DrawPathCollection(
            PathCollection::new(vec![Path::circle(Vector2::ZERO, 0.1)])
                .with_offsets(series.iter().step_by(10).copied().collect())
                .with_face_colors(vec![Rgba::rgb(0.84, 0.15, 0.16)]),
        ),
        DrawCommand::EndScope,
        DrawCommand::CloseGroup("axes".to_string()),
        DrawCommand::DrawText {
            position: Vector2::new(320.0, 20.0),
            text: "$x\\/[\\mathbf{s}]$".to_string(),
            font: None,
            options: TextOptions::default().with_alignment(HorizontalAlign::Center, VerticalAlign::Top),
        },
        DrawCommand::DrawText {
            position: Vector2::new(30.0, 240.0),
            text: "\u{2212}amplitude".to_string(),
            font: None,
            options: TextOptions::default().with_angle(90.0),
        },
        DrawCommand::CloseGroup("figure".to_string()),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config = RenderConfig::default().with_layer_per_group(true);
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--true-color" => config = config.with_color_mode(ColorMode::TrueColor),
            "--splines" => config = config.with_native_splines(true),
            other => bail!("unknown argument '{}'", other),
        }
    }

    let mut renderer = Renderer::new(config);
    for (i, command) in demo_commands().iter().enumerate() {
        renderer
            .execute(command)
            .with_context(|| format!("command #{} failed", i + 1))?;
    }
    let output = renderer.finish().context("finishing the session")?;
    let doc = &output.document;

    println!("layers:");
    for layer in doc.layers.iter() {
        println!("  {}", layer.name());
    }
    println!("linetypes:");
    for line_type in doc.line_types.custom() {
        println!("  {} {}", line_type.name(), line_type.description);
    }
    println!("entities ({}):", doc.entity_count());
    for entity in doc.entities() {
        let common = entity.common();
        println!(
            "  {} {:<10} layer={} color={} linetype={}",
            common.handle, entity.type_name(), common.layer, common.color, common.line_type
        );
    }
    println!(
        "extents: {} .. {}",
        doc.header.extents_min, doc.header.extents_max
    );
    for notification in output.diagnostics.iter() {
        println!("diagnostic: {}", notification);
    }
    Ok(())
}
