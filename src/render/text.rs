//! Text handling: markup clean-up, alignment mapping and glyph outlines

use crate::entities::{TextHorizontalAlignment, TextVerticalAlignment};
use crate::geometry::Path;
use crate::types::{Transform, Vector2};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until},
    character::complete::{anychar, char},
    combinator::{map, value},
    multi::many0,
    sequence::delimited,
    IResult,
};

/// Font requested by the host
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Family name
    pub family: String,
    /// Size in points
    pub size: f64,
    /// Bold weight
    pub bold: bool,
    /// Italic style
    pub italic: bool,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        FontDescriptor {
            family: "DejaVu Sans".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
        }
    }
}

impl FontDescriptor {
    /// Create a regular font
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        FontDescriptor {
            family: family.into(),
            size,
            ..Self::default()
        }
    }
}

/// Host horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Host vertical alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
    #[default]
    Baseline,
    CenterBaseline,
}

/// Whether alignment is applied before or after rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Align the rotated text's bounding box
    #[default]
    Default,
    /// Rotate about the alignment anchor
    Anchor,
}

/// Per-call text placement options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextOptions {
    /// Rotation in degrees, counter-clockwise
    pub angle: f64,
    pub halign: HorizontalAlign,
    pub valign: VerticalAlign,
    pub rotation_mode: RotationMode,
}

impl TextOptions {
    /// Builder: rotation in degrees
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Builder: alignment
    pub fn with_alignment(mut self, halign: HorizontalAlign, valign: VerticalAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    /// Builder: rotation mode
    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }
}

/// Map host alignment to DXF text alignment
///
/// Vertical text that is not anchored is right-aligned, which is where a
/// rotated default-mode label ends up.
pub fn map_alignment(options: &TextOptions) -> (TextHorizontalAlignment, TextVerticalAlignment) {
    let horizontal = if options.angle == 90.0 && options.rotation_mode != RotationMode::Anchor {
        TextHorizontalAlignment::Right
    } else {
        match options.halign {
            HorizontalAlign::Left => TextHorizontalAlignment::Left,
            HorizontalAlign::Center => TextHorizontalAlignment::Center,
            HorizontalAlign::Right => TextHorizontalAlignment::Right,
        }
    };
    let vertical = match options.valign {
        VerticalAlign::Top => TextVerticalAlignment::Top,
        VerticalAlign::Center | VerticalAlign::CenterBaseline => TextVerticalAlignment::Middle,
        VerticalAlign::Bottom => TextVerticalAlignment::Bottom,
        VerticalAlign::Baseline => TextVerticalAlignment::Baseline,
    };
    (horizontal, vertical)
}

/// Turn host text into plain text
///
/// The minus sign U+2212 becomes `-`. Strings starting with `$` are math
/// markup: `$` delimiters are dropped, `\mathbf{x}` becomes `x` and the
/// `\/` spacing command becomes a space.
pub fn clean_text(text: &str) -> String {
    let text = text.replace('\u{2212}', "-");
    if text.starts_with('$') {
        strip_markup(&text)
    } else {
        text
    }
}

fn strip_markup(input: &str) -> String {
    match many0(markup_token)(input) {
        Ok((rest, parts)) => parts.concat() + rest,
        Err(_) => input.to_string(),
    }
}

fn markup_token(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(tag("\\mathbf{"), take_until("}"), char('}')),
            strip_markup,
        ),
        value(" ".to_string(), tag("\\/")),
        value(String::new(), char('$')),
        map(is_not("\\$"), str::to_string),
        map(anychar, String::from),
    ))(input)
}

/// Glyph outline in em units, origin on the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Closed contours
    pub outline: Path,
    /// Horizontal advance
    pub advance: f64,
}

/// Cap height relative to the em square
pub const CAP_HEIGHT: f64 = 0.7;

impl Glyph {
    /// Box drawn for characters the provider cannot outline
    pub fn placeholder() -> Self {
        Glyph {
            outline: Path::rect(Vector2::new(0.05, 0.0), 0.5, CAP_HEIGHT),
            advance: 0.6,
        }
    }
}

/// Font outline provider, handed to a session as a resource
pub trait GlyphOutlines: Send + Sync {
    /// True when outlines for `font` are available
    fn has_font(&self, font: &FontDescriptor) -> bool;

    /// Outline of one character, `None` when the font lacks it
    fn glyph(&self, font: &FontDescriptor, ch: char) -> Option<Glyph>;
}

/// Laid-out text outline
#[derive(Debug, Clone, PartialEq)]
pub struct TextOutline {
    /// All glyph contours in document coordinates
    pub path: Path,
    /// Characters replaced by placeholders
    pub missing: Vec<char>,
}

/// Lay out `text` as glyph outlines
///
/// `em` is the em size in document units and `origin` the anchor point in
/// document coordinates.
pub fn layout_outline(
    provider: &dyn GlyphOutlines,
    font: &FontDescriptor,
    text: &str,
    em: f64,
    origin: Vector2,
    options: &TextOptions,
) -> TextOutline {
    let mut glyphs = Vec::new();
    let mut missing = Vec::new();
    let mut pen = 0.0;
    for ch in text.chars() {
        let glyph = match provider.glyph(font, ch) {
            Some(glyph) => glyph,
            None if ch.is_whitespace() => Glyph {
                outline: Path::new(),
                advance: 0.5,
            },
            None => {
                missing.push(ch);
                Glyph::placeholder()
            }
        };
        glyphs.push((pen, glyph.outline));
        pen += glyph.advance;
    }

    let dx = match options.halign {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => -pen / 2.0,
        HorizontalAlign::Right => -pen,
    };
    let dy = match options.valign {
        VerticalAlign::Top => -CAP_HEIGHT,
        VerticalAlign::Center => -CAP_HEIGHT / 2.0,
        VerticalAlign::Bottom => 0.25,
        VerticalAlign::Baseline | VerticalAlign::CenterBaseline => 0.0,
    };
    let placement = Transform::translation(dx, dy)
        .then(&Transform::scaling(em, em))
        .then(&Transform::rotation(options.angle.to_radians()))
        .then(&Transform::translation(origin.x, origin.y));

    let mut path = Path::new();
    for (offset, outline) in glyphs {
        path.extend(&outline.translated(Vector2::new(offset, 0.0)).transformed(&placement));
    }
    TextOutline { path, missing }
}
