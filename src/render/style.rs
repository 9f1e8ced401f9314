//! Style resolution: host colors, widths, dashes and hatches to CAD
//! attributes, plus the session's layer and linetype bookkeeping

use super::config::{AlphaPolicy, ColorMode};
use crate::document::CadDocument;
use crate::entities::{EntityCommon, HatchPattern};
use crate::tables::{Layer, LineType, LineTypeElement};
use crate::types::{nearest_index, Color, LineWeight, Transparency};
use crate::Result;
use ahash::{AHashMap, AHashSet};

/// Host color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    /// Create a color with alpha
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// 8-bit RGB components, alpha ignored
    pub fn to_bytes(&self) -> (u8, u8, u8) {
        let byte = |c: f64| {
            if c.is_finite() {
                (c.clamp(0.0, 1.0) * 255.0).round() as u8
            } else {
                0
            }
        };
        (byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Dash pattern: alternating on/off lengths in points and a phase offset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    /// Phase offset into the pattern
    pub offset: f64,
    /// On/off lengths
    pub lengths: Vec<f64>,
}

impl DashPattern {
    /// Solid line
    pub fn solid() -> Self {
        Self::default()
    }

    /// Create a dash pattern
    pub fn new(offset: f64, lengths: Vec<f64>) -> Self {
        DashPattern { offset, lengths }
    }

    /// True when the pattern draws a continuous line
    pub fn is_solid(&self) -> bool {
        self.lengths.iter().all(|l| *l == 0.0)
    }
}

/// Host drawing style
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Stroke color, `None` for no outline
    pub stroke: Option<Rgba>,
    /// Fill color, `None` for no fill
    pub fill: Option<Rgba>,
    /// Line width in points
    pub line_width: f64,
    /// Dash pattern
    pub dash: DashPattern,
    /// Opacity multiplied into both colors' alpha
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            stroke: Some(Rgba::BLACK),
            fill: None,
            line_width: 1.0,
            dash: DashPattern::solid(),
            opacity: 1.0,
        }
    }
}

impl Style {
    /// Builder: stroke color
    pub fn with_stroke(mut self, color: Option<Rgba>) -> Self {
        self.stroke = color;
        self
    }

    /// Builder: fill color
    pub fn with_fill(mut self, color: Option<Rgba>) -> Self {
        self.fill = color;
        self
    }

    /// Builder: line width in points
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Builder: dash pattern
    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    /// Builder: opacity
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// CAD attributes of one emitted entity
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub color: Color,
    pub line_type: String,
    pub line_weight: LineWeight,
    pub transparency: Transparency,
}

impl ResolvedStyle {
    /// Copy the attributes and the layer onto an entity
    pub fn apply(&self, common: &mut EntityCommon, layer: &str) {
        common.layer = layer.to_string();
        common.color = self.color;
        common.line_type = self.line_type.clone();
        common.line_weight = self.line_weight;
        common.transparency = self.transparency;
    }
}

/// Convert a line width in points to the nearest standard lineweight
pub fn resolve_line_weight(points: f64) -> LineWeight {
    LineWeight::from_millimeters(points * 25.4 / 72.0)
}

/// Maps host style to CAD attributes for one session
#[derive(Debug, Clone)]
pub struct StyleResolver {
    color_mode: ColorMode,
    alpha_policy: AlphaPolicy,
    linetypes: LinetypeResolver,
}

impl StyleResolver {
    /// Create a resolver with the given policies
    pub fn new(color_mode: ColorMode, alpha_policy: AlphaPolicy) -> Self {
        StyleResolver {
            color_mode,
            alpha_policy,
            linetypes: LinetypeResolver::new(),
        }
    }

    /// Map a color to an entity color and transparency
    ///
    /// Returns `None` when the color is fully transparent; such shapes are
    /// not emitted.
    pub fn resolve_color(&self, color: &Rgba, opacity: f64) -> Option<(Color, Transparency)> {
        let alpha = unit(color.a) * unit(opacity);
        if alpha <= 0.0 {
            return None;
        }
        let (r, g, b) = color.to_bytes();
        let color = match self.color_mode {
            ColorMode::TrueColor => Color::from_rgb(r, g, b),
            // ACI 7 is drawn black on light backgrounds, white on dark ones
            ColorMode::Indexed if (r, g, b) == (0, 0, 0) => Color::Index(nearest_index(255, 255, 255)),
            ColorMode::Indexed => Color::Index(nearest_index(r, g, b)),
        };
        let transparency = match self.alpha_policy {
            AlphaPolicy::Transparency => Transparency::from_alpha(alpha),
            AlphaPolicy::Drop => Transparency::OPAQUE,
        };
        Some((color, transparency))
    }

    /// Resolve the stroke attributes of `style`
    ///
    /// `dash_scale` converts dash lengths to document units.
    pub fn resolve_stroke(
        &mut self,
        style: &Style,
        dash_scale: f64,
        doc: &mut CadDocument,
    ) -> Result<Option<ResolvedStyle>> {
        let Some((color, transparency)) = style
            .stroke
            .as_ref()
            .and_then(|c| self.resolve_color(c, style.opacity))
        else {
            return Ok(None);
        };
        let line_type = self.linetypes.resolve(&style.dash, dash_scale, doc)?;
        Ok(Some(ResolvedStyle {
            color,
            line_type,
            line_weight: resolve_line_weight(style.line_width),
            transparency,
        }))
    }

    /// Resolve the fill attributes of `style`
    pub fn resolve_fill(&self, style: &Style) -> Option<ResolvedStyle> {
        style
            .fill
            .as_ref()
            .and_then(|c| self.resolve_paint(c, style.opacity))
    }

    /// Attributes for an area or text painted in a single color
    pub fn resolve_paint(&self, color: &Rgba, opacity: f64) -> Option<ResolvedStyle> {
        let (color, transparency) = self.resolve_color(color, opacity)?;
        Some(ResolvedStyle {
            color,
            line_type: LineType::CONTINUOUS.to_string(),
            line_weight: LineWeight::Default,
            transparency,
        })
    }

    /// Resolve a dash pattern to a linetype name
    pub fn resolve_linetype(
        &mut self,
        dash: &DashPattern,
        dash_scale: f64,
        doc: &mut CadDocument,
    ) -> Result<String> {
        self.linetypes.resolve(dash, dash_scale, doc)
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Creates one linetype per distinct canonical dash pattern
#[derive(Debug, Clone, Default)]
pub struct LinetypeResolver {
    by_key: AHashMap<Vec<i64>, String>,
    next_id: usize,
}

/// Dash lengths are compared after rounding to `1 / DASH_QUANTA_PER_UNIT`
pub const DASH_QUANTA_PER_UNIT: f64 = 1e6;

impl LinetypeResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or create the linetype for `dash`
    pub fn resolve(&mut self, dash: &DashPattern, scale: f64, doc: &mut CadDocument) -> Result<String> {
        let Some(elements) = canonical_pattern(dash, scale) else {
            return Ok(LineType::CONTINUOUS.to_string());
        };
        let key: Vec<i64> = elements
            .iter()
            .map(|e| (e.length * DASH_QUANTA_PER_UNIT).round() as i64)
            .collect();
        if let Some(name) = self.by_key.get(&key) {
            return Ok(name.clone());
        }

        let name = loop {
            self.next_id += 1;
            let candidate = format!("DASH_{}", self.next_id);
            if !doc.line_types.contains(&candidate) {
                break candidate;
            }
        };
        doc.add_line_type(LineType::from_elements(name.clone(), elements))?;
        log::debug!("created linetype {} for dash pattern {:?}", name, dash.lengths);
        self.by_key.insert(key, name.clone());
        Ok(name)
    }
}

/// Canonical element list of a dash pattern, `None` for a solid line
///
/// Lengths are scaled and quantized, odd-length lists are doubled, the
/// phase offset is rotated into the pattern and repeated periods are
/// collapsed to one.
pub fn canonical_pattern(dash: &DashPattern, scale: f64) -> Option<Vec<LineTypeElement>> {
    let quantize = |v: f64| (v * DASH_QUANTA_PER_UNIT).round() / DASH_QUANTA_PER_UNIT;
    let mut lengths: Vec<f64> = dash.lengths.iter().map(|l| quantize((l * scale).abs())).collect();
    if lengths.is_empty() || lengths.iter().any(|l| !l.is_finite()) || lengths.iter().all(|l| *l == 0.0) {
        return None;
    }
    if lengths.len() % 2 == 1 {
        lengths = lengths.repeat(2);
    }

    // (length, is_dash)
    let mut pieces: Vec<(f64, bool)> = lengths.iter().enumerate().map(|(i, l)| (*l, i % 2 == 0)).collect();
    let total: f64 = lengths.iter().sum();
    let phase = if total > 0.0 && (dash.offset * scale).is_finite() {
        quantize((dash.offset * scale).rem_euclid(total))
    } else {
        0.0
    };
    if phase > 0.0 && phase < total {
        let mut acc = 0.0;
        for i in 0..pieces.len() {
            let (len, is_dash) = pieces[i];
            if acc + len > phase {
                let head = quantize(phase - acc);
                let mut rotated = vec![(len - head, is_dash)];
                rotated.extend_from_slice(&pieces[i + 1..]);
                rotated.extend_from_slice(&pieces[..i]);
                if head > 0.0 {
                    rotated.push((head, is_dash));
                }
                pieces = rotated;
                break;
            }
            acc += len;
        }
    }

    let mut elements: Vec<LineTypeElement> = pieces
        .into_iter()
        .filter(|(len, is_dash)| *is_dash || *len > 0.0)
        .map(|(len, is_dash)| {
            if !is_dash {
                LineTypeElement::space(len)
            } else if len == 0.0 {
                LineTypeElement::dot()
            } else {
                LineTypeElement::dash(len)
            }
        })
        .collect();

    // collapse [a, b, a, b] to [a, b]
    let n = elements.len();
    if let Some(period) = (1..n).find(|p| n % p == 0 && (0..n).all(|i| elements[i] == elements[i % p])) {
        elements.truncate(period);
    }
    Some(elements)
}

/// Maps requested layer names to unique, valid table names
#[derive(Debug, Clone, Default)]
pub struct LayerResolver {
    assigned: AHashMap<String, String>,
    claimed: AHashSet<String>,
    next_suffix: usize,
}

/// Characters DXF does not allow in table names
const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', '/', '\\', '"', ':', ';', '?', '*', '|', '=', ',', '`'];

/// Replace characters DXF forbids in layer names
pub fn sanitize_layer_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_control() || FORBIDDEN_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(255)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.to_string()
    }
}

impl LayerResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the layer for `requested`
    ///
    /// The same request always yields the same layer. Two requests whose
    /// sanitized names collide get distinct layers with a numeric suffix.
    pub fn resolve(&mut self, requested: &str, doc: &mut CadDocument) -> Result<String> {
        if let Some(name) = self.assigned.get(requested) {
            return Ok(name.clone());
        }
        let base = sanitize_layer_name(requested);
        let mut name = base.clone();
        while self.claimed.contains(&name.to_uppercase()) {
            self.next_suffix += 1;
            name = format!("{}_{}", base, self.next_suffix);
        }
        if !doc.layers.contains(&name) {
            doc.add_layer(Layer::new(name.clone()))?;
            log::debug!("created layer '{}' for '{}'", name, requested);
        }
        self.claimed.insert(name.to_uppercase());
        self.assigned.insert(requested.to_string(), name.clone());
        Ok(name)
    }
}

/// Document length that one hatch pattern unit covers at scale 1
pub const HATCH_BASE_CELL: f64 = 25.4;

/// Translate a host hatch string into predefined DXF patterns
///
/// Repeating a character raises its density. `cell` is the document
/// length of one host hatch cell (one inch). Unknown characters are
/// returned separately.
pub fn hatch_patterns(hatch: &str, cell: f64) -> (Vec<HatchPattern>, Vec<char>) {
    let mut counts: Vec<(&'static str, f64, usize)> = Vec::new();
    let mut unknown = Vec::new();
    for c in hatch.chars() {
        let (name, angle) = match c {
            '/' => ("ANSI31", 0.0),
            '\\' => ("ANSI31", 90.0),
            '|' => ("LINE", 90.0),
            '-' => ("LINE", 0.0),
            '+' => ("NET", 0.0),
            'x' | 'X' => ("ANSI37", 0.0),
            'o' | 'O' | '.' => ("DOTS", 0.0),
            '*' => ("STARS", 0.0),
            _ => {
                if !unknown.contains(&c) {
                    unknown.push(c);
                }
                continue;
            }
        };
        match counts.iter_mut().find(|(n, a, _)| *n == name && *a == angle) {
            Some(entry) => entry.2 += 1,
            None => counts.push((name, angle, 1)),
        }
    }
    let patterns = counts
        .into_iter()
        .map(|(name, angle, count)| {
            HatchPattern::new(name)
                .with_angle(angle)
                .with_scale(cell / (HATCH_BASE_CELL * count as f64))
        })
        .collect();
    (patterns, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableEntry;

    fn resolver() -> StyleResolver {
        StyleResolver::new(ColorMode::Indexed, AlphaPolicy::Transparency)
    }

    #[test]
    fn test_black_maps_to_white_index() {
        let (color, transparency) = resolver().resolve_color(&Rgba::BLACK, 1.0).unwrap();
        assert_eq!(color, Color::Index(7));
        assert!(transparency.is_opaque());
    }

    #[test]
    fn test_nearest_index() {
        let (color, _) = resolver().resolve_color(&Rgba::rgb(1.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(color, Color::RED);
    }

    #[test]
    fn test_true_color() {
        let resolver = StyleResolver::new(ColorMode::TrueColor, AlphaPolicy::Drop);
        let (color, transparency) = resolver.resolve_color(&Rgba::new(0.0, 0.0, 0.0, 0.5), 1.0).unwrap();
        assert_eq!(color, Color::from_rgb(0, 0, 0));
        assert!(transparency.is_opaque());
    }

    #[test]
    fn test_alpha_policy() {
        let (_, transparency) = resolver().resolve_color(&Rgba::new(0.2, 0.4, 0.6, 0.5), 0.5).unwrap();
        assert_eq!(transparency, Transparency::from_alpha(0.25));
        assert!(resolver().resolve_color(&Rgba::new(0.2, 0.4, 0.6, 0.0), 1.0).is_none());
        assert!(resolver().resolve_color(&Rgba::BLACK, 0.0).is_none());
    }

    #[test]
    fn test_line_weight() {
        assert_eq!(resolve_line_weight(0.0), LineWeight::Default);
        // 1pt = 0.3528mm
        assert_eq!(resolve_line_weight(1.0), LineWeight::W0_35);
        assert_eq!(resolve_line_weight(72.0), LineWeight::W2_11);
    }

    #[test]
    fn test_solid_dash_is_continuous() {
        let mut doc = CadDocument::new();
        let mut lt = LinetypeResolver::new();
        assert_eq!(lt.resolve(&DashPattern::solid(), 1.0, &mut doc).unwrap(), "Continuous");
        assert_eq!(lt.resolve(&DashPattern::new(0.0, vec![0.0, 0.0]), 1.0, &mut doc).unwrap(), "Continuous");
        assert_eq!(doc.line_types.custom().count(), 0);
    }

    #[test]
    fn test_same_pattern_reused() {
        let mut doc = CadDocument::new();
        let mut lt = LinetypeResolver::new();
        let a = lt.resolve(&DashPattern::new(0.0, vec![3.0, 1.0]), 1.0, &mut doc).unwrap();
        let b = lt.resolve(&DashPattern::new(0.0, vec![3.0, 1.0]), 1.0, &mut doc).unwrap();
        let c = lt.resolve(&DashPattern::new(0.0, vec![3.0, 1.0, 3.0, 1.0]), 1.0, &mut doc).unwrap();
        let d = lt.resolve(&DashPattern::new(0.0, vec![1.0, 1.0]), 1.0, &mut doc).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, d);
        assert_eq!(doc.line_types.custom().count(), 2);
        assert!(doc.line_types.get(&a).unwrap().handle().value() > 0);
    }

    #[test]
    fn test_canonical_pattern_phase() {
        let rotated = canonical_pattern(&DashPattern::new(1.0, vec![3.0, 2.0]), 1.0).unwrap();
        let lengths: Vec<f64> = rotated.iter().map(|e| e.length).collect();
        assert_eq!(lengths, vec![2.0, -2.0, 1.0]);

        let odd = canonical_pattern(&DashPattern::new(0.0, vec![2.0]), 1.0).unwrap();
        let lengths: Vec<f64> = odd.iter().map(|e| e.length).collect();
        assert_eq!(lengths, vec![2.0, -2.0]);

        let scaled = canonical_pattern(&DashPattern::new(0.0, vec![1.0, 0.5]), 2.0).unwrap();
        assert_eq!(scaled[0].length, 2.0);
    }

    #[test]
    fn test_layer_resolver() {
        let mut doc = CadDocument::new();
        let mut layers = LayerResolver::new();
        assert_eq!(layers.resolve("0", &mut doc).unwrap(), "0");
        assert_eq!(layers.resolve("axes/1", &mut doc).unwrap(), "axes_1");
        assert_eq!(layers.resolve("axes_1", &mut doc).unwrap(), "axes_1_1");
        assert_eq!(layers.resolve("AXES:1", &mut doc).unwrap(), "AXES_1_2");
        assert_eq!(layers.resolve("axes/1", &mut doc).unwrap(), "axes_1");
        assert_eq!(doc.layers.len(), 4);
    }

    #[test]
    fn test_sanitize_layer_name() {
        assert_eq!(sanitize_layer_name("a<b>c"), "a_b_c");
        assert_eq!(sanitize_layer_name("  "), "_");
        assert_eq!(sanitize_layer_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_hatch_patterns() {
        let (patterns, unknown) = hatch_patterns("//x?", 25.4);
        assert_eq!(unknown, vec!['?']);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].name, "ANSI31");
        assert_eq!(patterns[0].scale, 0.5);
        assert_eq!(patterns[1].name, "ANSI37");
        assert_eq!(patterns[1].scale, 1.0);

        let (patterns, _) = hatch_patterns("\\|", 25.4);
        assert_eq!(patterns[0].angle, 90.0);
        assert_eq!(patterns[1].name, "LINE");
    }
}
