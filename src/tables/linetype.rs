//! Line type table entry

use super::TableEntry;
use crate::types::Handle;

/// Line type element (dash, dot, space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTypeElement {
    /// Length of the element (positive = dash, negative = space, 0 = dot)
    pub length: f64,
}

impl LineTypeElement {
    /// Create a dash element
    pub fn dash(length: f64) -> Self {
        LineTypeElement {
            length: length.abs(),
        }
    }

    /// Create a space element
    pub fn space(length: f64) -> Self {
        LineTypeElement {
            length: -length.abs(),
        }
    }

    /// Create a dot element
    pub fn dot() -> Self {
        LineTypeElement { length: 0.0 }
    }

    /// Check if this is a dash
    pub fn is_dash(&self) -> bool {
        self.length > 0.0
    }

    /// Check if this is a space
    pub fn is_space(&self) -> bool {
        self.length < 0.0
    }

    /// Check if this is a dot
    pub fn is_dot(&self) -> bool {
        self.length == 0.0
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    /// Unique handle
    pub handle: Handle,
    /// Line type name
    pub name: String,
    /// Description shown by CAD applications
    pub description: String,
    /// Pattern elements
    pub elements: Vec<LineTypeElement>,
}

impl LineType {
    pub const CONTINUOUS: &'static str = "Continuous";
    pub const BY_LAYER: &'static str = "ByLayer";
    pub const BY_BLOCK: &'static str = "ByBlock";

    /// Create a new line type without pattern elements
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            handle: Handle::NULL,
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
        }
    }

    /// Create the standard "Continuous" line type
    pub fn continuous() -> Self {
        LineType {
            description: "Solid line".to_string(),
            ..Self::new(Self::CONTINUOUS)
        }
    }

    /// Create the standard "ByLayer" line type
    pub fn by_layer() -> Self {
        Self::new(Self::BY_LAYER)
    }

    /// Create the standard "ByBlock" line type
    pub fn by_block() -> Self {
        Self::new(Self::BY_BLOCK)
    }

    /// Create a line type from pattern elements
    ///
    /// The description is an ASCII sketch of one period of the pattern.
    pub fn from_elements(name: impl Into<String>, elements: Vec<LineTypeElement>) -> Self {
        let description = elements
            .iter()
            .map(|e| if e.is_dash() { "__" } else if e.is_dot() { "." } else { " " })
            .collect::<String>();
        LineType {
            description,
            elements,
            ..Self::new(name)
        }
    }

    /// Total length of one pattern period
    pub fn pattern_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length.abs()).sum()
    }

    /// Check if this is a continuous line type
    pub fn is_continuous(&self) -> bool {
        self.elements.is_empty()
    }
}

impl TableEntry for LineType {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_standard(&self) -> bool {
        [Self::CONTINUOUS, Self::BY_LAYER, Self::BY_BLOCK]
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_line_types() {
        assert!(LineType::continuous().is_standard());
        assert!(LineType::continuous().is_continuous());
        assert!(LineType::by_layer().is_standard());
        assert!(!LineType::new("DASH_1").is_standard());
    }

    #[test]
    fn test_from_elements() {
        let lt = LineType::from_elements(
            "DASH_1",
            vec![
                LineTypeElement::dash(3.7),
                LineTypeElement::space(1.6),
                LineTypeElement::dot(),
                LineTypeElement::space(1.6),
            ],
        );
        assert_eq!(lt.elements.len(), 4);
        assert!(lt.elements[0].is_dash());
        assert!(lt.elements[1].is_space());
        assert!(lt.elements[2].is_dot());
        assert!((lt.pattern_length() - 6.9).abs() < 1e-12);
        assert_eq!(lt.description, "__ . ");
    }
}
