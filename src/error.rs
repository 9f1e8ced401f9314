//! Error types for plotdxf

use thiserror::Error;

/// Host/backend protocol violations. These end the render session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `end_scope` without a matching `begin_scope`
    #[error("end_scope called without a matching begin_scope")]
    UnbalancedScope,

    /// A call arrived after `finish`
    #[error("{0} called after the session was finalized")]
    AfterFinalize(&'static str),

    /// `finish` reached with scopes still open
    #[error("session finished with {0} unclosed scope(s)")]
    UnclosedScopes(usize),
}

/// Problems with a single primitive's geometry. Recovered locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// NaN or infinite coordinate
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    /// Transform collapses the plane
    #[error("degenerate transform (determinant {0:e})")]
    DegenerateTransform(f64),

    /// Path with segments but no starting point
    #[error("path segment before any move_to")]
    MissingMoveTo,

    /// Clip region could not be applied
    #[error("clip failed: {0}")]
    ClipFailed(String),

    /// Image with zero pixels or a buffer of the wrong size
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Main error type for plotdxf operations
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Fatal protocol violation
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    /// Recoverable geometry problem
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Font or glyph could not be resolved
    #[error("resource resolution error: {0}")]
    ResourceResolution(String),

    /// Document table or entity bookkeeping failed
    #[error("document error: {0}")]
    Document(String),
}

impl RenderError {
    /// Contract violations abort the session; everything else is recovered
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::ContractViolation(_))
    }
}

/// Result type alias for plotdxf operations
pub type Result<T> = std::result::Result<T, RenderError>;
