//! Errors produced by the drawing and measurement core.
//!
//! None of these are fatal. Callers either absorb them (skip a degenerate
//! polygon, drop a pointer event while the map is loading) or turn them into
//! a non-blocking notice for the user.

/// Errors that can occur while drawing, editing or measuring polygons.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingError {
    /// A draft was closed with fewer vertices than a polygon needs.
    InsufficientVertices { required: usize, found: usize },
    /// A ring is malformed (not closed, too short, or collapsed).
    InvalidGeometry(String),
    /// The map projection is not ready yet (e.g. the base map is still loading).
    ProjectionUnavailable,
}

impl std::fmt::Display for DrawingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawingError::InsufficientVertices { required, found } => write!(
                f,
                "A polygon needs at least {} points ({} placed)",
                required, found
            ),
            DrawingError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            DrawingError::ProjectionUnavailable => write!(f, "Map projection is not ready"),
        }
    }
}

impl std::error::Error for DrawingError {}
