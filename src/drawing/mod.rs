//! Pointer-driven drawing: snapping, the draft state machine and vertex editing.

mod draft;
mod editor;
mod snap;

pub use draft::{AddPointOutcome, DraftPhase, DraftPolygonBuilder, DraftPreview, DraftState};
pub use editor::{on_vertex_drag, HandleId, PolygonEditor, VertexHandle};
pub use snap::{resolve as resolve_snap, SnapHit};

#[cfg(test)]
pub(crate) use snap::test_support;

use crate::geo::{Position, ScreenPos};

/// A pointer event: where it happened on screen and on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub screen: ScreenPos,
    pub position: Position,
}

impl PointerSample {
    pub fn new(screen: ScreenPos, position: Position) -> Self {
        Self { screen, position }
    }
}
