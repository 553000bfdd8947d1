//! The in-progress polygon state machine.
//!
//! `Idle -> Drawing -> Idle`. A draft closes either by clicking near its
//! first vertex or through an explicit finish; both go through
//! [`DraftPolygonBuilder::close`].

use super::snap::{resolve, SnapHit};
use super::PointerSample;
use crate::error::DrawingError;
use crate::geo::{close_ring, Position, Ring, ScreenPos, ScreenProjection, MIN_RING_VERTICES};

/// Phase of the drawing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftPhase {
    #[default]
    Idle,
    Drawing,
}

/// The open, unclosed vertices of the polygon being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    pub points: Vec<Position>,
    pub phase: DraftPhase,
}

/// What a click did to the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum AddPointOutcome {
    /// The vertex was appended at `index`.
    Appended { index: usize, snapped: bool },
    /// The position is already a vertex of the draft and was dropped.
    Duplicate,
    /// The click landed on the first vertex and closed the draft.
    Closed(Ring),
}

/// Geometry for rendering the rubber band to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPreview {
    /// Placed vertices followed by the cursor
    pub line: Vec<Position>,
    /// Closed preview polygon once three vertices are placed
    pub polygon: Option<Ring>,
    /// Where the next vertex would go
    pub cursor: Position,
    pub snapped: bool,
}

/// Accumulates vertices for a new polygon.
#[derive(Debug, Clone)]
pub struct DraftPolygonBuilder {
    state: DraftState,
    snap_distance_px: f32,
}

impl DraftPolygonBuilder {
    pub fn new(snap_distance_px: f32) -> Self {
        Self {
            state: DraftState::default(),
            snap_distance_px,
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn points(&self) -> &[Position] {
        &self.state.points
    }

    pub fn is_drawing(&self) -> bool {
        self.state.phase == DraftPhase::Drawing
    }

    pub fn snap_distance_px(&self) -> f32 {
        self.snap_distance_px
    }

    pub fn set_snap_distance_px(&mut self, snap_distance_px: f32) {
        self.snap_distance_px = snap_distance_px;
    }

    /// Enters the drawing phase with an empty draft.
    pub fn start(&mut self) {
        if !self.state.points.is_empty() {
            log::debug!("Discarding {} stale draft points", self.state.points.len());
        }
        self.state.points.clear();
        self.state.phase = DraftPhase::Drawing;
    }

    /// Handles a primary click.
    ///
    /// Closes the draft if the pointer is within the snap distance of the
    /// first vertex and at least three vertices exist; otherwise appends the
    /// (possibly snapped) position. Placing a point while idle starts a new
    /// draft.
    pub fn add_point<P>(
        &mut self,
        sample: PointerSample,
        projection: &P,
        targets: &[Position],
    ) -> Result<AddPointOutcome, DrawingError>
    where
        P: ScreenProjection + ?Sized,
    {
        // Events that arrive before the map can project are dropped
        projection.project(sample.position)?;

        if !self.is_drawing() {
            self.start();
        }

        if self.snap_to_first(sample.screen, projection)?.is_some() {
            log::debug!("Pointer snapped to first vertex, closing draft");
            return self.close().map(AddPointOutcome::Closed);
        }

        let hit = self.snap_candidate(sample.screen, projection, targets)?;
        let (position, snapped) = match hit {
            Some(hit) => (hit.position, true),
            None => (sample.position, false),
        };

        if self.state.points.contains(&position) {
            log::debug!("Ignoring duplicate draft vertex {:?}", position);
            return Ok(AddPointOutcome::Duplicate);
        }

        self.state.points.push(position);
        let index = self.state.points.len() - 1;
        log::debug!("Draft vertex {} placed (snapped: {})", index, snapped);
        Ok(AddPointOutcome::Appended { index, snapped })
    }

    /// Returns the first vertex if the pointer would close the draft.
    pub fn snap_to_first<P>(
        &self,
        pointer: ScreenPos,
        projection: &P,
    ) -> Result<Option<SnapHit>, DrawingError>
    where
        P: ScreenProjection + ?Sized,
    {
        if self.state.points.len() < MIN_RING_VERTICES {
            return Ok(None);
        }
        resolve(
            pointer,
            &self.state.points[..1],
            projection,
            self.snap_distance_px,
            false,
        )
    }

    /// Finds the vertex the next point would snap to.
    ///
    /// Candidates are `targets` (vertices of committed polygons) followed by
    /// the draft's own vertices; the last placed vertex is never a candidate.
    pub fn snap_candidate<P>(
        &self,
        pointer: ScreenPos,
        projection: &P,
        targets: &[Position],
    ) -> Result<Option<SnapHit>, DrawingError>
    where
        P: ScreenProjection + ?Sized,
    {
        let mut candidates = Vec::with_capacity(targets.len() + self.state.points.len());
        candidates.extend_from_slice(targets);
        candidates.extend_from_slice(&self.state.points);

        let exclude_last = !self.state.points.is_empty();
        resolve(
            pointer,
            &candidates,
            projection,
            self.snap_distance_px,
            exclude_last,
        )
    }

    /// Preview geometry as if `cursor` (or the snap hit) were the next vertex.
    ///
    /// Never alters the draft. `None` until the first vertex is placed.
    pub fn preview_to(&self, cursor: Position, snap: Option<&SnapHit>) -> Option<DraftPreview> {
        if self.state.points.is_empty() {
            return None;
        }

        let target = snap.map(|hit| hit.position).unwrap_or(cursor);
        let mut line = self.state.points.clone();
        line.push(target);

        let polygon = if self.state.points.len() >= MIN_RING_VERTICES {
            close_ring(&line).ok()
        } else {
            None
        };

        Some(DraftPreview {
            line,
            polygon,
            cursor: target,
            snapped: snap.is_some(),
        })
    }

    /// Finishes the draft into a closed ring and returns to idle.
    ///
    /// With fewer than three vertices this fails and the draft is kept so
    /// the user can keep adding points.
    pub fn close(&mut self) -> Result<Ring, DrawingError> {
        let found = self.state.points.len();
        if found < MIN_RING_VERTICES {
            return Err(DrawingError::InsufficientVertices {
                required: MIN_RING_VERTICES,
                found,
            });
        }

        let ring = close_ring(&self.state.points)?;
        self.state = DraftState::default();
        log::debug!("Draft closed with {} vertices", ring.vertex_count());
        Ok(ring)
    }

    /// Discards the draft without producing a ring.
    pub fn cancel(&mut self) {
        if self.is_drawing() {
            log::debug!("Draft cancelled ({} points)", self.state.points.len());
        }
        self.state = DraftState::default();
    }
}

impl Default for DraftPolygonBuilder {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_SNAP_DISTANCE_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::super::snap::test_support::{PixelGrid, Scaled, Unready};
    use super::*;
    use crate::geo::position;

    /// Pointer sample for the one-degree-per-pixel test projection.
    fn at(x: f64, y: f64) -> PointerSample {
        PointerSample {
            screen: ScreenPos::new(x as f32, y as f32),
            position: position(x, y),
        }
    }

    fn triangle_builder() -> DraftPolygonBuilder {
        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
            builder.add_point(at(x, y), &PixelGrid, &[]).unwrap();
        }
        builder
    }

    #[test]
    fn test_points_accumulate() {
        let builder = triangle_builder();
        assert!(builder.is_drawing());
        assert_eq!(
            builder.points(),
            &[position(0.0, 0.0), position(100.0, 0.0), position(100.0, 100.0)]
        );
    }

    #[test]
    fn test_click_near_first_vertex_closes() {
        let mut builder = triangle_builder();
        let outcome = builder.add_point(at(4.0, 3.0), &PixelGrid, &[]).unwrap();

        let expected = close_ring(&[
            position(0.0, 0.0),
            position(100.0, 0.0),
            position(100.0, 100.0),
        ])
        .unwrap();
        assert_eq!(outcome, AddPointOutcome::Closed(expected));
        assert!(builder.points().is_empty());
        assert!(!builder.is_drawing());

        // A following click starts a fresh draft
        let outcome = builder.add_point(at(300.0, 300.0), &PixelGrid, &[]).unwrap();
        assert_eq!(
            outcome,
            AddPointOutcome::Appended {
                index: 0,
                snapped: false
            }
        );
        assert_eq!(builder.points(), &[position(300.0, 300.0)]);
    }

    #[test]
    fn test_unit_triangle_closes_on_snap() {
        let projection = Scaled(100.0);
        let sample = |x: f64, y: f64| PointerSample {
            screen: ScreenPos::new(x as f32, y as f32) * 100.0,
            position: position(x, y),
        };

        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            builder.add_point(sample(x, y), &projection, &[]).unwrap();
        }

        let outcome = builder.add_point(sample(0.0, 0.0), &projection, &[]).unwrap();
        let AddPointOutcome::Closed(ring) = outcome else {
            panic!("expected the draft to close");
        };
        assert_eq!(
            ring.positions(),
            &[
                position(0.0, 0.0),
                position(1.0, 0.0),
                position(1.0, 1.0),
                position(0.0, 0.0)
            ]
        );
        assert!(builder.points().is_empty());

        let outcome = builder.add_point(sample(5.0, 5.0), &projection, &[]).unwrap();
        assert!(matches!(outcome, AddPointOutcome::Appended { index: 0, .. }));
    }

    #[test]
    fn test_click_on_existing_vertex_is_dropped() {
        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        builder.add_point(at(0.0, 0.0), &PixelGrid, &[]).unwrap();
        builder.add_point(at(100.0, 0.0), &PixelGrid, &[]).unwrap();

        // Too few points to close; the first vertex is a snap candidate, so
        // the click resolves onto it and is dropped as a duplicate.
        let outcome = builder.add_point(at(3.0, 0.0), &PixelGrid, &[]).unwrap();
        assert_eq!(outcome, AddPointOutcome::Duplicate);
        assert_eq!(builder.points().len(), 2);
    }

    #[test]
    fn test_close_with_too_few_points_keeps_draft() {
        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        builder.add_point(at(0.0, 0.0), &PixelGrid, &[]).unwrap();
        builder.add_point(at(100.0, 0.0), &PixelGrid, &[]).unwrap();

        let result = builder.close();
        assert_eq!(
            result,
            Err(DrawingError::InsufficientVertices {
                required: 3,
                found: 2
            })
        );
        assert_eq!(builder.points(), &[position(0.0, 0.0), position(100.0, 0.0)]);
        assert!(builder.is_drawing());
    }

    #[test]
    fn test_explicit_finish_matches_snap_close() {
        let mut by_snap = triangle_builder();
        let mut by_finish = triangle_builder();

        let AddPointOutcome::Closed(snapped) =
            by_snap.add_point(at(1.0, 1.0), &PixelGrid, &[]).unwrap()
        else {
            panic!("expected the draft to close");
        };
        let finished = by_finish.close().unwrap();
        assert_eq!(snapped, finished);
    }

    #[test]
    fn test_cancel_discards_points() {
        let mut builder = triangle_builder();
        builder.cancel();
        assert!(builder.points().is_empty());
        assert_eq!(builder.state().phase, DraftPhase::Idle);
    }

    #[test]
    fn test_snaps_to_committed_vertex() {
        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        let neighbour = [position(200.0, 200.0)];

        let outcome = builder
            .add_point(at(205.0, 196.0), &PixelGrid, &neighbour)
            .unwrap();
        assert_eq!(
            outcome,
            AddPointOutcome::Appended {
                index: 0,
                snapped: true
            }
        );
        assert_eq!(builder.points(), &[position(200.0, 200.0)]);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let builder = triangle_builder();
        let before = builder.state().clone();

        let preview = builder.preview_to(position(0.0, 100.0), None).unwrap();
        assert_eq!(preview.line.len(), 4);
        assert_eq!(preview.cursor, position(0.0, 100.0));
        let polygon = preview.polygon.unwrap();
        assert!(polygon.is_closed());
        assert_eq!(polygon.vertex_count(), 4);

        assert_eq!(builder.state(), &before);
    }

    #[test]
    fn test_preview_uses_snap_position() {
        let builder = triangle_builder();
        let hit = builder
            .snap_candidate(ScreenPos::new(98.0, 2.0), &PixelGrid, &[])
            .unwrap()
            .unwrap();
        assert_eq!(hit.position, position(100.0, 0.0));

        let preview = builder.preview_to(position(98.0, 2.0), Some(&hit)).unwrap();
        assert!(preview.snapped);
        assert_eq!(preview.cursor, position(100.0, 0.0));
    }

    #[test]
    fn test_preview_never_snaps_to_last_vertex() {
        let builder = triangle_builder();
        let hit = builder
            .snap_candidate(ScreenPos::new(101.0, 101.0), &PixelGrid, &[])
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_preview_empty_draft() {
        let builder = DraftPolygonBuilder::new(15.0);
        assert!(builder.preview_to(position(1.0, 1.0), None).is_none());
    }

    #[test]
    fn test_unready_projection_drops_click() {
        let mut builder = DraftPolygonBuilder::new(15.0);
        builder.start();
        let result = builder.add_point(at(1.0, 1.0), &Unready, &[]);
        assert_eq!(result, Err(DrawingError::ProjectionUnavailable));
        assert!(builder.points().is_empty());
    }
}
