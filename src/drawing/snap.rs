//! Snapping pointer positions to nearby vertices.
//!
//! Candidates live in geographic space, the threshold in screen pixels, so
//! every candidate goes through the caller's projection before comparing.

use crate::error::DrawingError;
use crate::geo::{Position, ScreenPos, ScreenProjection};

/// The candidate a pointer snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapHit {
    /// Index into the candidate slice
    pub index: usize,
    /// The candidate's geographic position
    pub position: Position,
    /// Screen distance from the pointer in pixels
    pub screen_distance: f32,
}

/// Finds the closest candidate within `threshold_px` of the pointer.
///
/// With `exclude_last` the final candidate is skipped, so a point that is
/// about to be placed never snaps onto itself. Ties keep the earliest
/// candidate. Returns `Ok(None)` when nothing is in range.
pub fn resolve<P>(
    pointer: ScreenPos,
    candidates: &[Position],
    projection: &P,
    threshold_px: f32,
    exclude_last: bool,
) -> Result<Option<SnapHit>, DrawingError>
where
    P: ScreenProjection + ?Sized,
{
    let considered = if exclude_last {
        candidates.len().saturating_sub(1)
    } else {
        candidates.len()
    };

    let mut best: Option<SnapHit> = None;
    for (index, candidate) in candidates.iter().take(considered).enumerate() {
        let screen = projection.project(*candidate)?;
        let screen_distance = screen.distance(pointer);
        if screen_distance > threshold_px {
            continue;
        }
        let closer = match best {
            Some(current) => screen_distance < current.screen_distance,
            None => true,
        };
        if closer {
            best = Some(SnapHit {
                index,
                position: *candidate,
                screen_distance,
            });
        }
    }

    Ok(best)
}
