//! Positions and closed rings.

use crate::error::DrawingError;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// A geographic position: `x` is longitude, `y` is latitude (WGS84 degrees).
pub type Position = Coord<f64>;

/// Minimum number of distinct vertices a polygon ring needs.
pub const MIN_RING_VERTICES: usize = 3;

/// Creates a position from longitude and latitude in degrees.
pub fn position(lon: f64, lat: f64) -> Position {
    Coord { x: lon, y: lat }
}

/// Returns true if the sequence starts and ends on the same coordinate.
pub fn is_closed(points: &[Position]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => points.len() > 1 && first == last,
        _ => false,
    }
}

/// Closes a sequence of positions into a ring.
///
/// Appends `points[0]` unless the sequence already ends on it, so calling
/// this on an already closed ring returns an identical ring.
pub fn close_ring(points: &[Position]) -> Result<Ring, DrawingError> {
    if points.len() < MIN_RING_VERTICES {
        return Err(DrawingError::InvalidGeometry(format!(
            "cannot close a ring from {} points",
            points.len()
        )));
    }

    let mut closed = points.to_vec();
    if !is_closed(points) {
        closed.push(points[0]);
    }
    Ok(Ring(closed))
}

/// Counts distinct coordinates in a ring, ignoring the closing duplicate.
pub fn distinct_vertex_count(points: &[Position]) -> usize {
    let open = if is_closed(points) {
        &points[..points.len() - 1]
    } else {
        points
    };

    let mut seen: Vec<Position> = Vec::with_capacity(open.len());
    for p in open {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}

/// A closed ring: the first and last positions are coordinate-equal.
///
/// Rings are built with [`close_ring`] (or [`Ring::close`]). Deserialized
/// rings are taken as-is and validated when measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<Position>);

impl Ring {
    /// Closes an open (or already closed) sequence into a ring.
    pub fn close(points: &[Position]) -> Result<Self, DrawingError> {
        close_ring(points)
    }

    /// All positions including the closing one.
    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    /// The editable vertices: every position except the closing duplicate.
    pub fn vertices(&self) -> &[Position] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn is_closed(&self) -> bool {
        is_closed(&self.0)
    }

    /// Consecutive position pairs around the ring.
    pub fn edges(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Moves a vertex, keeping the closing position coupled to vertex 0.
    pub fn set_vertex(&mut self, index: usize, position: Position) -> Result<(), DrawingError> {
        let count = self.vertex_count();
        if index >= count {
            return Err(DrawingError::InvalidGeometry(format!(
                "vertex {} out of range for a ring with {} vertices",
                index, count
            )));
        }

        let closed = self.is_closed();
        self.0[index] = position;
        if index == 0 && closed {
            let last = self.0.len() - 1;
            self.0[last] = position;
        }
        Ok(())
    }
}
