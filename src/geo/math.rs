//! Geometry math on geographic positions.
//!
//! Distances and bearings are great-circle (Haversine, mean earth radius).
//! Area is the spherical-excess approximation of Chamberlain & Duquette,
//! which is accurate well beyond roof-sized polygons.

use super::ring::{distinct_vertex_count, is_closed, Position, MIN_RING_VERTICES};
use crate::error::DrawingError;
use geo::{Bearing, Centroid, ChamberlainDuquetteArea, Distance, Haversine};
use geo_types::{LineString, Point, Polygon};

/// Great-circle distance between two positions, in meters.
pub fn distance(a: Position, b: Position) -> f64 {
    Haversine::distance(Point::from(a), Point::from(b))
}

/// Initial bearing from `a` to `b`, in degrees within (-180, 180].
pub fn bearing(a: Position, b: Position) -> f64 {
    normalize_bearing(Haversine::bearing(Point::from(a), Point::from(b)))
}

/// Wraps any angle in degrees into (-180, 180].
pub fn normalize_bearing(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Arithmetic mean of two positions (not the geodesic midpoint).
pub fn midpoint(a: Position, b: Position) -> Position {
    Position {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Checks that `ring` is closed and has at least three distinct vertices.
pub fn validate_ring(ring: &[Position]) -> Result<(), DrawingError> {
    if !is_closed(ring) {
        return Err(DrawingError::InvalidGeometry("ring is not closed".to_string()));
    }
    if ring.len() < MIN_RING_VERTICES + 1 {
        return Err(DrawingError::InvalidGeometry(format!(
            "ring has {} positions, need at least {}",
            ring.len(),
            MIN_RING_VERTICES + 1
        )));
    }
    let distinct = distinct_vertex_count(ring);
    if distinct < MIN_RING_VERTICES {
        return Err(DrawingError::InvalidGeometry(format!(
            "ring has only {} distinct vertices",
            distinct
        )));
    }
    Ok(())
}

/// Area enclosed by a closed ring, in square meters (always non-negative).
pub fn area(ring: &[Position]) -> Result<f64, DrawingError> {
    validate_ring(ring)?;
    Ok(to_polygon(ring).chamberlain_duquette_unsigned_area())
}

/// Sum of the great-circle lengths of consecutive segments around a closed ring.
pub fn perimeter(ring: &[Position]) -> Result<f64, DrawingError> {
    validate_ring(ring)?;
    Ok(path_length(ring))
}

/// Length of an open path in meters. Zero for fewer than two positions.
pub fn path_length(points: &[Position]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Planar centroid of a closed ring, used for placing area labels.
pub fn centroid(ring: &[Position]) -> Option<Position> {
    if ring.len() < MIN_RING_VERTICES {
        return None;
    }
    to_polygon(ring).centroid().map(|p| p.0)
}

fn to_polygon(ring: &[Position]) -> Polygon<f64> {
    Polygon::new(LineString::from(ring.to_vec()), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ring::{close_ring, position};

    fn small_square() -> Vec<Position> {
        vec![
            position(0.0, 0.0),
            position(0.0, 0.001),
            position(0.001, 0.001),
            position(0.001, 0.0),
            position(0.0, 0.0),
        ]
    }

    #[test]
    fn test_distance_one_millidegree_at_equator() {
        let d = distance(position(0.0, 0.0), position(0.001, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = position(0.0, 0.0);
        assert!(bearing(origin, position(0.0, 1.0)).abs() < 1e-6);
        assert!((bearing(origin, position(1.0, 0.0)) - 90.0).abs() < 1e-6);
        assert!((bearing(origin, position(0.0, -1.0)) - 180.0).abs() < 1e-6);
        assert!((bearing(origin, position(-1.0, 0.0)) + 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_bearing_range() {
        assert_eq!(normalize_bearing(270.0), -90.0);
        assert_eq!(normalize_bearing(-180.0), 180.0);
        assert_eq!(normalize_bearing(180.0), 180.0);
        assert_eq!(normalize_bearing(540.0), 180.0);
        assert_eq!(normalize_bearing(-30.0), -30.0);
    }

    #[test]
    fn test_midpoint_is_arithmetic_mean() {
        let m = midpoint(position(7.0, 51.0), position(7.002, 51.001));
        assert!((m.x - 7.001).abs() < 1e-12);
        assert!((m.y - 51.0005).abs() < 1e-12);
    }

    #[test]
    fn test_small_square_area_and_perimeter() {
        // 0.001 degrees is ~111.2 m at the equator, so the square is ~12,390 m²
        let ring = small_square();
        let a = area(&ring).unwrap();
        let p = perimeter(&ring).unwrap();

        assert!((a - 12_390.0).abs() < 12_390.0 * 0.01, "area {}", a);
        assert!((p - 444.78).abs() < 1.0, "perimeter {}", p);
    }

    #[test]
    fn test_area_is_orientation_independent() {
        let mut reversed = small_square();
        reversed.reverse();
        let forward = area(&small_square()).unwrap();
        assert!((forward - area(&reversed).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_measurements_are_deterministic() {
        let ring = small_square();
        assert_eq!(area(&ring).unwrap().to_bits(), area(&ring).unwrap().to_bits());
        assert_eq!(
            perimeter(&ring).unwrap().to_bits(),
            perimeter(&ring).unwrap().to_bits()
        );
    }

    #[test]
    fn test_area_rejects_open_ring() {
        let mut open = small_square();
        open.pop();
        assert!(matches!(area(&open), Err(DrawingError::InvalidGeometry(_))));
        assert!(matches!(perimeter(&open), Err(DrawingError::InvalidGeometry(_))));
    }

    #[test]
    fn test_area_rejects_collapsed_ring() {
        let collapsed = vec![
            position(0.0, 0.0),
            position(0.001, 0.0),
            position(0.001, 0.0),
            position(0.0, 0.0),
        ];
        assert!(matches!(area(&collapsed), Err(DrawingError::InvalidGeometry(_))));
    }

    #[test]
    fn test_area_rejects_closed_ring_with_three_positions() {
        let a = position(0.0, 0.0);
        let b = position(0.001, 0.0);
        let short = vec![a, b, a];
        assert!(matches!(area(&short), Err(DrawingError::InvalidGeometry(_))));
        assert!(matches!(perimeter(&short), Err(DrawingError::InvalidGeometry(_))));
    }

    #[test]
    fn test_centroid_of_square() {
        let ring = close_ring(&[
            position(10.0, 50.0),
            position(10.002, 50.0),
            position(10.002, 50.002),
            position(10.0, 50.002),
        ])
        .unwrap();
        let c = centroid(ring.positions()).unwrap();
        assert!((c.x - 10.001).abs() < 1e-9);
        assert!((c.y - 50.001).abs() < 1e-9);
    }
}
