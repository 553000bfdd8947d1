//! Committed roof polygons.

use crate::error::DrawingError;
use crate::geo::{math, Position, Ring};
use serde::{Deserialize, Serialize};

/// Opaque polygon identifier, assigned when a draft is committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(String);

impl PolygonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PolygonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out time-based ids (`polygon-<unix millis>`).
///
/// Ids are strictly increasing within one generator, even when two polygons
/// are committed within the same millisecond.
#[derive(Debug, Default)]
pub struct PolygonIdGenerator {
    last_millis: u64,
}

impl PolygonIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> PolygonId {
        let now = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let millis = now.max(self.last_millis + 1);
        self.last_millis = millis;
        PolygonId(format!("polygon-{}", millis))
    }
}

/// Area (m²) and perimeter (m) of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolygonProperties {
    pub area: f64,
    pub perimeter: f64,
}

impl PolygonProperties {
    /// Measures a closed ring.
    pub fn measure(ring: &[Position]) -> Result<Self, DrawingError> {
        Ok(Self {
            area: math::area(ring)?,
            perimeter: math::perimeter(ring)?,
        })
    }

    /// True if either value differs from `other` by more than `epsilon`.
    pub fn differs_from(&self, other: &PolygonProperties, epsilon: f64) -> bool {
        (self.area - other.area).abs() > epsilon
            || (self.perimeter - other.perimeter).abs() > epsilon
    }
}

/// A committed polygon: closed ring plus its measurements.
///
/// Ring and properties only change together, through [`RoofPolygon::set_ring`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofPolygon {
    id: PolygonId,
    ring: Ring,
    properties: PolygonProperties,
}

impl RoofPolygon {
    /// Creates a polygon, measuring the ring.
    pub fn new(id: PolygonId, ring: Ring) -> Result<Self, DrawingError> {
        let properties = PolygonProperties::measure(ring.positions())?;
        Ok(Self {
            id,
            ring,
            properties,
        })
    }

    /// Wraps externally supplied data without validating it.
    ///
    /// Such polygons may be degenerate; measurement reconciliation skips them.
    pub fn from_parts(id: PolygonId, ring: Ring, properties: PolygonProperties) -> Self {
        Self {
            id,
            ring,
            properties,
        }
    }

    pub fn id(&self) -> &PolygonId {
        &self.id
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn properties(&self) -> PolygonProperties {
        self.properties
    }

    /// Replaces the ring and its measurements in one step.
    ///
    /// On error the polygon is left unchanged.
    pub fn set_ring(&mut self, ring: Ring) -> Result<PolygonProperties, DrawingError> {
        let properties = PolygonProperties::measure(ring.positions())?;
        self.ring = ring;
        self.properties = properties;
        Ok(properties)
    }

    /// Point-in-polygon test on the ring (planar, in degrees).
    pub fn contains(&self, position: Position) -> bool {
        use geo::Contains;
        let polygon = geo_types::Polygon::new(
            geo_types::LineString::from(self.ring.positions().to_vec()),
            vec![],
        );
        polygon.contains(&geo_types::Point::from(position))
    }
}
