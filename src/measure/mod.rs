//! Committed polygons and their measurements.

mod polygon;
mod store;

pub use polygon::{PolygonId, PolygonIdGenerator, PolygonProperties, RoofPolygon};
pub use store::{Measurement, MeasurementStore, DEFAULT_MEASUREMENT_EPSILON};
