//! Geographic primitives: positions, rings, geometry math and projection.

pub mod math;
mod projection;
mod ring;

pub use projection::{MapProjection, ScreenPos, ScreenProjection};
pub use ring::{
    close_ring, distinct_vertex_count, is_closed, position, Position, Ring, MIN_RING_VERTICES,
};
