//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and
//! screen coordinates. The drawing core only talks to the
//! [`ScreenProjection`] trait; [`MapProjection`] is the implementation the
//! desktop/web host uses.

use super::ring::Position;
use crate::error::DrawingError;
use glam::Vec2;

/// A position on screen in pixels (y grows downward).
pub type ScreenPos = Vec2;

/// Converts between geographic and screen coordinates.
///
/// Implementations return [`DrawingError::ProjectionUnavailable`] while the
/// underlying map is not ready to project.
pub trait ScreenProjection {
    fn project(&self, position: Position) -> Result<ScreenPos, DrawingError>;
    fn unproject(&self, screen: ScreenPos) -> Result<Position, DrawingError>;
}

/// Tile size used to express the view scale as a slippy-map zoom level.
const TILE_SIZE_PX: f64 = 256.0;

/// Equirectangular map projection around a view center.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center of the view
    pub center: Position,
    /// Half-extent of the visible area in degrees at zoom 1.0
    pub range_deg: f64,
    /// Current zoom factor
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Top-left corner of the viewport on screen
    pub viewport_min: Vec2,
    /// Viewport size in pixels; zero until the host has laid out the canvas
    pub viewport_size: Vec2,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            // Dortmund, a typical roof-survey area
            center: Position { x: 7.4653, y: 51.5136 },
            // ~110 m half-height, a handful of houses
            range_deg: 0.001,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            viewport_min: Vec2::ZERO,
            viewport_size: Vec2::ZERO,
        }
    }
}

impl MapProjection {
    /// Creates a new projection centered on a location.
    pub fn new(center: Position) -> Self {
        Self {
            center,
            ..Default::default()
        }
    }

    /// Updates the projection with current view state.
    pub fn update(&mut self, zoom: f32, pan_offset: Vec2, viewport_min: Vec2, viewport_size: Vec2) {
        self.zoom = zoom;
        self.pan_offset = pan_offset;
        self.viewport_min = viewport_min;
        self.viewport_size = viewport_size;
    }

    /// True once the viewport has a usable size.
    pub fn is_ready(&self) -> bool {
        self.viewport_size.x > 0.0 && self.viewport_size.y > 0.0 && self.zoom > 0.0
    }

    fn effective_range(&self) -> f64 {
        self.range_deg / self.zoom as f64
    }

    fn lat_correction(&self) -> f64 {
        self.center.y.to_radians().cos()
    }

    fn screen_center(&self) -> Vec2 {
        self.viewport_min + self.viewport_size / 2.0 + self.pan_offset
    }

    fn half_size(&self) -> f32 {
        self.viewport_size.min_element() / 2.0
    }

    /// Degrees of latitude covered by one screen pixel.
    pub fn degrees_per_pixel(&self) -> Result<f64, DrawingError> {
        if !self.is_ready() {
            return Err(DrawingError::ProjectionUnavailable);
        }
        Ok(self.effective_range() / self.half_size() as f64)
    }

    /// The view scale expressed as a web-map zoom level (256 px tiles).
    pub fn map_zoom(&self) -> Result<f64, DrawingError> {
        let dpp = self.degrees_per_pixel()?;
        Ok((360.0 / (TILE_SIZE_PX * dpp)).log2())
    }

    /// The geographic position under the viewport center (pan included).
    pub fn view_center(&self) -> Result<Position, DrawingError> {
        self.unproject(self.viewport_min + self.viewport_size / 2.0)
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> Result<(f64, f64, f64, f64), DrawingError> {
        let top_left = self.unproject(self.viewport_min)?;
        let bottom_right = self.unproject(self.viewport_min + self.viewport_size)?;

        Ok((
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        ))
    }

    /// Checks if a coordinate is within the visible bounds (with margin).
    pub fn is_visible(&self, coord: Position, margin_deg: f64) -> bool {
        match self.visible_bounds() {
            Ok((min_lon, min_lat, max_lon, max_lat)) => {
                coord.x >= min_lon - margin_deg
                    && coord.x <= max_lon + margin_deg
                    && coord.y >= min_lat - margin_deg
                    && coord.y <= max_lat + margin_deg
            }
            Err(_) => false,
        }
    }
}

impl ScreenProjection for MapProjection {
    fn project(&self, position: Position) -> Result<ScreenPos, DrawingError> {
        if !self.is_ready() {
            return Err(DrawingError::ProjectionUnavailable);
        }
        let effective_range = self.effective_range();

        // Normalize coordinates relative to center, longitude scaled by latitude
        let rel_lon = (position.x - self.center.x) * self.lat_correction();
        let rel_lat = position.y - self.center.y;

        let norm_x = rel_lon / effective_range;
        let norm_y = -rel_lat / effective_range; // Flip Y since screen Y increases downward

        let center = self.screen_center();
        let half_size = self.half_size();

        Ok(Vec2::new(
            center.x + (norm_x as f32) * half_size,
            center.y + (norm_y as f32) * half_size,
        ))
    }

    fn unproject(&self, screen: ScreenPos) -> Result<Position, DrawingError> {
        if !self.is_ready() {
            return Err(DrawingError::ProjectionUnavailable);
        }
        let effective_range = self.effective_range();

        let center = self.screen_center();
        let half_size = self.half_size();

        let norm_x = ((screen.x - center.x) / half_size) as f64;
        let norm_y = ((screen.y - center.y) / half_size) as f64;

        let rel_lon = norm_x * effective_range / self.lat_correction();
        let rel_lat = -norm_y * effective_range; // Flip Y back

        Ok(Position {
            x: self.center.x + rel_lon,
            y: self.center.y + rel_lat,
        })
    }
}
