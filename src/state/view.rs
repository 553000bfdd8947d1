//! Map view state (center, zoom/pan) and the projection derived from it.

use eframe::egui::{Rect, Vec2};
use roof_mapper::geo::{position, MapProjection, Position};

/// Zoom factor limits relative to the default street-level view.
const MIN_ZOOM: f32 = 0.01;
const MAX_ZOOM: f32 = 40.0;

pub struct ViewState {
    /// Map center at zero pan
    pub center: Position,
    /// Zoom factor (1.0 = about 110 m from center to edge)
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Web-map zoom level requested by the URL, applied on the first frame
    pub pending_map_zoom: Option<f64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: MapProjection::default().center,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            pending_map_zoom: None,
        }
    }
}

impl ViewState {
    pub fn from_url(params: &super::url_state::UrlParams) -> Self {
        let mut view = Self::default();
        if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
            view.center = position(lon, lat);
        }
        view.pending_map_zoom = params.zoom;
        view
    }

    /// Builds the projection for a canvas rect.
    pub fn projection(&mut self, rect: Rect) -> MapProjection {
        let mut projection = MapProjection::new(self.center);
        let viewport_min = glam::Vec2::new(rect.min.x, rect.min.y);
        let viewport_size = glam::Vec2::new(rect.width(), rect.height());

        if let Some(target) = self.pending_map_zoom {
            projection.update(1.0, glam::Vec2::ZERO, viewport_min, viewport_size);
            if let Ok(base) = projection.map_zoom() {
                self.zoom = clamp_zoom(2f64.powf(target - base) as f32);
                self.pending_map_zoom = None;
            }
        }

        projection.update(
            self.zoom,
            glam::Vec2::new(self.pan_offset.x, self.pan_offset.y),
            viewport_min,
            viewport_size,
        );
        projection
    }

    /// Zooms by `factor`, keeping the point under `anchor` (relative to the
    /// canvas center) in place.
    pub fn zoom_by(&mut self, factor: f32, anchor: Option<Vec2>) {
        let old_zoom = self.zoom;
        let new_zoom = clamp_zoom(old_zoom * factor);

        if let Some(cursor_rel) = anchor {
            let ratio = new_zoom / old_zoom;
            self.pan_offset = cursor_rel * (1.0 - ratio) + self.pan_offset * ratio;
        }

        self.zoom = new_zoom;
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = Vec2::ZERO;
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
