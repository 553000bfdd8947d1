//! Which base imagery should be visible for the current viewport.
//!
//! Regional aerial imagery only covers one region and is only worth showing
//! when zoomed in to street level. Below that the overview map is shown,
//! and outside the region a fallback imagery source.

use crate::geo::Position;
use serde::{Deserialize, Serialize};

/// A lon/lat bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    /// Inclusive on all edges.
    pub fn contains(&self, position: Position) -> bool {
        position.y >= self.south
            && position.y <= self.north
            && position.x >= self.west
            && position.x <= self.east
    }
}

/// North Rhine-Westphalia, covered by the state's orthophoto service.
pub const NRW_BOUNDS: GeoBounds = GeoBounds {
    west: 5.8663,
    south: 50.3230,
    east: 9.4623,
    north: 52.5314,
};

/// The base layer that should be visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseLayer {
    /// Zoomed out: plain overview map, no aerial imagery
    Overview,
    /// Inside the region: regional aerial imagery
    RegionalImagery,
    /// Outside the region: generic satellite imagery
    FallbackImagery,
}

/// Result of evaluating the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageryStatus {
    pub layer: BaseLayer,
    /// Status line for the host; `None` when nothing needs saying
    pub message: Option<String>,
}

/// Imagery coverage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageryPolicy {
    pub region: GeoBounds,
    pub region_name: String,
    /// Web-map zoom level from which aerial imagery is shown
    pub min_imagery_zoom: f64,
}

impl Default for ImageryPolicy {
    fn default() -> Self {
        Self {
            region: NRW_BOUNDS,
            region_name: "North Rhine-Westphalia".to_string(),
            min_imagery_zoom: 15.0,
        }
    }
}

impl ImageryPolicy {
    pub fn evaluate(&self, center: Position, zoom: f64) -> ImageryStatus {
        if zoom < self.min_imagery_zoom {
            return ImageryStatus {
                layer: BaseLayer::Overview,
                message: Some("Zoom in further to see aerial imagery.".to_string()),
            };
        }

        if self.region.contains(center) {
            ImageryStatus {
                layer: BaseLayer::RegionalImagery,
                message: None,
            }
        } else {
            ImageryStatus {
                layer: BaseLayer::FallbackImagery,
                message: Some(format!(
                    "Outside {}. Showing fallback satellite imagery.",
                    self.region_name
                )),
            }
        }
    }
}

/// Re-evaluates the policy on viewport changes and raises the out-of-region
/// warning only the first time it applies.
#[derive(Debug, Default)]
pub struct ImageryWatcher {
    warned: bool,
    last_layer: Option<BaseLayer>,
}

impl ImageryWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status and, once per watcher, a warning to show the user.
    pub fn observe(
        &mut self,
        policy: &ImageryPolicy,
        center: Position,
        zoom: f64,
    ) -> (ImageryStatus, Option<String>) {
        let status = policy.evaluate(center, zoom);

        if self.last_layer != Some(status.layer) {
            log::debug!("Base layer now {:?}", status.layer);
            self.last_layer = Some(status.layer);
        }

        let warning = if status.layer == BaseLayer::FallbackImagery && !self.warned {
            self.warned = true;
            Some(format!(
                "You are outside {}. Fallback satellite imagery is shown.",
                policy.region_name
            ))
        } else {
            None
        };

        (status, warning)
    }

    pub fn has_warned(&self) -> bool {
        self.warned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::position;

    const DORTMUND: Position = Position { x: 7.4653, y: 51.5136 };
    const BERLIN: Position = Position { x: 13.405, y: 52.52 };

    #[test]
    fn test_zoomed_out_shows_overview() {
        let status = ImageryPolicy::default().evaluate(DORTMUND, 12.0);
        assert_eq!(status.layer, BaseLayer::Overview);
        assert!(status.message.is_some());
    }

    #[test]
    fn test_inside_region_uses_regional_imagery() {
        let status = ImageryPolicy::default().evaluate(DORTMUND, 15.0);
        assert_eq!(status.layer, BaseLayer::RegionalImagery);
        assert_eq!(status.message, None);
    }

    #[test]
    fn test_outside_region_falls_back() {
        let status = ImageryPolicy::default().evaluate(BERLIN, 18.0);
        assert_eq!(status.layer, BaseLayer::FallbackImagery);
        assert!(status.message.is_some());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(NRW_BOUNDS.contains(position(5.8663, 50.3230)));
        assert!(NRW_BOUNDS.contains(position(9.4623, 52.5314)));
        assert!(!NRW_BOUNDS.contains(position(9.4624, 51.0)));
    }

    #[test]
    fn test_warning_is_raised_once() {
        let policy = ImageryPolicy::default();
        let mut watcher = ImageryWatcher::new();

        let (_, warning) = watcher.observe(&policy, DORTMUND, 16.0);
        assert!(warning.is_none());
        let (_, warning) = watcher.observe(&policy, BERLIN, 16.0);
        assert!(warning.is_some());
        let (_, warning) = watcher.observe(&policy, DORTMUND, 16.0);
        assert!(warning.is_none());
        let (status, warning) = watcher.observe(&policy, BERLIN, 16.0);
        assert_eq!(status.layer, BaseLayer::FallbackImagery);
        assert!(warning.is_none());
        assert!(watcher.has_warned());
    }

    #[test]
    fn test_zoomed_out_outside_region_does_not_warn() {
        let mut watcher = ImageryWatcher::new();
        let (_, warning) = watcher.observe(&ImageryPolicy::default(), BERLIN, 10.0);
        assert!(warning.is_none());
        assert!(!watcher.has_warned());
    }
}
