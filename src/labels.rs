//! Text labels for edges, areas and the live draft.

use crate::geo::{math, Position, Ring};
use crate::settings::{BearingMode, DEFAULT_MIN_LABEL_LENGTH_M};
use serde::Serialize;

/// What a label annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelKind {
    EdgeLength,
    Area,
    DraftSegment,
}

/// A renderable text label anchored on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Position,
    pub text: String,
    /// Rotation in degrees clockwise from north; `None` for unrotated text
    pub bearing: Option<f64>,
    pub kind: LabelKind,
}

/// Formats a length in meters, e.g. `12.3 m`.
pub fn format_length(meters: f64) -> String {
    format!("{:.1} m", meters)
}

/// Formats a perimeter in meters, e.g. `49.87 m`.
pub fn format_perimeter(meters: f64) -> String {
    format!("{:.2} m", meters)
}

/// Formats an area in square meters, e.g. `154.27 m²`.
pub fn format_area(square_meters: f64) -> String {
    format!("{:.2} m²", square_meters)
}

/// Turns an edge bearing into a label rotation that reads left to right.
///
/// Bearings outside (-90, 90] are turned by 180°.
pub fn upright_bearing(bearing: f64) -> f64 {
    let bearing = math::normalize_bearing(bearing);
    if bearing > -90.0 && bearing <= 90.0 {
        bearing
    } else {
        math::normalize_bearing(bearing + 180.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGenerator {
    pub min_segment_m: f64,
    pub bearing_mode: BearingMode,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self {
            min_segment_m: DEFAULT_MIN_LABEL_LENGTH_M,
            bearing_mode: BearingMode::default(),
        }
    }
}

impl LabelGenerator {
    pub fn new(min_segment_m: f64, bearing_mode: BearingMode) -> Self {
        Self {
            min_segment_m,
            bearing_mode,
        }
    }

    /// One length label per ring edge, skipping edges below the threshold.
    pub fn edge_labels(&self, ring: &Ring) -> Vec<Label> {
        self.path_labels(ring.positions(), LabelKind::EdgeLength)
    }

    /// Length labels for each segment of an open path.
    pub fn path_labels(&self, points: &[Position], kind: LabelKind) -> Vec<Label> {
        points
            .windows(2)
            .filter_map(|w| self.segment_label(w[0], w[1], kind))
            .collect()
    }

    /// Area label at the ring's centroid. `None` for degenerate rings.
    pub fn area_label(&self, ring: &Ring) -> Option<Label> {
        let area = match math::area(ring.positions()) {
            Ok(area) => area,
            Err(e) => {
                log::debug!("No area label: {}", e);
                return None;
            }
        };
        let position = math::centroid(ring.positions())?;
        Some(Label {
            position,
            text: format_area(area),
            bearing: None,
            kind: LabelKind::Area,
        })
    }

    /// Label for the rubber band from the last draft point to the pointer.
    pub fn draft_preview_label(&self, points: &[Position], pointer: Position) -> Option<Label> {
        let last = *points.last()?;
        self.segment_label(last, pointer, LabelKind::DraftSegment)
    }

    fn segment_label(&self, a: Position, b: Position, kind: LabelKind) -> Option<Label> {
        let length = math::distance(a, b);
        if length < self.min_segment_m {
            return None;
        }

        let bearing = math::bearing(a, b);
        let bearing = match self.bearing_mode {
            BearingMode::Upright => upright_bearing(bearing),
            BearingMode::Raw => bearing,
        };

        Some(Label {
            position: math::midpoint(a, b),
            text: format_length(length),
            bearing: Some(bearing),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{close_ring, position};

    fn square() -> Ring {
        close_ring(&[
            position(0.0, 0.0),
            position(0.0, 0.001),
            position(0.001, 0.001),
            position(0.001, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_upright_bearing() {
        assert_eq!(upright_bearing(45.0), 45.0);
        assert_eq!(upright_bearing(90.0), 90.0);
        assert_eq!(upright_bearing(120.0), -60.0);
        assert_eq!(upright_bearing(-120.0), 60.0);
        assert_eq!(upright_bearing(-90.0), 90.0);
        assert_eq!(upright_bearing(180.0), 0.0);
    }

    #[test]
    fn test_edge_labels_one_per_edge() {
        let labels = LabelGenerator::default().edge_labels(&square());
        assert_eq!(labels.len(), 4);

        let first = &labels[0];
        assert_eq!(first.kind, LabelKind::EdgeLength);
        assert_eq!(first.text, "111.2 m");
        assert!((first.position.x - 0.0).abs() < 1e-12);
        assert!((first.position.y - 0.0005).abs() < 1e-12);
        assert!(first.bearing.unwrap().abs() < 1e-6);

        // The southward edge reads upright
        let back = &labels[2];
        assert!(back.bearing.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_raw_bearing_mode_keeps_direction() {
        let generator = LabelGenerator::new(0.1, BearingMode::Raw);
        let labels = generator.edge_labels(&square());
        assert!((labels[2].bearing.unwrap() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_edges_are_skipped() {
        // Second and third vertex are ~1 cm apart
        let ring = close_ring(&[
            position(7.0, 51.0),
            position(7.0002, 51.0),
            position(7.0002, 51.0000001),
            position(7.0, 51.0001),
        ])
        .unwrap();
        let labels = LabelGenerator::default().edge_labels(&ring);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_area_label_at_centroid() {
        let label = LabelGenerator::default().area_label(&square()).unwrap();
        assert_eq!(label.kind, LabelKind::Area);
        assert!(label.text.ends_with(" m²"));
        assert!(label.bearing.is_none());
        assert!((label.position.x - 0.0005).abs() < 1e-9);
        assert!((label.position.y - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn test_area_label_skips_degenerate_ring() {
        let ring = close_ring(&[position(0.0, 0.0), position(0.001, 0.0), position(0.001, 0.0)]).unwrap();
        assert!(LabelGenerator::default().area_label(&ring).is_none());
    }

    #[test]
    fn test_draft_preview_label() {
        let generator = LabelGenerator::default();
        assert!(generator
            .draft_preview_label(&[], position(0.0, 0.001))
            .is_none());

        let points = [position(0.0, 0.0)];
        assert!(generator
            .draft_preview_label(&points, position(0.0, 0.0))
            .is_none());

        let label = generator
            .draft_preview_label(&points, position(0.0, 0.001))
            .unwrap();
        assert_eq!(label.kind, LabelKind::DraftSegment);
        assert_eq!(label.text, "111.2 m");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_length(12.345), "12.3 m");
        assert_eq!(format_area(154.267), "154.27 m²");
        assert_eq!(format_perimeter(49.8712), "49.87 m");
    }
}
