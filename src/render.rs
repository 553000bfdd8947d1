//! Plain render data handed to the map host.
//!
//! A [`RenderFrame`] is rebuilt wholesale after every change. Hosts either
//! paint it directly or take the GeoJSON feature collections.

use crate::drawing::VertexHandle;
use crate::geo::{Position, Ring};
use crate::labels::{Label, LabelKind};
use crate::measure::{PolygonId, PolygonProperties};
use geo_types::{LineString, Point, Polygon};
use geojson::{Feature, FeatureCollection, Geometry};

/// A committed polygon as it should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPolygon {
    pub id: PolygonId,
    pub ring: Ring,
    pub properties: PolygonProperties,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Draft vertices followed by the pointer position
    pub draft_line: Vec<Position>,
    /// Closed draft preview once three vertices are placed
    pub draft_polygon: Option<Ring>,
    /// Where the next vertex would be placed
    pub cursor: Option<Position>,
    /// Whether `cursor` sits on a snapped vertex
    pub snapped: bool,
    pub polygons: Vec<RenderedPolygon>,
    pub labels: Vec<Label>,
    pub handles: Vec<VertexHandle>,
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn polygon_geometry(ring: &Ring) -> Geometry {
    let polygon = Polygon::new(LineString::from(ring.positions().to_vec()), Vec::new());
    Geometry::from(&polygon)
}

fn label_kind(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::EdgeLength => "edge",
        LabelKind::Area => "area",
        LabelKind::DraftSegment => "draft",
    }
}

impl RenderFrame {
    pub fn is_drawing(&self) -> bool {
        !self.draft_line.is_empty()
    }

    /// The rubber-band line of the draft. Empty until two positions exist.
    pub fn current_line(&self) -> FeatureCollection {
        if self.draft_line.len() < 2 {
            return collection(Vec::new());
        }
        let mut f = Feature::from(Geometry::from(&LineString::from(self.draft_line.clone())));
        f.set_property("snapped", self.snapped);
        collection(vec![f])
    }

    pub fn current_polygon(&self) -> FeatureCollection {
        let features = self
            .draft_polygon
            .iter()
            .map(|ring| Feature::from(polygon_geometry(ring)))
            .collect();
        collection(features)
    }

    /// Committed polygons with their id, measurements and selection state.
    pub fn saved_polygons(&self) -> FeatureCollection {
        let features = self
            .polygons
            .iter()
            .map(|p| {
                let mut f = Feature::from(polygon_geometry(&p.ring));
                f.id = Some(geojson::feature::Id::String(p.id.to_string()));
                f.set_property("area", p.properties.area);
                f.set_property("perimeter", p.properties.perimeter);
                f.set_property("selected", p.selected);
                f
            })
            .collect();
        collection(features)
    }

    /// Point features carrying `text`, `kind` and (for edges) `bearing`.
    pub fn label_features(&self) -> FeatureCollection {
        let features = self
            .labels
            .iter()
            .map(|label| {
                let mut f = Feature::from(Geometry::from(&Point::from(label.position)));
                f.set_property("text", label.text.clone());
                f.set_property("kind", label_kind(label.kind));
                if let Some(bearing) = label.bearing {
                    f.set_property("bearing", bearing);
                }
                f
            })
            .collect();
        collection(features)
    }

    pub fn handle_features(&self) -> FeatureCollection {
        let features = self
            .handles
            .iter()
            .map(|h| {
                let mut f = Feature::from(Geometry::from(&Point::from(h.position)));
                f.set_property("handle", h.id.value());
                f.set_property("vertex_index", h.vertex_index as u64);
                f
            })
            .collect();
        collection(features)
    }
}
