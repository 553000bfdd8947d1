//! Vertex editing of committed polygons.

use crate::error::DrawingError;
use crate::geo::Position;
use crate::measure::{MeasurementStore, PolygonId, RoofPolygon};
use std::collections::HashMap;

/// Identifies a draggable vertex handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A renderable, draggable marker on a polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHandle {
    pub id: HandleId,
    pub vertex_index: usize,
    pub position: Position,
}

/// Tracks the vertex handles of the polygon being edited.
#[derive(Debug, Default)]
pub struct PolygonEditor {
    polygon: Option<PolygonId>,
    handles: Vec<VertexHandle>,
    index_by_handle: HashMap<HandleId, usize>,
    next_handle: u64,
}

impl PolygonEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one handle per vertex of `polygon`, skipping the closing point.
    ///
    /// Any previous edit session is replaced.
    pub fn begin_edit(&mut self, polygon: &RoofPolygon) -> &[VertexHandle] {
        self.end_edit();
        for (vertex_index, position) in polygon.ring().vertices().iter().enumerate() {
            let id = HandleId(self.next_handle);
            self.next_handle += 1;
            self.index_by_handle.insert(id, vertex_index);
            self.handles.push(VertexHandle {
                id,
                vertex_index,
                position: *position,
            });
        }
        self.polygon = Some(polygon.id().clone());
        log::debug!(
            "Editing {} with {} handles",
            polygon.id(),
            self.handles.len()
        );
        &self.handles
    }

    pub fn end_edit(&mut self) {
        self.polygon = None;
        self.handles.clear();
        self.index_by_handle.clear();
    }

    /// The polygon currently being edited.
    pub fn editing(&self) -> Option<&PolygonId> {
        self.polygon.as_ref()
    }

    pub fn handles(&self) -> &[VertexHandle] {
        &self.handles
    }

    pub fn vertex_index(&self, handle: HandleId) -> Option<usize> {
        self.index_by_handle.get(&handle).copied()
    }

    /// Moves the vertex behind `handle`. See [`on_vertex_drag`].
    pub fn drag_handle(
        &mut self,
        polygon: RoofPolygon,
        handle: HandleId,
        new_position: Position,
        store: &mut MeasurementStore,
    ) -> Result<RoofPolygon, DrawingError> {
        if self.polygon.as_ref() != Some(polygon.id()) {
            return Err(DrawingError::InvalidGeometry(format!(
                "{} is not being edited",
                polygon.id()
            )));
        }
        let vertex_index = self.vertex_index(handle).ok_or_else(|| {
            DrawingError::InvalidGeometry(format!("unknown handle {}", handle.value()))
        })?;

        let updated = on_vertex_drag(polygon, vertex_index, new_position, store)?;
        if let Some(h) = self.handles.iter_mut().find(|h| h.id == handle) {
            h.position = new_position;
        }
        Ok(updated)
    }
}

/// Moves one vertex of a committed polygon and refreshes its measurements.
///
/// Moving vertex 0 also moves the closing point. The polygon's properties and
/// its entry in `store` are updated together; on error neither changes and
/// the caller keeps its original polygon.
pub fn on_vertex_drag(
    mut polygon: RoofPolygon,
    vertex_index: usize,
    new_position: Position,
    store: &mut MeasurementStore,
) -> Result<RoofPolygon, DrawingError> {
    let mut ring = polygon.ring().clone();
    ring.set_vertex(vertex_index, new_position)?;
    let properties = polygon.set_ring(ring)?;
    store.upsert(polygon.id(), properties);
    log::debug!(
        "Vertex {} of {} moved: {:.2} m², {:.2} m",
        vertex_index,
        polygon.id(),
        properties.area,
        properties.perimeter
    );
    Ok(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{close_ring, position};

    fn polygon() -> RoofPolygon {
        let ring = close_ring(&[
            position(7.0, 51.0),
            position(7.0002, 51.0),
            position(7.0002, 51.0001),
            position(7.0, 51.0001),
        ])
        .unwrap();
        RoofPolygon::new(PolygonId::new("roof"), ring).unwrap()
    }

    #[test]
    fn test_begin_edit_skips_closing_point() {
        let mut editor = PolygonEditor::new();
        let handles = editor.begin_edit(&polygon());
        assert_eq!(handles.len(), 4);
        let indices: Vec<usize> = handles.iter().map(|h| h.vertex_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(editor.editing(), Some(&PolygonId::new("roof")));
    }

    #[test]
    fn test_dragging_vertex_zero_keeps_ring_closed() {
        let mut store = MeasurementStore::default();
        let moved = position(6.9999, 50.9999);
        let updated = on_vertex_drag(polygon(), 0, moved, &mut store).unwrap();

        let positions = updated.ring().positions();
        assert_eq!(positions[0], moved);
        assert_eq!(positions[positions.len() - 1], moved);
    }

    #[test]
    fn test_drag_updates_properties_and_store_together() {
        let original = polygon();
        let mut store = MeasurementStore::default();
        store.reconcile(std::slice::from_ref(&original));

        let updated =
            on_vertex_drag(original.clone(), 2, position(7.0004, 51.0002), &mut store).unwrap();
        assert!(updated.properties().area > original.properties().area);

        let entry = store.get(updated.id()).unwrap();
        assert_eq!(entry.properties(), updated.properties());
    }

    #[test]
    fn test_invalid_drag_changes_nothing() {
        let original = polygon();
        let mut store = MeasurementStore::default();
        store.reconcile(std::slice::from_ref(&original));
        let before = store.measurements().to_vec();

        let out_of_range = on_vertex_drag(original.clone(), 4, position(7.1, 51.1), &mut store);
        assert!(out_of_range.is_err());

        // A ring with only two distinct vertices left
        let triangle = RoofPolygon::new(
            PolygonId::new("tri"),
            close_ring(&[
                position(7.0, 51.0),
                position(7.0002, 51.0),
                position(7.0001, 51.0001),
            ])
            .unwrap(),
        )
        .unwrap();
        let collapsed = on_vertex_drag(triangle, 2, position(7.0, 51.0), &mut store);
        assert!(matches!(collapsed, Err(DrawingError::InvalidGeometry(_))));

        assert_eq!(store.measurements(), before.as_slice());
    }

    #[test]
    fn test_drag_handle_maps_to_vertex() {
        let original = polygon();
        let mut store = MeasurementStore::default();
        let mut editor = PolygonEditor::new();
        let handle = editor.begin_edit(&original)[1].id;

        let target = position(7.0003, 51.0);
        let updated = editor
            .drag_handle(original, handle, target, &mut store)
            .unwrap();
        assert_eq!(updated.ring().positions()[1], target);
        assert_eq!(editor.handles()[1].position, target);
    }

    #[test]
    fn test_drag_handle_rejects_other_polygon() {
        let mut store = MeasurementStore::default();
        let mut editor = PolygonEditor::new();
        let handle = editor.begin_edit(&polygon())[0].id;

        let other = RoofPolygon::new(PolygonId::new("other"), polygon().ring().clone()).unwrap();
        assert!(editor
            .drag_handle(other, handle, position(7.0, 51.0), &mut store)
            .is_err());

        editor.end_edit();
        assert!(editor.vertex_index(handle).is_none());
    }
}
