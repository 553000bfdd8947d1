//! The controlling context of a mapping session.
//!
//! [`MappingSession`] owns the committed polygons, their measurements, the
//! draft and the editor, and routes pointer events between them. Every
//! public operation leaves rings, properties and measurements in agreement
//! before it returns.

use crate::drawing::{
    AddPointOutcome, DraftPolygonBuilder, DraftPreview, HandleId, PointerSample, PolygonEditor,
    VertexHandle,
};
use crate::error::DrawingError;
use crate::geo::{close_ring, Position, Ring, ScreenPos, ScreenProjection, MIN_RING_VERTICES};
use crate::labels::{format_area, format_perimeter, LabelGenerator, LabelKind};
use crate::measure::{
    Measurement, MeasurementStore, PolygonId, PolygonIdGenerator, PolygonProperties, RoofPolygon,
};
use crate::render::{RenderFrame, RenderedPolygon};
use crate::settings::DrawingSettings;

/// The active interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Pan and zoom; clicks select polygons
    #[default]
    Navigate,
    /// Clicks place draft vertices
    Draw,
    /// Vertices of the selected polygon can be dragged
    Edit,
    /// Clicks select polygons to show their measurements
    Measure,
}

impl DrawMode {
    pub fn label(&self) -> &'static str {
        match self {
            DrawMode::Navigate => "Navigate",
            DrawMode::Draw => "Draw",
            DrawMode::Edit => "Edit",
            DrawMode::Measure => "Measure",
        }
    }

    /// Short usage hint for the status line.
    pub fn hint(&self) -> &'static str {
        match self {
            DrawMode::Navigate => "Drag to pan, scroll to zoom.",
            DrawMode::Draw => {
                "Click to add points. Click the first point or right-click to close the polygon."
            }
            DrawMode::Edit => "Drag a vertex to reshape the selected polygon.",
            DrawMode::Measure => "Select a polygon to show its measurements.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

fn describe(properties: PolygonProperties) -> String {
    format!(
        "{}, perimeter {}",
        format_area(properties.area),
        format_perimeter(properties.perimeter)
    )
}

pub struct MappingSession {
    settings: DrawingSettings,
    mode: DrawMode,
    polygons: Vec<RoofPolygon>,
    store: MeasurementStore,
    draft: DraftPolygonBuilder,
    preview: Option<DraftPreview>,
    editor: PolygonEditor,
    selected: Option<PolygonId>,
    ids: PolygonIdGenerator,
    labels: LabelGenerator,
    notices: Vec<Notice>,
}

impl Default for MappingSession {
    fn default() -> Self {
        Self::new(DrawingSettings::default())
    }
}

impl MappingSession {
    pub fn new(settings: DrawingSettings) -> Self {
        Self {
            mode: DrawMode::default(),
            polygons: Vec::new(),
            store: MeasurementStore::new(settings.measurement_epsilon),
            draft: DraftPolygonBuilder::new(settings.snap_distance_px),
            preview: None,
            editor: PolygonEditor::new(),
            selected: None,
            ids: PolygonIdGenerator::new(),
            labels: LabelGenerator::new(settings.min_label_length_m, settings.bearing_mode),
            notices: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &DrawingSettings {
        &self.settings
    }

    /// Applies new settings to the running session.
    pub fn apply_settings(&mut self, settings: DrawingSettings) {
        self.draft.set_snap_distance_px(settings.snap_distance_px);
        self.store.set_epsilon(settings.measurement_epsilon);
        self.labels = LabelGenerator::new(settings.min_label_length_m, settings.bearing_mode);
        self.settings = settings;
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn polygons(&self) -> &[RoofPolygon] {
        &self.polygons
    }

    pub fn polygon(&self, id: &PolygonId) -> Option<&RoofPolygon> {
        self.polygons.iter().find(|p| p.id() == id)
    }

    pub fn measurements(&self) -> &[Measurement] {
        self.store.measurements()
    }

    /// Sum of all measured areas in square meters.
    pub fn total_area(&self) -> f64 {
        self.store.total_area()
    }

    pub fn selected(&self) -> Option<&PolygonId> {
        self.selected.as_ref()
    }

    pub fn draft_points(&self) -> &[Position] {
        self.draft.points()
    }

    pub fn handles(&self) -> &[VertexHandle] {
        self.editor.handles()
    }

    /// Switches mode. Choosing the active mode again returns to navigation.
    ///
    /// Any in-progress draft is discarded. Edit mode needs a selected polygon.
    pub fn set_mode(&mut self, mode: DrawMode) {
        let target = if mode == self.mode {
            DrawMode::Navigate
        } else {
            mode
        };

        if target == DrawMode::Edit {
            let Some(polygon) = self.selected_polygon().cloned() else {
                self.notify(NoticeLevel::Warning, "Select a polygon to edit first.");
                return;
            };
            self.editor.begin_edit(&polygon);
        } else {
            self.editor.end_edit();
        }

        self.draft.cancel();
        self.preview = None;
        if target == DrawMode::Draw {
            self.draft.start();
        }
        if target == DrawMode::Measure {
            self.reconcile();
        }

        log::debug!("Mode {:?} -> {:?}", self.mode, target);
        self.mode = target;
    }

    /// Discards the draft and returns to navigation.
    pub fn cancel(&mut self) {
        self.draft.cancel();
        self.preview = None;
        self.editor.end_edit();
        self.mode = DrawMode::Navigate;
    }

    /// Primary click on the map.
    pub fn on_click<P>(&mut self, sample: PointerSample, projection: &P)
    where
        P: ScreenProjection + ?Sized,
    {
        if self.mode != DrawMode::Draw {
            if self.mode == DrawMode::Edit && self.near_handle(sample.screen, projection) {
                return;
            }
            // Misses keep the current selection
            let Some(polygon) = self
                .polygons
                .iter()
                .rev()
                .find(|p| p.contains(sample.position))
                .cloned()
            else {
                return;
            };
            self.select(Some(polygon.id().clone()));
            self.notify(
                NoticeLevel::Success,
                format!("Polygon selected: {}", describe(polygon.properties())),
            );
            return;
        }

        let targets: Vec<Position> = self
            .polygons
            .iter()
            .flat_map(|p| p.ring().vertices().iter().copied())
            .collect();

        match self.draft.add_point(sample, projection, &targets) {
            Ok(AddPointOutcome::Closed(ring)) => {
                self.preview = None;
                self.commit(ring);
            }
            Ok(AddPointOutcome::Appended { index, .. }) => {
                let placed = self.draft.points()[index];
                self.preview = self.draft.preview_to(placed, None);
            }
            Ok(AddPointOutcome::Duplicate) => {}
            Err(e) => self.absorb(e),
        }
    }

    /// Secondary click: finishes the draft explicitly.
    pub fn on_secondary_click(&mut self) {
        if self.mode != DrawMode::Draw || self.draft.points().is_empty() {
            return;
        }
        match self.draft.close() {
            Ok(ring) => {
                self.preview = None;
                self.commit(ring);
            }
            Err(e) => self.absorb(e),
        }
    }

    /// Pointer movement: refreshes the draft preview, never the geometry.
    pub fn on_pointer_move<P>(&mut self, sample: PointerSample, projection: &P)
    where
        P: ScreenProjection + ?Sized,
    {
        if self.mode != DrawMode::Draw || self.draft.points().is_empty() {
            return;
        }

        let targets: Vec<Position> = self
            .polygons
            .iter()
            .flat_map(|p| p.ring().vertices().iter().copied())
            .collect();

        let closing = self.draft.snap_to_first(sample.screen, projection);
        let hit = match closing {
            Ok(Some(hit)) => Ok(Some(hit)),
            Ok(None) => self.draft.snap_candidate(sample.screen, projection, &targets),
            Err(e) => Err(e),
        };
        match hit {
            Ok(hit) => self.preview = self.draft.preview_to(sample.position, hit.as_ref()),
            Err(e) => self.absorb(e),
        }
    }

    /// Moves the vertex behind `handle` on the polygon being edited.
    ///
    /// Degenerate results are rejected and the polygon is left as it was.
    pub fn drag_vertex(&mut self, handle: HandleId, position: Position) {
        if self.mode != DrawMode::Edit {
            return;
        }
        let Some(id) = self.editor.editing().cloned() else {
            return;
        };
        let Some(index) = self.polygons.iter().position(|p| p.id() == &id) else {
            return;
        };

        let polygon = self.polygons[index].clone();
        match self
            .editor
            .drag_handle(polygon, handle, position, &mut self.store)
        {
            Ok(updated) => {
                self.polygons[index] = updated;
                self.reconcile();
            }
            Err(e) => {
                log::warn!("Vertex drag rejected: {}", e);
                self.notify(NoticeLevel::Warning, format!("Vertex not moved: {}", e));
            }
        }
    }

    /// Ends a vertex drag and reports the polygon's new measurements.
    pub fn finish_drag(&mut self) {
        if self.mode != DrawMode::Edit {
            return;
        }
        let Some(properties) = self
            .editor
            .editing()
            .and_then(|id| self.polygon(id))
            .map(|p| p.properties())
        else {
            return;
        };
        self.notify(
            NoticeLevel::Success,
            format!("Polygon updated: {}", describe(properties)),
        );
    }

    /// Selects a polygon, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<PolygonId>) {
        let id = id.filter(|id| self.polygon(id).is_some());
        if self.selected == id {
            return;
        }
        self.selected = id;

        if self.mode == DrawMode::Edit {
            match self.selected_polygon().cloned() {
                Some(polygon) => {
                    self.editor.begin_edit(&polygon);
                }
                None => {
                    self.editor.end_edit();
                    self.mode = DrawMode::Navigate;
                }
            }
        }
    }

    pub fn selected_polygon(&self) -> Option<&RoofPolygon> {
        self.selected.as_ref().and_then(|id| self.polygon(id))
    }

    /// Removes one polygon. Returns false if it does not exist.
    pub fn delete_polygon(&mut self, id: &PolygonId) -> bool {
        let before = self.polygons.len();
        self.polygons.retain(|p| p.id() != id);
        if self.polygons.len() == before {
            return false;
        }

        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.editor.editing() == Some(id) {
            self.editor.end_edit();
            if self.mode == DrawMode::Edit {
                self.mode = DrawMode::Navigate;
            }
        }
        self.reconcile();
        log::info!("Deleted polygon {}", id);
        true
    }

    /// Removes every polygon.
    pub fn clear_polygons(&mut self) {
        let count = self.polygons.len();
        self.polygons.clear();
        self.selected = None;
        self.editor.end_edit();
        if self.mode == DrawMode::Edit {
            self.mode = DrawMode::Navigate;
        }
        self.reconcile();
        log::info!("Deleted {} polygons", count);
    }

    /// Deletes the selected polygon, or all polygons when nothing is selected.
    pub fn delete_selected_or_all(&mut self) {
        if let Some(id) = self.selected.clone() {
            if self.delete_polygon(&id) {
                self.notify(NoticeLevel::Success, "Polygon deleted.");
                return;
            }
        }

        match self.polygons.len() {
            0 => self.notify(NoticeLevel::Error, "There are no polygons to delete."),
            1 => {
                self.clear_polygons();
                self.notify(NoticeLevel::Success, "1 polygon deleted.");
            }
            count => {
                self.clear_polygons();
                self.notify(NoticeLevel::Success, format!("{} polygons deleted.", count));
            }
        }
    }

    /// Measurements of the draft while drawing (three points or more),
    /// otherwise of the selected polygon.
    pub fn current_measurement(&self) -> Option<PolygonProperties> {
        if self.mode == DrawMode::Draw && self.draft.points().len() >= MIN_RING_VERTICES {
            return close_ring(self.draft.points())
                .and_then(|ring| PolygonProperties::measure(ring.positions()))
                .ok();
        }
        self.selected_polygon().map(|p| p.properties())
    }

    /// Everything the host needs to draw the current state.
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::default();

        for polygon in &self.polygons {
            frame.labels.extend(self.labels.edge_labels(polygon.ring()));
            frame.labels.extend(self.labels.area_label(polygon.ring()));
            frame.polygons.push(RenderedPolygon {
                id: polygon.id().clone(),
                ring: polygon.ring().clone(),
                properties: polygon.properties(),
                selected: self.selected.as_ref() == Some(polygon.id()),
            });
        }

        let points = self.draft.points();
        if !points.is_empty() {
            frame
                .labels
                .extend(self.labels.path_labels(points, LabelKind::DraftSegment));

            match &self.preview {
                Some(preview) => {
                    frame.draft_line = preview.line.clone();
                    frame.draft_polygon = preview.polygon.clone();
                    frame.cursor = Some(preview.cursor);
                    frame.snapped = preview.snapped;
                    frame
                        .labels
                        .extend(self.labels.draft_preview_label(points, preview.cursor));
                }
                None => {
                    frame.draft_line = points.to_vec();
                    if points.len() >= MIN_RING_VERTICES {
                        frame.draft_polygon = close_ring(points).ok();
                    }
                }
            }

            if let Some(label) = frame
                .draft_polygon
                .as_ref()
                .and_then(|ring| self.labels.area_label(ring))
            {
                frame.labels.push(label);
            }
        }

        frame.handles = self.editor.handles().to_vec();
        frame
    }

    /// Drains pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn commit(&mut self, ring: Ring) {
        let id = self.ids.next_id();
        match RoofPolygon::new(id.clone(), ring) {
            Ok(polygon) => {
                let properties = polygon.properties();
                self.polygons.push(polygon);
                self.reconcile();
                self.selected = Some(id.clone());
                log::info!("Created {}: {}", id, describe(properties));
                self.notify(
                    NoticeLevel::Success,
                    format!("Polygon created: {}", describe(properties)),
                );
            }
            Err(e) => {
                log::warn!("Discarding draft: {}", e);
                self.notify(NoticeLevel::Warning, format!("Polygon not saved: {}", e));
            }
        }
    }

    /// Whether `screen` is within snap reach of an edit handle.
    fn near_handle<P>(&self, screen: ScreenPos, projection: &P) -> bool
    where
        P: ScreenProjection + ?Sized,
    {
        let reach = self.settings.snap_distance_px;
        self.editor.handles().iter().any(|h| {
            projection
                .project(h.position)
                .is_ok_and(|p| p.distance(screen) <= reach)
        })
    }

    fn reconcile(&mut self) {
        self.store.reconcile(&self.polygons);
    }

    fn absorb(&mut self, error: DrawingError) {
        match error {
            DrawingError::ProjectionUnavailable => {
                log::debug!("Pointer event dropped: {}", error);
            }
            DrawingError::InsufficientVertices { .. } => {
                self.notify(NoticeLevel::Error, error.to_string());
            }
            DrawingError::InvalidGeometry(_) => {
                log::warn!("{}", error);
                self.notify(NoticeLevel::Warning, error.to_string());
            }
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }
}
