//! Central canvas UI: the map view with polygons, the draft and labels.
//!
//! Adapts egui pointer input into `PointerSample`s for the session and
//! paints the session's `RenderFrame`.

use crate::state::AppState;
use eframe::egui::{
    self, emath::Rot2, epaint::TextShape, Color32, FontId, Painter, Pos2, Rect, RichText, Sense,
    Shape, Stroke, Vec2,
};
use roof_mapper::{
    BaseLayer, DrawMode, HandleId, ImageryWatcher, Label, LabelKind, MapProjection,
    MappingSession, Notice, NoticeLevel, PointerSample, Position, RenderFrame, ScreenProjection,
};

const POLYGON_COLOR: Color32 = Color32::from_rgb(80, 160, 255);
const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 170, 60);
const DRAFT_COLOR: Color32 = Color32::from_rgb(255, 230, 90);
const SNAP_COLOR: Color32 = Color32::from_rgb(90, 230, 120);
const HANDLE_RADIUS: f32 = 6.0;

pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    session: &mut MappingSession,
    imagery: &mut ImageryWatcher,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();

        // Allocate the full available space for the canvas
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        let projection = state.view.projection(rect);
        handle_pointer(&response, state, session, &projection);
        handle_zoom(&response, &rect, state);

        // Interaction may have moved the view
        let projection = state.view.projection(rect);
        update_imagery(state, session, imagery, &projection);

        painter.rect_filled(rect, 0.0, background_color(state));
        draw_reference_grid(&painter, &rect, &projection);
        paint_frame(&painter, &session.frame(), &projection);
        draw_overlay_info(ui, &rect, state, &projection);

        sync_url(state, &projection);
    });
}

fn to_pos2(v: glam::Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

fn sample_at(projection: &MapProjection, pos: Pos2) -> Option<PointerSample> {
    let screen = glam::Vec2::new(pos.x, pos.y);
    projection
        .unproject(screen)
        .ok()
        .map(|position| PointerSample::new(screen, position))
}

fn handle_pointer(
    response: &egui::Response,
    state: &mut AppState,
    session: &mut MappingSession,
    projection: &MapProjection,
) {
    let hover = response.hover_pos().and_then(|p| sample_at(projection, p));
    state.pointer = hover.map(|s| s.position);
    if let Some(sample) = hover {
        session.on_pointer_move(sample, projection);
    }

    if response.clicked() {
        if let Some(sample) = response
            .interact_pointer_pos()
            .and_then(|p| sample_at(projection, p))
        {
            session.on_click(sample, projection);
        }
    }
    if response.secondary_clicked() {
        session.on_secondary_click();
    }

    if response.drag_started() && session.mode() == DrawMode::Edit {
        let origin = response
            .ctx
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        state.active_handle = origin.and_then(|p| pick_handle(session, projection, p));
    }

    if response.dragged() {
        match state.active_handle {
            Some(handle) => {
                if let Some(sample) = response
                    .interact_pointer_pos()
                    .and_then(|p| sample_at(projection, p))
                {
                    session.drag_vertex(handle, sample.position);
                }
            }
            None => state.view.pan_offset += response.drag_delta(),
        }
    }

    if response.drag_stopped() && state.active_handle.take().is_some() {
        session.finish_drag();
    }

    // Reset view on double-click
    if response.double_clicked() && session.mode() == DrawMode::Navigate {
        state.view.reset();
    }
}

/// The handle under the pointer, if any.
fn pick_handle(
    session: &MappingSession,
    projection: &MapProjection,
    pointer: Pos2,
) -> Option<HandleId> {
    let reach = session.settings().snap_distance_px.max(HANDLE_RADIUS);
    session
        .handles()
        .iter()
        .filter_map(|h| {
            let screen = to_pos2(projection.project(h.position).ok()?);
            let distance = screen.distance(pointer);
            (distance <= reach).then_some((h.id, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn handle_zoom(response: &egui::Response, rect: &Rect, state: &mut AppState) {
    // Handle scroll for zooming relative to cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            let zoom_factor = 1.0 + scroll_delta.y * 0.001;
            let anchor = response.hover_pos().map(|p| p - rect.center());
            state.view.zoom_by(zoom_factor, anchor);
        }
    }
}

fn update_imagery(
    state: &mut AppState,
    session: &MappingSession,
    imagery: &mut ImageryWatcher,
    projection: &MapProjection,
) {
    let (Ok(center), Ok(zoom)) = (projection.view_center(), projection.map_zoom()) else {
        return;
    };
    let (status, warning) = imagery.observe(&session.settings().imagery, center, zoom);
    state.imagery = Some(status);
    if let Some(message) = warning {
        state.push_notice(Notice {
            level: NoticeLevel::Warning,
            message,
        });
    }
}

fn background_color(state: &AppState) -> Color32 {
    match state.imagery.as_ref().map(|s| s.layer) {
        Some(BaseLayer::RegionalImagery) => Color32::from_rgb(28, 36, 30),
        Some(BaseLayer::FallbackImagery) => Color32::from_rgb(36, 32, 28),
        _ => Color32::from_rgb(20, 20, 35),
    }
}

/// Draws a faint grid so panning and zooming have a visual reference.
fn draw_reference_grid(painter: &Painter, rect: &Rect, projection: &MapProjection) {
    let Ok((min_lon, min_lat, max_lon, max_lat)) = projection.visible_bounds() else {
        return;
    };

    // Aim for roughly ten lines across the shorter side
    let span = (max_lat - min_lat).min(max_lon - min_lon);
    if span <= 0.0 {
        return;
    }
    let step = 10f64.powf((span / 10.0).log10().floor());
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 12));

    let mut lon = (min_lon / step).floor() * step;
    while lon <= max_lon {
        if let Ok(p) = projection.project(Position { x: lon, y: min_lat }) {
            let x = p.x;
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        }
        lon += step;
    }

    let mut lat = (min_lat / step).floor() * step;
    while lat <= max_lat {
        if let Ok(p) = projection.project(Position { x: min_lon, y: lat }) {
            let y = p.y;
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        }
        lat += step;
    }
}

fn project_all(projection: &MapProjection, positions: &[Position]) -> Vec<Pos2> {
    positions
        .iter()
        .filter_map(|p| projection.project(*p).ok())
        .map(to_pos2)
        .collect()
}

fn paint_frame(painter: &Painter, frame: &RenderFrame, projection: &MapProjection) {
    // Committed polygons
    for polygon in &frame.polygons {
        let points = project_all(projection, polygon.ring.positions());
        let (color, width) = if polygon.selected {
            (SELECTED_COLOR, 3.0)
        } else {
            (POLYGON_COLOR, 2.0)
        };
        for p in &points {
            painter.circle_filled(*p, 3.0, color);
        }
        painter.add(Shape::line(points, Stroke::new(width, color)));
    }

    // Draft preview
    if let Some(ring) = &frame.draft_polygon {
        let points = project_all(projection, ring.positions());
        painter.add(Shape::line(
            points,
            Stroke::new(1.0, DRAFT_COLOR.gamma_multiply(0.4)),
        ));
    }
    if frame.draft_line.len() >= 2 {
        let points = project_all(projection, &frame.draft_line);
        painter.extend(Shape::dashed_line(
            &points,
            Stroke::new(2.0, DRAFT_COLOR),
            8.0,
            5.0,
        ));
        // Placed vertices; the last line position is the pointer
        for p in &points[..points.len().saturating_sub(1)] {
            painter.circle_filled(*p, 4.0, DRAFT_COLOR);
        }
    }
    if let Some(cursor) = frame.cursor.and_then(|c| projection.project(c).ok()) {
        if frame.snapped {
            painter.circle_stroke(to_pos2(cursor), 8.0, Stroke::new(2.0, SNAP_COLOR));
        } else {
            painter.circle_filled(to_pos2(cursor), 3.0, DRAFT_COLOR);
        }
    }

    // Edit handles
    for handle in &frame.handles {
        if let Ok(p) = projection.project(handle.position) {
            painter.circle_filled(to_pos2(p), HANDLE_RADIUS, Color32::WHITE);
            painter.circle_stroke(to_pos2(p), HANDLE_RADIUS, Stroke::new(2.0, SELECTED_COLOR));
        }
    }

    for label in &frame.labels {
        paint_label(painter, label, projection);
    }
}

/// Draws a label centered on its anchor, rotated clockwise by its bearing.
fn paint_label(painter: &Painter, label: &Label, projection: &MapProjection) {
    if !projection.is_visible(label.position, 0.0) {
        return;
    }
    let Ok(anchor) = projection.project(label.position) else {
        return;
    };
    let anchor = to_pos2(anchor);

    let (size, color) = match label.kind {
        LabelKind::Area => (14.0, Color32::WHITE),
        LabelKind::EdgeLength => (12.0, Color32::from_rgb(220, 220, 235)),
        LabelKind::DraftSegment => (12.0, DRAFT_COLOR),
    };
    let galley = painter.layout_no_wrap(label.text.clone(), FontId::proportional(size), color);

    if label.bearing.is_none() {
        let background = Rect::from_center_size(anchor, galley.size() + Vec2::splat(6.0));
        painter.rect_filled(background, 3.0, Color32::from_black_alpha(160));
    }

    let angle = label.bearing.map(|b| (b as f32).to_radians()).unwrap_or(0.0);
    let pos = anchor - Rot2::from_angle(angle) * (galley.size() / 2.0);
    painter.add(TextShape::new(pos, galley, color).with_angle(angle));
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, state: &AppState, projection: &MapProjection) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 50.0));
    let text_color = Color32::from_rgb(200, 200, 220);

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            if let Ok(zoom) = projection.map_zoom() {
                ui.label(
                    RichText::new(format!("Zoom: {:.1}", zoom))
                        .monospace()
                        .size(12.0)
                        .color(text_color),
                );
            }
            if let Some(p) = state.pointer {
                ui.label(
                    RichText::new(format!("{:.6}, {:.6}", p.y, p.x))
                        .monospace()
                        .size(12.0)
                        .color(text_color),
                );
            }
        });
    });
}

fn sync_url(state: &mut AppState, projection: &MapProjection) {
    let (Ok(center), Ok(zoom)) = (projection.view_center(), projection.map_zoom()) else {
        return;
    };
    let query = crate::state::url_state::format_query(center.y, center.x, zoom);
    if query != state.last_url_query {
        crate::state::url_state::push_to_url(center.y, center.x, zoom);
        state.last_url_query = query;
    }
}
