//! Top bar UI: app title, mode hint and status.

use crate::state::AppState;
use eframe::egui::{self, Color32, RichText};
use roof_mapper::{BaseLayer, MappingSession};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, session: &MappingSession) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new("Roof Mapper")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(
                    RichText::new(session.mode().label())
                        .size(13.0)
                        .color(Color32::from_rgb(120, 180, 255)),
                );
                ui.label(
                    RichText::new(session.mode().hint())
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.separator();

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                if let Some(message) = state.imagery.as_ref().and_then(|s| s.message.as_ref()) {
                    ui.separator();
                    let color = match state.imagery.as_ref().map(|s| s.layer) {
                        Some(BaseLayer::FallbackImagery) => Color32::from_rgb(230, 180, 80),
                        _ => Color32::GRAY,
                    };
                    ui.label(RichText::new(message).size(13.0).color(color));
                }
            });
        });
}
