//! Toasts for session notices, stacked in the bottom-right corner.

use crate::state::{AppState, TOAST_DURATION};
use eframe::egui::{self, Color32, RichText};
use roof_mapper::NoticeLevel;

fn level_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(120, 180, 255),
        NoticeLevel::Success => Color32::from_rgb(100, 200, 100),
        NoticeLevel::Warning => Color32::from_rgb(230, 180, 80),
        NoticeLevel::Error => Color32::from_rgb(230, 90, 90),
    }
}

pub fn render_notices(ctx: &egui::Context, state: &mut AppState) {
    state.expire_toasts();
    if state.toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("notices"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            for toast in &state.toasts {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(
                        RichText::new(&toast.notice.message)
                            .color(level_color(toast.notice.level)),
                    );
                });
                ui.add_space(4.0);
            }
        });

    // Keep repainting so toasts disappear on time
    ctx.request_repaint_after(TOAST_DURATION / 4);
}
