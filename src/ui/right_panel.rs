//! Right panel UI: the measurement table for all polygons.

use eframe::egui::{self, Color32, RichText, ScrollArea};
use roof_mapper::labels::{format_area, format_perimeter};
use roof_mapper::MappingSession;

pub fn render_right_panel(ctx: &egui::Context, session: &mut MappingSession) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(240.0)
        .min_width(180.0)
        .max_width(360.0)
        .show(ctx, |ui| {
            ui.heading("Measurements");
            ui.separator();

            if session.measurements().is_empty() {
                ui.label(
                    RichText::new("No polygons yet")
                        .small()
                        .color(Color32::GRAY),
                );
                return;
            }

            let mut clicked = None;
            ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("measurements_grid")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong());
                        ui.label(RichText::new("Area").strong());
                        ui.label(RichText::new("Perimeter").strong());
                        ui.end_row();

                        for (i, m) in session.measurements().iter().enumerate() {
                            let selected = session.selected() == Some(&m.id);
                            if ui.selectable_label(selected, format!("{}", i + 1)).clicked() {
                                clicked = Some(m.id.clone());
                            }
                            ui.label(RichText::new(format_area(m.area)).monospace());
                            ui.label(RichText::new(format_perimeter(m.perimeter)).monospace());
                            ui.end_row();
                        }
                    });
            });

            ui.separator();
            ui.label(
                RichText::new(format!("Total: {}", format_area(session.total_area()))).strong(),
            );

            if let Some(id) = clicked {
                session.select(Some(id));
            }
        });
}
