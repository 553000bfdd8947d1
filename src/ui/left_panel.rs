//! Left panel UI: drawing tools, current measurement and settings.

use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;
use roof_mapper::labels::{format_area, format_perimeter};
use roof_mapper::{BearingMode, DrawMode, MappingSession};

const MODES: [(DrawMode, &str); 4] = [
    (DrawMode::Navigate, icons::HAND),
    (DrawMode::Draw, icons::POLYGON),
    (DrawMode::Edit, icons::PENCIL_SIMPLE),
    (DrawMode::Measure, icons::RULER),
];

pub fn render_left_panel(ctx: &egui::Context, session: &mut MappingSession) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .max_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.separator();

            render_mode_buttons(ui, session);
            ui.add_space(10.0);

            render_current_measurement(ui, session);
            ui.add_space(10.0);

            render_settings_section(ui, session);
        });
}

fn render_mode_buttons(ui: &mut egui::Ui, session: &mut MappingSession) {
    for (mode, icon) in MODES {
        let active = session.mode() == mode;
        let text = RichText::new(format!("{} {}", icon, mode.label())).size(14.0);
        if ui.selectable_label(active, text).clicked() {
            session.set_mode(mode);
        }
    }

    ui.add_space(5.0);
    ui.horizontal(|ui| {
        let delete_label = if session.selected().is_some() {
            "Delete selected"
        } else {
            "Delete all"
        };
        if ui
            .button(format!("{} {}", icons::TRASH, delete_label))
            .clicked()
        {
            session.delete_selected_or_all();
        }

        if ui.button(format!("{} Cancel", icons::X)).clicked() {
            session.cancel();
        }
    });
}

fn render_current_measurement(ui: &mut egui::Ui, session: &MappingSession) {
    ui.group(|ui| {
        ui.label(RichText::new("Current polygon").strong());
        match session.current_measurement() {
            Some(m) => {
                ui.label(format!("Area: {}", format_area(m.area)));
                ui.label(format!("Perimeter: {}", format_perimeter(m.perimeter)));
            }
            None => {
                ui.label(
                    RichText::new("Draw or select a polygon")
                        .small()
                        .color(Color32::GRAY),
                );
            }
        }
        if !session.draft_points().is_empty() {
            ui.label(
                RichText::new(format!("{} points placed", session.draft_points().len()))
                    .small()
                    .color(Color32::GRAY),
            );
        }
    });
}

fn render_settings_section(ui: &mut egui::Ui, session: &mut MappingSession) {
    egui::CollapsingHeader::new(RichText::new("Settings").strong())
        .default_open(false)
        .show(ui, |ui| {
            let mut settings = session.settings().clone();

            ui.add(
                egui::Slider::new(&mut settings.snap_distance_px, 2.0..=40.0)
                    .text("Snap distance (px)"),
            );

            egui::ComboBox::from_id_salt("bearing_mode")
                .selected_text(bearing_label(settings.bearing_mode))
                .width(120.0)
                .show_ui(ui, |ui| {
                    for mode in [BearingMode::Upright, BearingMode::Raw] {
                        ui.selectable_value(&mut settings.bearing_mode, mode, bearing_label(mode));
                    }
                });

            if &settings != session.settings() {
                settings.save();
                session.apply_settings(settings);
            }
        });
}

fn bearing_label(mode: BearingMode) -> &'static str {
    match mode {
        BearingMode::Upright => "Upright labels",
        BearingMode::Raw => "Edge direction",
    }
}
