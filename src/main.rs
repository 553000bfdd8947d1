#![warn(clippy::all)]

//! Roof Mapper - draw roof outlines on a map and measure them.
//!
//! Polygons are drawn vertex by vertex, snap to existing corners and show
//! edge lengths, area and perimeter while they are drawn and edited.

mod state;
mod ui;

use eframe::egui;
use roof_mapper::{DrawingSettings, ImageryWatcher, MappingSession};
use state::AppState;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Roof Mapper",
        native_options,
        Box::new(|cc| Ok(Box::new(RoofMapperApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        let canvas = match document
            .get_element_by_id("app_canvas")
            .map(|e| e.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            _ => {
                log::error!("app_canvas is missing or not a canvas element");
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(RoofMapperApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct RoofMapperApp {
    /// Host state: view, status and toasts
    state: AppState,

    /// Polygons, draft, editor and measurements
    session: MappingSession,

    /// Tracks the one-time out-of-region imagery warning
    imagery: ImageryWatcher,
}

impl RoofMapperApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings = DrawingSettings::load();
        log::info!(
            "Starting with snap distance {} px, bearing mode {:?}",
            settings.snap_distance_px,
            settings.bearing_mode
        );

        Self {
            state: AppState::new(),
            session: MappingSession::new(settings),
            imagery: ImageryWatcher::new(),
        }
    }
}

impl eframe::App for RoofMapperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.cancel();
        }

        ui::render_top_bar(ctx, &self.state, &self.session);
        ui::render_left_panel(ctx, &mut self.session);
        ui::render_right_panel(ctx, &mut self.session);
        ui::render_canvas(ctx, &mut self.state, &mut self.session, &mut self.imagery);

        for notice in self.session.take_notices() {
            self.state.push_notice(notice);
        }
        self.state.status_message = format!(
            "{} polygon(s), total {}",
            self.session.polygons().len(),
            roof_mapper::labels::format_area(self.session.total_area())
        );
        ui::render_notices(ctx, &mut self.state);
    }
}
