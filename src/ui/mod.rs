//! UI modules for the Roof Mapper application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, mode hint, status and imagery message
//! - Left panel: Drawing tools, current measurement and settings
//! - Central canvas: Map view with polygons and labels
//! - Right panel: Measurement table
//! - Notices: Toasts for session messages

mod canvas;
mod left_panel;
mod notices;
mod right_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use notices::render_notices;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
