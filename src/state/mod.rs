//! Application state management.
//!
//! Host-side state only: the map view, status text and the toasts shown for
//! session notices. Drawing state lives in the `MappingSession`.

pub mod url_state;
mod view;

pub use view::ViewState;

use roof_mapper::{HandleId, ImageryStatus, Notice, Position};
use web_time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// A session notice on its way across the screen.
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

/// Root application state.
#[derive(Default)]
pub struct AppState {
    /// Map center, zoom and pan
    pub view: ViewState,

    /// Application status message displayed in top bar
    pub status_message: String,

    /// Base imagery decision for the current viewport
    pub imagery: Option<ImageryStatus>,

    /// Geographic position under the pointer
    pub pointer: Option<Position>,

    /// Vertex handle being dragged in edit mode
    pub active_handle: Option<HandleId>,

    /// Pending toasts, oldest first
    pub toasts: Vec<Toast>,

    /// Last view written to the URL
    pub last_url_query: String,
}

impl AppState {
    pub fn new() -> Self {
        let params = url_state::parse_from_url();
        Self {
            view: ViewState::from_url(&params),
            status_message: "Ready".to_string(),
            ..Default::default()
        }
    }

    pub fn push_notice(&mut self, notice: Notice) {
        log::debug!("Notice ({:?}): {}", notice.level, notice.message);
        self.toasts.push(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    /// Drops toasts that have been visible long enough.
    pub fn expire_toasts(&mut self) {
        self.toasts
            .retain(|t| t.shown_at.elapsed() < TOAST_DURATION);
    }
}
