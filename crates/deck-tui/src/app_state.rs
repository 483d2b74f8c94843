//! AppState — shared read-only data passed to components during render/event.
//!
//! Every collection here is a projection of server state, replaced wholesale
//! by the poll/fetch results; the app event-loop is the only writer.

use chrono::{DateTime, Local};

use deck_proto::protocol::{Channel, Recording, ServiceStatus, Settings};

use crate::action::View;

/// Whether a text editor currently owns the keyboard (suppresses global
/// single-letter shortcuts like `q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct AppState {
    // ── Server projections ──────────────────────────────────────────────────
    pub status: ServiceStatus,
    /// First status poll has landed (before that the header shows a
    /// connecting hint instead of "stopped").
    pub status_seen: bool,
    pub last_status_at: Option<DateTime<Local>>,
    pub recordings: Vec<Recording>,
    pub recordings_seen: bool,
    pub channels: Vec<Channel>,
    pub settings: Option<Settings>,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub view: View,
    pub input_mode: InputMode,

    /// Transport-failure latch: set on the first failed poll after a
    /// success, cleared on the next good one.  Gates the warning toast so a
    /// down server does not toast every tick.
    pub poll_failing: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: ServiceStatus::default(),
            status_seen: false,
            last_status_at: None,
            recordings: Vec::new(),
            recordings_seen: false,
            channels: Vec::new(),
            settings: None,
            view: View::Home,
            input_mode: InputMode::Normal,
            poll_failing: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
