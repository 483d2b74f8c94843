//! WorkspaceManager — view routing, overlay routing, and the recordings
//! polling gate.
//!
//! The polling lifecycle lives here as explicit fields with idempotent
//! operations: selecting the recordings view any number of times leaves
//! exactly one open gate; selecting any other view closes it.  The status
//! poller is not routed through this manager at all — it runs for the life
//! of the process.

use crate::action::{ComponentId, View};

/// Side effects the app must run after a view switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewEntry {
    /// Entering recordings always refreshes immediately, even on reselect.
    pub refresh_recordings: bool,
    pub load_settings: bool,
}

pub struct WorkspaceManager {
    pub view: View,
    recordings_gate: bool,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            recordings_gate: false,
        }
    }

    /// Switch the active view and return the entry effects to run.
    pub fn set_view(&mut self, view: View) -> ViewEntry {
        self.view = view;
        let mut entry = ViewEntry::default();
        match view {
            View::Recordings => {
                self.open_recordings_gate();
                entry.refresh_recordings = true;
            }
            View::Settings => {
                self.close_recordings_gate();
                entry.load_settings = true;
            }
            _ => self.close_recordings_gate(),
        }
        entry
    }

    /// Idempotent: opening an open gate is a no-op.
    pub fn open_recordings_gate(&mut self) {
        self.recordings_gate = true;
    }

    pub fn close_recordings_gate(&mut self) {
        self.recordings_gate = false;
    }

    /// Whether the recordings reconciliation interval may do work.
    pub fn recordings_gate_open(&self) -> bool {
        self.recordings_gate
    }

    /// The panel that owns the keyboard when no overlay is up.
    pub fn focused(&self) -> ComponentId {
        match self.view {
            View::Home => ComponentId::ServicePanel,
            View::Channels => ComponentId::ChannelList,
            View::Recordings => ComponentId::RecordingGrid,
            View::Settings => ComponentId::SettingsForm,
        }
    }
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_recordings_is_idempotent_but_still_refreshes() {
        let mut wm = WorkspaceManager::new();
        assert!(!wm.recordings_gate_open());

        let first = wm.set_view(View::Recordings);
        assert!(wm.recordings_gate_open());
        assert!(first.refresh_recordings);

        // Reselect without navigating away: still one open gate, still an
        // immediate refresh.
        let again = wm.set_view(View::Recordings);
        assert!(wm.recordings_gate_open());
        assert!(again.refresh_recordings);
    }

    #[test]
    fn leaving_recordings_closes_the_gate() {
        let mut wm = WorkspaceManager::new();
        wm.set_view(View::Recordings);
        assert!(wm.recordings_gate_open());

        for view in [View::Home, View::Channels, View::Settings] {
            wm.set_view(View::Recordings);
            let entry = wm.set_view(view);
            assert!(!wm.recordings_gate_open(), "leaving to {:?}", view);
            assert!(!entry.refresh_recordings);
        }
    }

    #[test]
    fn settings_entry_requests_a_load() {
        let mut wm = WorkspaceManager::new();
        let entry = wm.set_view(View::Settings);
        assert!(entry.load_settings);
        let entry = wm.set_view(View::Home);
        assert!(!entry.load_settings);
    }

    #[test]
    fn focus_follows_view() {
        let mut wm = WorkspaceManager::new();
        assert_eq!(wm.focused(), ComponentId::ServicePanel);
        wm.set_view(View::Channels);
        assert_eq!(wm.focused(), ComponentId::ChannelList);
        wm.set_view(View::Recordings);
        assert_eq!(wm.focused(), ComponentId::RecordingGrid);
        wm.set_view(View::Settings);
        assert_eq!(wm.focused(), ComponentId::SettingsForm);
    }
}
