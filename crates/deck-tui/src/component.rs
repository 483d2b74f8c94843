//! Component trait — the interface every view panel implements.
//!
//! Components are self-contained: they own their cursor/editor state and
//! render themselves from the shared `AppState` snapshot.  They never mutate
//! shared state directly — they return `Vec<Action>` and the app event-loop
//! dispatches.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event.  Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
