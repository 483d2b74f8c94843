//! ServicePanel — home view: the active-recordings list.
//!
//! The list is a full replacement of whatever the latest status poll
//! reported.  Stopping a capture goes through the confirm gate and the app
//! re-polls immediately afterwards so the row disappears within one
//! round-trip, not one poll period.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use deck_proto::protocol::ActiveRecording;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_selected_focused, C_LIVE, C_MUTED, C_SECONDARY},
    widgets::{
        pane_chrome::{pane, Badge},
        select_list::SelectList,
    },
};

pub struct ServicePanel {
    list: SelectList<ActiveRecording>,
}

impl ServicePanel {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
        }
    }

    /// Re-sync from the latest status snapshot.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.status.active_recordings.clone());
    }
}

impl Component for ServicePanel {
    fn id(&self) -> ComponentId {
        ComponentId::ServicePanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char('x') => {
                if let Some(rec) = self.list.selected_item() {
                    let channel = rec.channel.clone();
                    return vec![Action::Confirm {
                        prompt: format!("Stop recording {}?", channel),
                        then: Box::new(Action::StopRecording(channel)),
                    }];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let live = state.status.active_recordings.len();
        let badge = if live > 0 {
            Some(Badge {
                text: "LIVE",
                color: C_LIVE,
            })
        } else {
            None
        };
        let block = pane("active recordings", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if state.status_seen {
                "  No active recordings."
            } else {
                "  Waiting for the service…"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let selected = self.list.selected_index();

        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .map(|(idx, rec)| {
                let row_style = if focused && idx == selected {
                    style_selected_focused()
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(C_LIVE)),
                    Span::styled(rec.channel.clone(), row_style),
                    Span::styled(
                        format!("  {}", rec.filename),
                        Style::default().fg(C_SECONDARY),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for ServicePanel {
    fn default() -> Self {
        Self::new()
    }
}
