//! ChannelList — the watch-list view.
//!
//! Add and delete refetch the full list afterwards (no optimistic insert or
//! removal).  Toggle is the one exception: the request is fire-and-forget
//! and the row's own checkbox flip is the immediate feedback; the next full
//! load reconciles if they diverge.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use deck_proto::protocol::Channel;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_selected_focused, C_LIVE, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::pane,
        select_list::SelectList,
        text_field::{FieldAction, TextField},
    },
};

pub struct ChannelList {
    list: SelectList<Channel>,
    add_field: TextField,
    adding: bool,
}

impl ChannelList {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            add_field: TextField::new("add channel"),
            adding: false,
        }
    }

    /// Re-sync from the last confirmed server read.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.channels.clone());
    }
}

impl Component for ChannelList {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.adding {
            return match self.add_field.handle_key(key) {
                FieldAction::Committed(text) => {
                    self.adding = false;
                    self.add_field.clear();
                    if text.trim().is_empty() {
                        vec![Action::EditingEnded]
                    } else {
                        vec![Action::EditingEnded, Action::AddChannel(text)]
                    }
                }
                FieldAction::Cancelled => {
                    self.adding = false;
                    self.add_field.clear();
                    vec![Action::EditingEnded]
                }
                FieldAction::Changed => vec![],
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char('a') => {
                self.adding = true;
                return vec![Action::EditingStarted];
            }
            KeyCode::Char(' ') => {
                // Checkbox flip is the immediate feedback; no refetch.
                if let Some(ch) = self.list.selected_item_mut() {
                    ch.active = !ch.active;
                    return vec![Action::ToggleChannel(ch.name.clone())];
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(ch) = self.list.selected_item() {
                    let name = ch.name.clone();
                    return vec![Action::Confirm {
                        prompt: format!("Remove {}?", name),
                        then: Box::new(Action::DeleteChannel(name)),
                    }];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane("watch-list", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field_rows = if self.adding { 1 } else { 0 };
        let list_area = Rect {
            height: inner.height.saturating_sub(field_rows),
            ..inner
        };

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No channels on the watch-list. Press 'a' to add one.",
                    Style::default().fg(C_MUTED),
                )),
                list_area,
            );
        } else {
            let height = list_area.height as usize;
            self.list.ensure_visible(height);
            let selected = self.list.selected_index();

            let lines: Vec<Line> = self
                .list
                .visible_items(height)
                .map(|(idx, ch)| {
                    let row_style = if focused && idx == selected && !self.adding {
                        style_selected_focused()
                    } else {
                        Style::default().fg(C_PRIMARY)
                    };
                    let (mark, mark_style) = if ch.active {
                        ("[x] ", Style::default().fg(C_LIVE))
                    } else {
                        ("[ ] ", Style::default().fg(C_MUTED))
                    };
                    let mut spans = vec![
                        Span::styled(mark, mark_style),
                        Span::styled(ch.name.clone(), row_style),
                    ];
                    if !ch.active {
                        spans.push(Span::styled(
                            "  paused",
                            Style::default().fg(C_SECONDARY),
                        ));
                    }
                    Line::from(spans)
                })
                .collect();

            frame.render_widget(Paragraph::new(lines), list_area);
        }

        if self.adding {
            let field_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.add_field.draw(frame, field_area);
        }
    }
}

impl Default for ChannelList {
    fn default() -> Self {
        Self::new()
    }
}
