//! TextField — a labeled single-line editor backed by tui-input.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_PRIMARY, C_SECONDARY, C_SELECTION_BG};

pub enum FieldAction {
    Changed,
    /// Enter — the caller takes the committed value.
    Committed(String),
    /// Esc — editing abandoned, the caller keeps its previous value.
    Cancelled,
}

pub struct TextField {
    input: Input,
    label: String,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            label: label.into(),
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldAction {
        match key.code {
            KeyCode::Enter => FieldAction::Committed(self.input.value().to_string()),
            KeyCode::Esc => FieldAction::Cancelled,
            _ => {
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                FieldAction::Changed
            }
        }
    }

    /// Render as `label: value` with a live cursor.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let label = format!("{}: ", self.label);
        let label_w = label.len() as u16;
        let avail = area.width.saturating_sub(label_w + 1) as usize;
        let scroll = self.input.visual_scroll(avail);
        let value = self.input.value();

        let line = Line::from(vec![
            Span::styled(label, Style::default().fg(C_SECONDARY)),
            Span::styled(
                value.chars().skip(scroll).collect::<String>(),
                Style::default().fg(C_PRIMARY),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_SELECTION_BG)),
            area,
        );

        let cursor_x = area.x + label_w + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
    }
}
