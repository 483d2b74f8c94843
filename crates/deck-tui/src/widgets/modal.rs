//! Blocking dialogs: confirmation gate and notice.
//!
//! Confirm guards destructive actions — the guarded action is staged and
//! only dispatched on an explicit yes.  Notice is the blocking-alert analog
//! for domain failures and upload completions; it swallows keys until
//! dismissed.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::theme::{C_BORDER_FOCUSED, C_DANGER, C_MUTED, C_PRIMARY};

/// Center a `width`×`height` box inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

pub struct ConfirmDialog {
    prompt: String,
    pending: Option<Action>,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            pending: None,
        }
    }

    pub fn open(&mut self, prompt: String, then: Action) {
        self.prompt = prompt;
        self.pending = Some(then);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// `y`/Enter dispatches the staged action; `n`/Esc abandons it.  Either
    /// way the dialog closes.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.pending.take() {
                    Some(action) => vec![action],
                    None => vec![],
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending = None;
                vec![]
            }
            _ => vec![],
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if !self.is_open() {
            return;
        }
        let w = (self.prompt.chars().count() as u16 + 6)
            .max(30)
            .min(area.width.saturating_sub(4).max(1));
        let dialog = centered(area, w, 5);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_DANGER))
            .title(Span::styled(
                "confirm",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let lines = vec![
            Line::from(Span::styled(
                self.prompt.clone(),
                Style::default().fg(C_PRIMARY),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[y] yes   [n] no",
                Style::default().fg(C_MUTED),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self::new()
    }
}

pub struct NoticeDialog {
    text: Option<String>,
}

impl NoticeDialog {
    pub fn new() -> Self {
        Self { text: None }
    }

    pub fn open(&mut self, text: String) {
        self.text = Some(text);
    }

    pub fn is_open(&self) -> bool {
        self.text.is_some()
    }

    /// Enter/Esc dismiss; everything else is swallowed (blocking).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                self.text = None;
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let Some(text) = &self.text else {
            return;
        };
        let w = area.width.saturating_sub(8).clamp(36, 72);
        let text_rows = (text.chars().count() as u16 / w.saturating_sub(4).max(1)) + 1;
        let dialog = centered(area, w, (text_rows + 4).min(area.height));
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_BORDER_FOCUSED))
            .title(Span::styled(
                "notice",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut lines = vec![Line::from(Span::styled(
            text.clone(),
            Style::default().fg(C_PRIMARY),
        ))];
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "press enter to continue",
            Style::default().fg(C_MUTED),
        )));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Default for NoticeDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn confirm_dispatches_staged_action_on_yes_only() {
        let mut dialog = ConfirmDialog::new();
        dialog.open("Delete foo?".into(), Action::DeleteRecording("foo".into()));
        assert!(dialog.is_open());

        let out = dialog.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(&out[..], [Action::DeleteRecording(f)] if f == "foo"));
        assert!(!dialog.is_open());

        dialog.open("Delete bar?".into(), Action::DeleteRecording("bar".into()));
        let out = dialog.handle_key(key(KeyCode::Esc));
        assert!(out.is_empty());
        assert!(!dialog.is_open());
    }

    #[test]
    fn notice_blocks_until_dismissed() {
        let mut dialog = NoticeDialog::new();
        dialog.open("Upload complete".into());
        assert!(!dialog.handle_key(key(KeyCode::Char('x'))));
        assert!(dialog.is_open());
        assert!(dialog.handle_key(key(KeyCode::Enter)));
        assert!(!dialog.is_open());
    }
}
