//! UploadModal — the transient form session for starting one upload.
//!
//! The single pending slot is the only memory of which recording the form
//! targets: opening stages a filename (overwriting any previous stage),
//! closing clears it, and submission reads it back *before* the close wipes
//! it.  At most one session exists at a time.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use deck_proto::protocol::UploadRequest;

use crate::{
    action::Action,
    theme::{C_BORDER_FOCUSED, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::text_field::{FieldAction, TextField},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Archive,
    Youtube,
}

impl UploadTarget {
    fn other(self) -> Self {
        match self {
            Self::Archive => Self::Youtube,
            Self::Youtube => Self::Archive,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Youtube => "youtube",
        }
    }
}

const PRIVACY_CHOICES: [&str; 3] = ["private", "unlisted", "public"];

/// Form rows, in navigation order.  The visible set depends on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Target,
    Title,
    Description,
    Privacy,
    Submit,
}

pub struct UploadModal {
    /// The pending-upload slot.
    staged: Option<String>,
    target: UploadTarget,
    title_archive: String,
    title_youtube: String,
    description: String,
    privacy_idx: usize,
    row: Row,
    editor: TextField,
    editing: bool,
}

impl UploadModal {
    pub fn new() -> Self {
        Self {
            staged: None,
            target: UploadTarget::Archive,
            title_archive: String::new(),
            title_youtube: String::new(),
            description: String::new(),
            privacy_idx: 0,
            row: Row::Target,
            editor: TextField::new("value"),
            editing: false,
        }
    }

    /// Stage a session for `filename`.  Overwrites any previous stage (last
    /// writer wins) and pre-fills both target titles with the filename.
    pub fn open(&mut self, filename: &str) {
        self.staged = Some(filename.to_string());
        self.title_archive = filename.to_string();
        self.title_youtube = filename.to_string();
        self.description.clear();
        self.privacy_idx = 0;
        self.row = Row::Target;
        self.editing = false;
    }

    /// Clear the slot.  Anything not yet submitted is gone.
    pub fn close(&mut self) {
        self.staged = None;
        self.editing = false;
    }

    pub fn is_open(&self) -> bool {
        self.staged.is_some()
    }

    pub fn staged(&self) -> Option<&str> {
        self.staged.as_deref()
    }

    /// Build the upload request from the staged filename and the visible
    /// field group only.  Reads the slot without clearing it — the caller
    /// closes the modal afterwards.
    pub fn build_request(&self) -> Option<UploadRequest> {
        let filename = self.staged.clone()?;
        Some(match self.target {
            UploadTarget::Archive => UploadRequest::Archive {
                filename,
                title: self.title_archive.clone(),
            },
            UploadTarget::Youtube => UploadRequest::Youtube {
                filename,
                title: self.title_youtube.clone(),
                description: self.description.clone(),
                privacy: PRIVACY_CHOICES[self.privacy_idx].to_string(),
            },
        })
    }

    fn rows(&self) -> &'static [Row] {
        match self.target {
            UploadTarget::Archive => &[Row::Target, Row::Title, Row::Submit],
            UploadTarget::Youtube => &[
                Row::Target,
                Row::Title,
                Row::Description,
                Row::Privacy,
                Row::Submit,
            ],
        }
    }

    fn move_row(&mut self, down: bool) {
        let rows = self.rows();
        let pos = rows.iter().position(|r| *r == self.row).unwrap_or(0);
        let next = if down {
            (pos + 1) % rows.len()
        } else {
            (pos + rows.len() - 1) % rows.len()
        };
        self.row = rows[next];
    }

    fn current_value(&self) -> &str {
        match self.row {
            Row::Title => match self.target {
                UploadTarget::Archive => &self.title_archive,
                UploadTarget::Youtube => &self.title_youtube,
            },
            Row::Description => &self.description,
            _ => "",
        }
    }

    fn commit_value(&mut self, value: String) {
        match self.row {
            Row::Title => match self.target {
                UploadTarget::Archive => self.title_archive = value,
                UploadTarget::Youtube => self.title_youtube = value,
            },
            Row::Description => self.description = value,
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.editing {
            return match self.editor.handle_key(key) {
                FieldAction::Committed(value) => {
                    self.commit_value(value);
                    self.editing = false;
                    vec![Action::EditingEnded]
                }
                FieldAction::Cancelled => {
                    self.editing = false;
                    vec![Action::EditingEnded]
                }
                FieldAction::Changed => vec![],
            };
        }

        match key.code {
            KeyCode::Esc => return vec![Action::CloseUploadModal],
            KeyCode::Up | KeyCode::BackTab => self.move_row(false),
            KeyCode::Down | KeyCode::Tab => self.move_row(true),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => match self.row {
                Row::Target => {
                    self.target = self.target.other();
                    // The highlighted row may not exist in the other group.
                    if !self.rows().contains(&self.row) {
                        self.row = Row::Target;
                    }
                }
                Row::Privacy => {
                    self.privacy_idx = (self.privacy_idx + 1) % PRIVACY_CHOICES.len();
                }
                _ => {}
            },
            KeyCode::Enter => match self.row {
                Row::Submit => {
                    if let Some(req) = self.build_request() {
                        return vec![Action::SubmitUpload(req)];
                    }
                }
                Row::Target => {
                    self.target = self.target.other();
                }
                Row::Privacy => {
                    self.privacy_idx = (self.privacy_idx + 1) % PRIVACY_CHOICES.len();
                }
                Row::Title | Row::Description => {
                    let value = self.current_value().to_string();
                    self.editor.set_value(&value);
                    self.editing = true;
                    return vec![Action::EditingStarted];
                }
            },
            _ => {}
        }
        vec![]
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let Some(filename) = &self.staged else {
            return;
        };

        let w = area.width.saturating_sub(8).clamp(44, 76).min(area.width);
        let h = (self.rows().len() as u16 + 6).min(area.height);
        let dialog = Rect {
            x: area.x + (area.width.saturating_sub(w)) / 2,
            y: area.y + (area.height.saturating_sub(h)) / 2,
            width: w,
            height: h,
        };
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_BORDER_FOCUSED))
            .title(Span::styled(
                "upload recording",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                format!(" {}", filename),
                Style::default().fg(C_SECONDARY),
            )),
            Line::from(""),
        ];

        let row_style = |row: Row, selected: Row| {
            if row == selected {
                Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
            } else {
                Style::default().fg(C_PRIMARY)
            }
        };

        for row in self.rows() {
            let line = match row {
                Row::Target => {
                    let mark = |t: UploadTarget| if self.target == t { "(•)" } else { "( )" };
                    Line::from(vec![
                        Span::styled(" target      ", Style::default().fg(C_SECONDARY)),
                        Span::styled(
                            format!(
                                "{} {}   {} {}",
                                mark(UploadTarget::Archive),
                                UploadTarget::Archive.label(),
                                mark(UploadTarget::Youtube),
                                UploadTarget::Youtube.label()
                            ),
                            row_style(*row, self.row),
                        ),
                    ])
                }
                Row::Title => Line::from(vec![
                    Span::styled(" title       ", Style::default().fg(C_SECONDARY)),
                    Span::styled(self.current_title().to_string(), row_style(*row, self.row)),
                ]),
                Row::Description => Line::from(vec![
                    Span::styled(" description ", Style::default().fg(C_SECONDARY)),
                    Span::styled(self.description.clone(), row_style(*row, self.row)),
                ]),
                Row::Privacy => Line::from(vec![
                    Span::styled(" privacy     ", Style::default().fg(C_SECONDARY)),
                    Span::styled(
                        PRIVACY_CHOICES[self.privacy_idx].to_string(),
                        row_style(*row, self.row),
                    ),
                ]),
                Row::Submit => Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        " start upload ",
                        if self.row == Row::Submit {
                            Style::default()
                                .bg(C_SELECTION_BG)
                                .fg(C_PRIMARY)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(C_SECONDARY)
                        },
                    ),
                ]),
            };
            lines.push(line);
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " ↑↓ field  Enter edit/confirm  Esc cancel",
            Style::default().fg(C_MUTED),
        )));
        frame.render_widget(Paragraph::new(lines), inner);

        if self.editing {
            let edit_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.editor.draw(frame, edit_area);
        }
    }

    fn current_title(&self) -> &str {
        match self.target {
            UploadTarget::Archive => &self.title_archive,
            UploadTarget::Youtube => &self.title_youtube,
        }
    }
}

impl Default for UploadModal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opening_twice_stages_the_last_file_only() {
        let mut modal = UploadModal::new();
        modal.open("a.mp4");
        modal.open("b.mp4");
        assert_eq!(modal.staged(), Some("b.mp4"));
        // Titles follow the staged file.
        assert_eq!(modal.title_archive, "b.mp4");
        assert_eq!(modal.title_youtube, "b.mp4");
    }

    #[test]
    fn close_clears_the_slot_and_kills_submission() {
        let mut modal = UploadModal::new();
        modal.open("a.mp4");
        modal.close();
        assert!(!modal.is_open());
        assert!(modal.build_request().is_none());
    }

    #[test]
    fn archive_submission_carries_archive_fields_only() {
        let mut modal = UploadModal::new();
        modal.open("rec_foo");
        modal.title_archive = "My stream".into();
        // Stray youtube state must not leak into an archive request.
        modal.description = "should not appear".into();

        match modal.build_request().unwrap() {
            UploadRequest::Archive { filename, title } => {
                assert_eq!(filename, "rec_foo");
                assert_eq!(title, "My stream");
            }
            other => panic!("expected archive request, got {:?}", other),
        }
    }

    #[test]
    fn youtube_submission_reads_the_visible_group() {
        let mut modal = UploadModal::new();
        modal.open("rec_foo");
        modal.target = UploadTarget::Youtube;
        modal.description = "desc".into();
        modal.privacy_idx = 1;

        match modal.build_request().unwrap() {
            UploadRequest::Youtube {
                filename,
                title,
                description,
                privacy,
            } => {
                assert_eq!(filename, "rec_foo");
                assert_eq!(title, "rec_foo");
                assert_eq!(description, "desc");
                assert_eq!(privacy, "unlisted");
            }
            other => panic!("expected youtube request, got {:?}", other),
        }
    }

    #[test]
    fn submit_row_emits_the_request() {
        let mut modal = UploadModal::new();
        modal.open("rec_foo");
        // Navigate Target → Title → Submit.
        modal.handle_key(key(KeyCode::Down));
        modal.handle_key(key(KeyCode::Down));
        let out = modal.handle_key(key(KeyCode::Enter));
        match &out[..] {
            [Action::SubmitUpload(UploadRequest::Archive { filename, .. })] => {
                assert_eq!(filename, "rec_foo");
            }
            other => panic!("expected submit, got {:?}", other),
        }
        // The slot survives until the app closes the modal.
        assert!(modal.is_open());
    }

    #[test]
    fn esc_requests_close() {
        let mut modal = UploadModal::new();
        modal.open("a.mp4");
        let out = modal.handle_key(key(KeyCode::Esc));
        assert!(matches!(&out[..], [Action::CloseUploadModal]));
    }

    #[test]
    fn target_toggle_switches_the_visible_field_group() {
        let mut modal = UploadModal::new();
        modal.open("a.mp4");
        assert_eq!(modal.rows().len(), 3);
        modal.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(modal.target, UploadTarget::Youtube);
        assert_eq!(modal.rows().len(), 5);
    }
}
