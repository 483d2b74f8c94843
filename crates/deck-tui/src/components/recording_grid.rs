//! RecordingGrid — the recordings view.
//!
//! The backing collection is replaced from a fresh fetch on every reconcile
//! tick and after every mutating action; each row's render is a pure
//! function of its [`RecordingPhase`].  There is no optimistic removal: a
//! deleted row only disappears once a subsequent fetch omits it.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use deck_proto::protocol::{Recording, RecordingPhase};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_selected_focused, C_DANGER, C_LIVE, C_MUTED, C_PRIMARY, C_PROGRESS, C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane, Badge},
        progress_bar,
        select_list::SelectList,
    },
};

/// Which row actions are live for a given phase.  Download is always
/// available (an active capture already has a partial file); upload and
/// delete lock while a transfer is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub download: bool,
    pub upload: bool,
    pub delete: bool,
}

pub fn actions_for(phase: &RecordingPhase) -> RowActions {
    RowActions {
        download: true,
        upload: phase.can_upload(),
        delete: phase.can_delete(),
    }
}

fn row_marker(phase: &RecordingPhase) -> (&'static str, Color) {
    match phase {
        RecordingPhase::Idle => ("· ", C_MUTED),
        RecordingPhase::Active => ("● ", C_LIVE),
        RecordingPhase::Uploading { .. } => ("↑ ", C_PROGRESS),
    }
}

pub struct RecordingGrid {
    list: SelectList<Recording>,
}

impl RecordingGrid {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
        }
    }

    /// Replace the grid from the latest fetched collection.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.recordings.clone());
    }

    fn selected_phase(&self) -> Option<(RecordingPhase, &Recording)> {
        self.list
            .selected_item()
            .map(|rec| (RecordingPhase::of(rec), rec))
    }
}

impl Component for RecordingGrid {
    fn id(&self) -> ComponentId {
        ComponentId::RecordingGrid
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char('y') => {
                if let Some(rec) = self.list.selected_item() {
                    return vec![Action::CopyDownloadUrl(rec.url.clone())];
                }
            }
            KeyCode::Char('u') => {
                if let Some((phase, rec)) = self.selected_phase() {
                    if actions_for(&phase).upload {
                        return vec![Action::OpenUploadModal(rec.filename.clone())];
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some((phase, rec)) = self.selected_phase() {
                    if actions_for(&phase).delete {
                        let filename = rec.filename.clone();
                        return vec![Action::Confirm {
                            prompt: format!("Delete {}?", filename),
                            then: Box::new(Action::DeleteRecording(filename)),
                        }];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge_text = format!("{}", self.list.len());
        let badge = if self.list.is_empty() {
            None
        } else {
            Some(Badge {
                text: &badge_text,
                color: C_SECONDARY,
            })
        };
        let block = pane("recordings", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if state.recordings_seen {
                "  No recordings found."
            } else {
                "  Loading recordings…"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        // List on top, selected-row detail strip (3 rows) at the bottom.
        let detail_h = if inner.height > 6 { 3 } else { 0 };
        let list_area = Rect {
            height: inner.height - detail_h,
            ..inner
        };

        let height = list_area.height as usize;
        self.list.ensure_visible(height);
        let selected = self.list.selected_index();

        let name_w = (list_area.width as usize).saturating_sub(34).max(12);
        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .map(|(idx, rec)| {
                let phase = RecordingPhase::of(rec);
                let (marker, marker_color) = row_marker(&phase);
                let row_style = if focused && idx == selected {
                    style_selected_focused()
                } else {
                    Style::default().fg(C_PRIMARY)
                };

                let mut name = rec.filename.clone();
                if name.width() > name_w {
                    name = format!("{}…", name.chars().take(name_w - 1).collect::<String>());
                }

                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(marker_color)),
                    Span::styled(format!("{:<w$}", name, w = name_w), row_style),
                    Span::styled(
                        format!(" {:>8.1} MB", rec.size_mb),
                        Style::default().fg(C_SECONDARY),
                    ),
                    Span::styled(
                        format!("  {}", rec.date),
                        Style::default().fg(C_MUTED),
                    ),
                ];
                match phase {
                    RecordingPhase::Uploading { target, progress } => {
                        spans.push(Span::styled(
                            format!("  {}", progress_bar::inline_label(&target, progress)),
                            Style::default().fg(C_PROGRESS),
                        ));
                    }
                    RecordingPhase::Active => {
                        spans.push(Span::styled("  LIVE", Style::default().fg(C_LIVE)));
                    }
                    RecordingPhase::Idle => {}
                }
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), list_area);

        if detail_h > 0 {
            let detail = Rect {
                y: list_area.y + list_area.height,
                height: detail_h,
                ..inner
            };
            self.draw_detail(frame, detail);
        }
    }
}

impl RecordingGrid {
    /// Detail strip for the selected row: actions with disabled ones dimmed,
    /// plus a full-width progress bar while uploading.
    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let Some((phase, rec)) = self.selected_phase() else {
            return;
        };
        let actions = actions_for(&phase);

        let action_span = |enabled: bool, label: &str| {
            if enabled {
                Span::styled(label.to_string(), Style::default().fg(C_PRIMARY))
            } else {
                Span::styled(label.to_string(), Style::default().fg(C_MUTED))
            }
        };

        let mut action_spans = vec![
            Span::raw(" "),
            action_span(actions.download, "[y] copy link"),
            Span::raw("  "),
            action_span(actions.upload, "[u] upload"),
            Span::raw("  "),
            action_span(actions.delete, "[d] delete"),
        ];
        if !actions.upload {
            action_spans.push(Span::styled(
                "  upload in progress — wait for it to finish",
                Style::default().fg(C_DANGER),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(action_spans)),
            Rect { height: 1, ..area },
        );

        let second = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        match &phase {
            RecordingPhase::Uploading { target, progress } => {
                progress_bar::draw_percent(
                    frame,
                    second,
                    *progress,
                    &format!(" uploading to {}", target),
                );
            }
            _ => {
                let thumb = if rec.thumbnail.is_some() {
                    "thumbnail ready"
                } else {
                    "no thumbnail"
                };
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        format!(" {}  {}", rec.url, thumb),
                        Style::default().fg(C_SECONDARY),
                    ))),
                    second,
                );
            }
        }
    }
}

impl Default for RecordingGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_proto::protocol::UploadStatus;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rec(filename: &str) -> Recording {
        Recording {
            filename: filename.into(),
            url: format!("/files/{}", filename),
            ..Recording::default()
        }
    }

    fn uploading(filename: &str, target: &str, progress: f64) -> Recording {
        Recording {
            upload_status: Some(UploadStatus {
                target: target.into(),
                progress,
            }),
            ..rec(filename)
        }
    }

    fn state_with(recordings: Vec<Recording>) -> AppState {
        let mut state = AppState::new();
        state.recordings = recordings;
        state.recordings_seen = true;
        state
    }

    #[test]
    fn row_actions_are_a_pure_function_of_phase() {
        let idle = actions_for(&RecordingPhase::of(&rec("a.mp4")));
        assert!(idle.download && idle.upload && idle.delete);

        let active = actions_for(&RecordingPhase::of(&Recording {
            is_active: true,
            ..rec("b.mp4")
        }));
        assert!(active.download && active.upload && active.delete);

        let busy = actions_for(&RecordingPhase::of(&uploading("c.mp4", "archive", 42.0)));
        assert!(busy.download);
        assert!(!busy.upload);
        assert!(!busy.delete);
    }

    #[test]
    fn same_filename_regains_actions_once_upload_status_disappears() {
        let before = actions_for(&RecordingPhase::of(&uploading("bar.mp4", "archive", 42.0)));
        assert!(!before.delete);
        let after = actions_for(&RecordingPhase::of(&rec("bar.mp4")));
        assert!(after.delete && after.upload);
    }

    #[test]
    fn uploading_row_ignores_upload_and_delete_keys() {
        let state = state_with(vec![uploading("bar.mp4", "archive", 42.0)]);
        let mut grid = RecordingGrid::new();
        grid.sync(&state);

        assert!(grid.handle_key(key(KeyCode::Char('u')), &state).is_empty());
        assert!(grid.handle_key(key(KeyCode::Char('d')), &state).is_empty());

        // Download stays live.
        let out = grid.handle_key(key(KeyCode::Char('y')), &state);
        assert!(matches!(&out[..], [Action::CopyDownloadUrl(u)] if u == "/files/bar.mp4"));
    }

    #[test]
    fn idle_row_offers_upload_and_gated_delete() {
        let state = state_with(vec![rec("a.mp4")]);
        let mut grid = RecordingGrid::new();
        grid.sync(&state);

        let out = grid.handle_key(key(KeyCode::Char('u')), &state);
        assert!(matches!(&out[..], [Action::OpenUploadModal(f)] if f == "a.mp4"));

        let out = grid.handle_key(key(KeyCode::Char('d')), &state);
        match &out[..] {
            [Action::Confirm { then, .. }] => {
                assert!(matches!(&**then, Action::DeleteRecording(f) if f == "a.mp4"));
            }
            other => panic!("expected confirm, got {:?}", other),
        }
    }

    #[test]
    fn resync_with_unchanged_collection_is_idempotent() {
        let state = state_with(vec![rec("a.mp4"), rec("b.mp4"), rec("c.mp4")]);
        let mut grid = RecordingGrid::new();
        grid.sync(&state);
        grid.handle_key(key(KeyCode::Down), &state);

        let before: Vec<String> = grid.list.items().iter().map(|r| r.filename.clone()).collect();
        let cursor_before = grid.list.selected_index();

        grid.sync(&state);
        let after: Vec<String> = grid.list.items().iter().map(|r| r.filename.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(grid.list.selected_index(), cursor_before);
    }

    #[test]
    fn shrinking_fetch_clamps_the_cursor() {
        let state = state_with(vec![rec("a.mp4"), rec("b.mp4")]);
        let mut grid = RecordingGrid::new();
        grid.sync(&state);
        grid.handle_key(key(KeyCode::Down), &state);
        assert_eq!(grid.list.selected_index(), 1);

        let state = state_with(vec![rec("a.mp4")]);
        grid.sync(&state);
        assert_eq!(grid.list.selected_index(), 0);
    }
}
