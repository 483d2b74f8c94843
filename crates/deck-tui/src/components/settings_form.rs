//! SettingsForm — service configuration view.
//!
//! Loaded on view entry, fully overwritten on save (never a partial patch),
//! then reloaded so the form reflects server-side normalization.  The
//! authorization handshake saves first — credentials must be durable before
//! the browser round trip — and the token only ever becomes visible through
//! a later settings load.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use deck_proto::protocol::Settings;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_LIVE, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        pane_chrome::pane,
        text_field::{FieldAction, TextField},
    },
};

/// Display defaults applied client-side when the payload leaves a field
/// unset.  Not persisted unless the operator saves.
const DEFAULT_INTERVAL: u64 = 15;
const DEFAULT_FORMAT: &str = "mp4";

/// Authorization indicator state, a pure function of the loaded settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBadge {
    /// No usable token observed yet.
    Unset,
    /// A settings load reported a token.
    Valid,
}

pub fn auth_badge(settings: Option<&Settings>) -> AuthBadge {
    match settings {
        Some(s) if s.upload_targets.youtube.has_token() => AuthBadge::Valid,
        _ => AuthBadge::Unset,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    CheckInterval,
    RecordingFormat,
    ArchiveAccessKey,
    ArchiveSecretKey,
    YoutubeSecrets,
}

const FIELDS: [Field; 5] = [
    Field::CheckInterval,
    Field::RecordingFormat,
    Field::ArchiveAccessKey,
    Field::ArchiveSecretKey,
    Field::YoutubeSecrets,
];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::CheckInterval => "check interval (s)",
            Self::RecordingFormat => "recording format",
            Self::ArchiveAccessKey => "archive access key",
            Self::ArchiveSecretKey => "archive secret key",
            Self::YoutubeSecrets => "youtube client secrets",
        }
    }

    fn masked(self) -> bool {
        matches!(self, Self::ArchiveSecretKey)
    }
}

pub struct SettingsForm {
    interval: String,
    format: String,
    access_key: String,
    secret_key: String,
    client_secrets: String,
    selected: usize,
    editor: TextField,
    editing: bool,
}

impl SettingsForm {
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            client_secrets: String::new(),
            selected: 0,
            editor: TextField::new("value"),
            editing: false,
        }
    }

    /// Populate the form from a fresh settings load.
    pub fn sync(&mut self, settings: &Settings) {
        self.interval = settings.check_interval.unwrap_or(DEFAULT_INTERVAL).to_string();
        self.format = settings
            .recording_format
            .clone()
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        self.access_key = settings.upload_targets.archive.access_key.clone();
        self.secret_key = settings.upload_targets.archive.secret_key.clone();
        self.client_secrets = settings.upload_targets.youtube.client_secrets.clone();
    }

    /// The complete settings object the save sends — a full overwrite.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings {
            check_interval: Some(self.interval.trim().parse().unwrap_or(DEFAULT_INTERVAL)),
            recording_format: Some(if self.format.trim().is_empty() {
                DEFAULT_FORMAT.to_string()
            } else {
                self.format.trim().to_string()
            }),
            ..Settings::default()
        };
        settings.upload_targets.archive.access_key = self.access_key.clone();
        settings.upload_targets.archive.secret_key = self.secret_key.clone();
        settings.upload_targets.youtube.client_secrets = self.client_secrets.clone();
        settings
    }

    fn value_of(&self, field: Field) -> &str {
        match field {
            Field::CheckInterval => &self.interval,
            Field::RecordingFormat => &self.format,
            Field::ArchiveAccessKey => &self.access_key,
            Field::ArchiveSecretKey => &self.secret_key,
            Field::YoutubeSecrets => &self.client_secrets,
        }
    }

    fn set_value(&mut self, field: Field, value: String) {
        match field {
            Field::CheckInterval => self.interval = value,
            Field::RecordingFormat => self.format = value,
            Field::ArchiveAccessKey => self.access_key = value,
            Field::ArchiveSecretKey => self.secret_key = value,
            Field::YoutubeSecrets => self.client_secrets = value,
        }
    }
}

impl Component for SettingsForm {
    fn id(&self) -> ComponentId {
        ComponentId::SettingsForm
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.editing {
            let field = FIELDS[self.selected];
            return match self.editor.handle_key(key) {
                FieldAction::Committed(value) => {
                    self.set_value(field, value);
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
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(FIELDS.len() - 1);
            }
            KeyCode::Enter => {
                let field = FIELDS[self.selected];
                let value = self.value_of(field).to_string();
                self.editor.set_value(&value);
                self.editing = true;
                return vec![Action::EditingStarted];
            }
            KeyCode::Char('s') => {
                return vec![Action::SaveSettings(self.to_settings())];
            }
            KeyCode::Char('g') => {
                if self.client_secrets.trim().is_empty() {
                    return vec![Action::Notice(
                        "Paste the client secrets JSON before authorizing.".into(),
                    )];
                }
                return vec![Action::StartYoutubeAuth {
                    client_secrets: self.client_secrets.clone(),
                    settings: self.to_settings(),
                }];
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane("settings", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.settings.is_none() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Loading settings…",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let mut lines: Vec<Line> = Vec::with_capacity(FIELDS.len() + 4);
        for (idx, field) in FIELDS.iter().enumerate() {
            let selected = idx == self.selected && !self.editing;
            let value_style = if selected {
                Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
            } else {
                Style::default().fg(C_PRIMARY)
            };
            let raw = self.value_of(*field);
            let shown = if field.masked() && !raw.is_empty() {
                "•".repeat(raw.chars().count().min(24))
            } else {
                let mut v = raw.to_string();
                if v.chars().count() > 48 {
                    v = format!("{}…", v.chars().take(47).collect::<String>());
                }
                v
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:<24}", field.label()),
                    Style::default().fg(C_SECONDARY),
                ),
                Span::styled(shown, value_style),
            ]));
        }

        lines.push(Line::from(""));
        let badge_line = match auth_badge(state.settings.as_ref()) {
            AuthBadge::Valid => Line::from(vec![
                Span::styled(" youtube authorization   ", Style::default().fg(C_SECONDARY)),
                Span::styled(
                    "✓ token valid",
                    Style::default().fg(C_LIVE).add_modifier(Modifier::BOLD),
                ),
            ]),
            AuthBadge::Unset => Line::from(vec![
                Span::styled(" youtube authorization   ", Style::default().fg(C_SECONDARY)),
                Span::styled("not authorized", Style::default().fg(C_MUTED)),
            ]),
        };
        lines.push(badge_line);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " [s] save   [g] authorize youtube",
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
}

impl Default for SettingsForm {
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
    fn unset_fields_get_display_defaults() {
        let mut form = SettingsForm::new();
        form.sync(&Settings::default());
        assert_eq!(form.interval, "15");
        assert_eq!(form.format, "mp4");
    }

    #[test]
    fn loaded_values_win_over_defaults() {
        let settings = Settings {
            check_interval: Some(30),
            recording_format: Some("ts".into()),
            ..Settings::default()
        };
        let mut form = SettingsForm::new();
        form.sync(&settings);
        assert_eq!(form.interval, "30");
        assert_eq!(form.format, "ts");
    }

    #[test]
    fn save_sends_the_complete_object() {
        let mut form = SettingsForm::new();
        form.sync(&Settings::default());
        form.access_key = "AK".into();
        form.secret_key = "SK".into();
        form.client_secrets = "{}".into();

        let out = form.handle_key(key(KeyCode::Char('s')), &AppState::new());
        match &out[..] {
            [Action::SaveSettings(s)] => {
                assert_eq!(s.check_interval, Some(15));
                assert_eq!(s.recording_format.as_deref(), Some("mp4"));
                assert_eq!(s.upload_targets.archive.access_key, "AK");
                assert_eq!(s.upload_targets.archive.secret_key, "SK");
                assert_eq!(s.upload_targets.youtube.client_secrets, "{}");
                assert!(s.upload_targets.youtube.token.is_none());
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn auth_requires_client_secrets() {
        let mut form = SettingsForm::new();
        let out = form.handle_key(key(KeyCode::Char('g')), &AppState::new());
        assert!(matches!(&out[..], [Action::Notice(_)]));

        form.client_secrets = "{\"installed\":{}}".into();
        let out = form.handle_key(key(KeyCode::Char('g')), &AppState::new());
        match &out[..] {
            [Action::StartYoutubeAuth {
                client_secrets,
                settings,
            }] => {
                assert_eq!(client_secrets, "{\"installed\":{}}");
                // The save that precedes the handshake carries the secrets too.
                assert_eq!(
                    settings.upload_targets.youtube.client_secrets,
                    "{\"installed\":{}}"
                );
            }
            other => panic!("expected auth start, got {:?}", other),
        }
    }

    #[test]
    fn auth_badge_follows_token_presence() {
        assert_eq!(auth_badge(None), AuthBadge::Unset);
        assert_eq!(auth_badge(Some(&Settings::default())), AuthBadge::Unset);

        let mut settings = Settings::default();
        settings.upload_targets.youtube.token = Some(String::new());
        assert_eq!(auth_badge(Some(&settings)), AuthBadge::Unset);

        settings.upload_targets.youtube.token = Some("tok".into());
        assert_eq!(auth_badge(Some(&settings)), AuthBadge::Valid);
    }

    #[test]
    fn bad_interval_input_falls_back_to_default_on_save() {
        let mut form = SettingsForm::new();
        form.interval = "not a number".into();
        assert_eq!(form.to_settings().check_interval, Some(15));
    }
}
