//! App — the event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for
//!   components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks; spawned fetches post their result back instead of blocking the
//!   loop.
//! - Two autonomous timers: the status poll runs for the life of the
//!   process; the recordings poll ticks on its own interval but only does
//!   work while the workspace gate is open.  An in-flight fetch is never
//!   cancelled — a view switch stops future ticks and a late result is
//!   simply applied to its own slice of `AppState`.
//! - Components return `Vec<Action>`; the dispatcher applies each one.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use deck_proto::client::{ApiClient, ApiError};
use deck_proto::config::Config;
use deck_proto::protocol::{
    normalize_channel_input, Channel, Recording, ServiceStatus, Settings,
};

use crate::{
    action::{Action, ComponentId, View},
    app_state::{AppState, InputMode},
    component::Component,
    components::{
        channel_list::ChannelList, header, recording_grid::RecordingGrid,
        service_panel::ServicePanel, settings_form::SettingsForm, upload_modal::UploadModal,
    },
    theme::C_BG,
    widgets::{
        modal::{ConfirmDialog, NoticeDialog},
        toast::ToastManager,
    },
    workspace::WorkspaceManager,
};

/// Failure forwarded from a background task.  `domain` marks an
/// HTTP-success-with-error payload as opposed to a transport fault.
#[derive(Debug, Clone)]
struct Failure {
    domain: bool,
    message: String,
}

impl From<ApiError> for Failure {
    fn from(e: ApiError) -> Self {
        Self {
            domain: e.is_domain(),
            message: e.to_string(),
        }
    }
}

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Status(Result<ServiceStatus, Failure>),
    Recordings(Result<Vec<Recording>, Failure>),
    Channels(Result<Vec<Channel>, Failure>),
    SettingsLoaded(Result<Settings, Failure>),
    ServiceToggled(Result<(), Failure>),
    RecordingStopped {
        channel: String,
        result: Result<(), Failure>,
    },
    ChannelAdded {
        name: String,
        result: Result<(), Failure>,
    },
    ChannelDeleted {
        name: String,
        result: Result<(), Failure>,
    },
    SettingsSaved(Result<(), Failure>),
    RecordingDeleted {
        filename: String,
        result: Result<(), Failure>,
    },
    /// Resolution of the upload call itself — the only place success and
    /// failure of a transfer are distinguished.
    UploadFinished {
        filename: String,
        result: Result<String, Failure>,
    },
    AuthUrl(Result<String, Failure>),
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    client: ApiClient,
    config: Config,

    pub state: AppState,
    wm: WorkspaceManager,

    // ── Components ────────────────────────────────────────────────────────────
    service_panel: ServicePanel,
    channel_list: ChannelList,
    recording_grid: RecordingGrid,
    settings_form: SettingsForm,
    upload_modal: UploadModal,

    // ── Dialog layers ─────────────────────────────────────────────────────────
    confirm: ConfirmDialog,
    notice: NoticeDialog,
    toast: ToastManager,

    tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(client: ApiClient, config: Config) -> Self {
        Self {
            client,
            config,
            state: AppState::new(),
            wm: WorkspaceManager::new(),
            service_panel: ServicePanel::new(),
            channel_list: ChannelList::new(),
            recording_grid: RecordingGrid::new(),
            settings_form: SettingsForm::new(),
            upload_modal: UploadModal::new(),
            confirm: ConfirmDialog::new(),
            notice: NoticeDialog::new(),
            toast: ToastManager::new(),
            tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // The watch-list is loaded once up front; the status interval's
        // immediate first tick covers the initial status poll.
        self.spawn_channels_fetch();

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut status_poll = tokio::time::interval(Duration::from_secs(
            self.config.polling.status_interval_secs.max(1),
        ));
        status_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut recordings_poll = tokio::time::interval(Duration::from_secs(
            self.config.polling.recordings_interval_secs.max(1),
        ));
        recordings_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry check.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                }

                _ = status_poll.tick() => {
                    self.spawn_status_fetch();
                }

                _ = recordings_poll.tick() => {
                    // The interval always ticks; only an open gate does work.
                    if self.wm.recordings_gate_open() {
                        self.spawn_recordings_fetch();
                    }
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Background fetch helpers ──────────────────────────────────────────────

    fn spawn_status_fetch(&self) {
        let Some(tx) = self.tx.clone() else { return };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.status().await.map_err(Failure::from);
            let _ = tx.send(AppMessage::Status(result)).await;
        });
    }

    fn spawn_recordings_fetch(&self) {
        let Some(tx) = self.tx.clone() else { return };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.recordings().await.map_err(Failure::from);
            let _ = tx.send(AppMessage::Recordings(result)).await;
        });
    }

    fn spawn_channels_fetch(&self) {
        let Some(tx) = self.tx.clone() else { return };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.channels().await.map_err(Failure::from);
            let _ = tx.send(AppMessage::Channels(result)).await;
        });
    }

    fn spawn_settings_fetch(&self) {
        let Some(tx) = self.tx.clone() else { return };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.settings().await.map_err(Failure::from);
            let _ = tx.send(AppMessage::SettingsLoaded(result)).await;
        });
    }

    // ── Message handler ───────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => {
                if let Event::Key(key) = ev {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a);
                    }
                }
            }

            AppMessage::Status(Ok(status)) => {
                self.state.status = status;
                self.state.status_seen = true;
                self.state.last_status_at = Some(chrono::Local::now());
                self.service_panel.sync(&self.state);
                self.clear_poll_latch();
            }
            AppMessage::Status(Err(f)) => self.note_poll_failure("status", f),

            AppMessage::Recordings(Ok(recs)) => {
                self.state.recordings = recs;
                self.state.recordings_seen = true;
                self.recording_grid.sync(&self.state);
                self.clear_poll_latch();
            }
            AppMessage::Recordings(Err(f)) => self.note_poll_failure("recordings", f),

            AppMessage::Channels(Ok(channels)) => {
                self.state.channels = channels;
                self.channel_list.sync(&self.state);
            }
            AppMessage::Channels(Err(f)) => self.fail("load channels", f),

            AppMessage::SettingsLoaded(Ok(settings)) => {
                self.settings_form.sync(&settings);
                self.state.settings = Some(settings);
            }
            AppMessage::SettingsLoaded(Err(f)) => self.fail("load settings", f),

            AppMessage::ServiceToggled(result) => match result {
                // Re-poll immediately so the indicator flips within one
                // round-trip, not one poll period.
                Ok(()) => self.spawn_status_fetch(),
                Err(f) => self.fail("toggle service", f),
            },

            AppMessage::RecordingStopped { channel, result } => match result {
                Ok(()) => {
                    self.toast.success(format!("Stopped recording {}.", channel));
                    self.spawn_status_fetch();
                }
                Err(f) => self.fail("stop recording", f),
            },

            AppMessage::ChannelAdded { name, result } => {
                match result {
                    Ok(()) => self.toast.success(format!("Channel {} added.", name)),
                    Err(f) => self.fail("add channel", f),
                }
                // Displayed list always reflects the last confirmed read.
                self.spawn_channels_fetch();
            }

            AppMessage::ChannelDeleted { name, result } => {
                match result {
                    Ok(()) => self.toast.info(format!("Channel {} removed.", name)),
                    Err(f) => self.fail("remove channel", f),
                }
                self.spawn_channels_fetch();
            }

            AppMessage::SettingsSaved(result) => match result {
                Ok(()) => {
                    self.toast.success("Settings saved.");
                    // Reload to reflect server-side normalization.
                    self.spawn_settings_fetch();
                }
                Err(f) => self.fail("save settings", f),
            },

            AppMessage::RecordingDeleted { filename, result } => match result {
                Ok(()) => {
                    self.toast.success("File deleted.");
                    // The row only drops once a fetch omits it.
                    self.spawn_recordings_fetch();
                }
                Err(f) => {
                    debug!(%filename, "delete refused");
                    self.fail("delete recording", f);
                }
            },

            AppMessage::UploadFinished { filename, result } => {
                debug!(%filename, "upload finished");
                match result {
                    Ok(message) => self.notice.open(format!("Upload complete: {}", message)),
                    Err(f) => self.notice.open(format!("Upload failed: {}", f.message)),
                }
                // Final reconciliation clears the progress row.
                self.spawn_recordings_fetch();
            }

            AppMessage::AuthUrl(result) => match result {
                Ok(url) => match webbrowser::open(&url) {
                    Ok(_) => {
                        self.toast
                            .info("Authorization page opened in your browser.");
                    }
                    Err(e) => {
                        warn!("browser open failed: {}", e);
                        self.notice
                            .open(format!("Open this URL to authorize: {}", url));
                    }
                },
                Err(f) => self.notice.open(format!("Authorization error: {}", f.message)),
            },
        }
    }

    // ── Failure policy ────────────────────────────────────────────────────────

    /// Poll failures latch: warn once per outage, then only log.
    fn note_poll_failure(&mut self, what: &str, f: Failure) {
        if !self.state.poll_failing {
            self.toast.warning(format!("Service unreachable ({}).", what));
            warn!("{} poll failed: {}", what, f.message);
        } else {
            debug!("{} poll failed again: {}", what, f.message);
        }
        self.state.poll_failing = true;
    }

    fn clear_poll_latch(&mut self) {
        if self.state.poll_failing {
            self.toast.success("Service reachable again.");
        }
        self.state.poll_failing = false;
    }

    /// User-triggered failures: domain errors block, transport errors toast.
    fn fail(&mut self, what: &str, f: Failure) {
        warn!("{} failed: {}", what, f.message);
        if f.domain {
            self.notice.open(f.message);
        } else {
            self.toast.error(format!("Could not {}: {}", what, f.message));
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Blocking layers own the keyboard, front to back.
        if self.notice.is_open() {
            self.notice.handle_key(key);
            return vec![];
        }
        if self.confirm.is_open() {
            return self.confirm.handle_key(key);
        }
        if self.upload_modal.is_open() {
            return self.upload_modal.handle_key(key);
        }

        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Global keys, suppressed while a text editor owns the keyboard.
        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('t') => return vec![Action::ToggleService],
                KeyCode::Char('1') => return vec![Action::SwitchView(View::Home)],
                KeyCode::Char('2') => return vec![Action::SwitchView(View::Channels)],
                KeyCode::Char('3') => return vec![Action::SwitchView(View::Recordings)],
                KeyCode::Char('4') => return vec![Action::SwitchView(View::Settings)],
                KeyCode::Tab => {
                    return vec![Action::SwitchView(next_view(self.state.view, true))];
                }
                KeyCode::BackTab => {
                    return vec![Action::SwitchView(next_view(self.state.view, false))];
                }
                _ => {}
            }
        }

        let s = &self.state;
        match self.wm.focused() {
            ComponentId::ServicePanel => self.service_panel.handle_key(key, s),
            ComponentId::ChannelList => self.channel_list.handle_key(key, s),
            ComponentId::RecordingGrid => self.recording_grid.handle_key(key, s),
            ComponentId::SettingsForm => self.settings_form.handle_key(key, s),
        }
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match &action {
            Action::Noop => {}
            _ => debug!("action: {:?}", action),
        }

        match action {
            Action::SwitchView(view) => {
                let entry = self.wm.set_view(view);
                self.state.view = view;
                if entry.refresh_recordings {
                    self.spawn_recordings_fetch();
                }
                if entry.load_settings {
                    self.spawn_settings_fetch();
                }
            }

            Action::ToggleService => {
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.toggle_service().await.map_err(Failure::from);
                    let _ = tx.send(AppMessage::ServiceToggled(result)).await;
                });
            }

            Action::StopRecording(channel) => {
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.stop_recording(&channel).await.map_err(Failure::from);
                    let _ = tx
                        .send(AppMessage::RecordingStopped { channel, result })
                        .await;
                });
            }

            Action::AddChannel(raw) => {
                let name = normalize_channel_input(&raw);
                if name.is_empty() {
                    self.toast.warning("Channel name is empty.");
                    return;
                }
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.add_channel(&name).await.map_err(Failure::from);
                    let _ = tx.send(AppMessage::ChannelAdded { name, result }).await;
                });
            }

            Action::DeleteChannel(name) => {
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.delete_channel(&name).await.map_err(Failure::from);
                    let _ = tx.send(AppMessage::ChannelDeleted { name, result }).await;
                });
            }

            Action::ToggleChannel(name) => {
                // Fire-and-forget: the checkbox flip already happened; the
                // next full list load reconciles any divergence.
                let client = self.client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.toggle_channel(&name).await {
                        warn!("toggle channel {} failed: {}", name, e);
                    }
                });
            }

            Action::RefreshRecordings => self.spawn_recordings_fetch(),

            Action::DeleteRecording(filename) => {
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client
                        .delete_recording(&filename)
                        .await
                        .map_err(Failure::from);
                    let _ = tx
                        .send(AppMessage::RecordingDeleted { filename, result })
                        .await;
                });
            }

            Action::CopyDownloadUrl(url) => {
                // The service hands out paths relative to its own origin.
                let full = if url.starts_with("http://") || url.starts_with("https://") {
                    url
                } else {
                    format!(
                        "{}{}",
                        self.config.server.base_url.trim_end_matches('/'),
                        url
                    )
                };
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(full.clone())) {
                    Ok(()) => {
                        let display = if full.chars().count() > 40 {
                            format!("{}…", full.chars().take(40).collect::<String>())
                        } else {
                            full
                        };
                        self.toast.success(format!("Copied {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("Clipboard error: {}", e));
                    }
                }
            }

            Action::OpenUploadModal(filename) => {
                self.upload_modal.open(&filename);
            }

            Action::SubmitUpload(req) => {
                // Order matters: announce, close (clears the slot), reconcile
                // immediately so the progress row appears, then dispatch.
                self.toast.info("Upload started in the background.");
                self.upload_modal.close();
                self.spawn_recordings_fetch();

                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let filename = req.filename().to_string();
                    let result = client
                        .upload(&req)
                        .await
                        .map(|outcome| outcome.message)
                        .map_err(Failure::from);
                    let _ = tx
                        .send(AppMessage::UploadFinished { filename, result })
                        .await;
                });
            }

            Action::CloseUploadModal => self.upload_modal.close(),

            Action::SaveSettings(settings) => {
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client
                        .update_settings(&settings)
                        .await
                        .map_err(Failure::from);
                    let _ = tx.send(AppMessage::SettingsSaved(result)).await;
                });
            }

            Action::StartYoutubeAuth {
                client_secrets,
                settings,
            } => {
                // Credentials must be durable before the browser round trip.
                let Some(tx) = self.tx.clone() else { return };
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = async {
                        client.update_settings(&settings).await?;
                        client.init_youtube_auth(&client_secrets).await
                    }
                    .await
                    .map(|init| init.auth_url)
                    .map_err(Failure::from);
                    let _ = tx.send(AppMessage::AuthUrl(result)).await;
                });
            }

            Action::Confirm { prompt, then } => self.confirm.open(prompt, *then),
            Action::Notice(text) => self.notice.open(text),

            Action::EditingStarted => self.state.input_mode = InputMode::Editing,
            Action::EditingEnded => self.state.input_mode = InputMode::Normal,

            Action::Quit => self.should_quit = true,
            Action::Noop => {}
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(C_BG)),
            area,
        );

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // status line
                Constraint::Length(1), // nav strip
                Constraint::Min(0),    // body
                Constraint::Length(1), // key bar
            ])
            .split(area);

        header::draw_status_line(frame, outer[0], &self.state);
        header::draw_nav(frame, outer[1], self.state.view);
        header::draw_keys_bar(frame, outer[3], self.state.view, self.state.input_mode);

        let overlay_open =
            self.upload_modal.is_open() || self.confirm.is_open() || self.notice.is_open();
        let focused = !overlay_open;
        let body = outer[2];

        match self.state.view {
            View::Home => self.service_panel.draw(frame, body, focused, &self.state),
            View::Channels => self.channel_list.draw(frame, body, focused, &self.state),
            View::Recordings => self.recording_grid.draw(frame, body, focused, &self.state),
            View::Settings => self.settings_form.draw(frame, body, focused, &self.state),
        }

        // ── Overlays, back to front ──────────────────────────────────────────
        self.upload_modal.draw(frame, area);
        self.confirm.draw(frame, area);
        self.notice.draw(frame, area);

        // Toasts topmost.
        self.toast.draw(frame, area);
    }
}

fn next_view(current: View, forward: bool) -> View {
    let all = View::ALL;
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % all.len()
    } else {
        (pos + all.len() - 1) % all.len()
    };
    all[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycles_all_views_in_order() {
        let mut v = View::Home;
        let seen: Vec<View> = (0..4)
            .map(|_| {
                v = next_view(v, true);
                v
            })
            .collect();
        assert_eq!(
            seen,
            vec![View::Channels, View::Recordings, View::Settings, View::Home]
        );
        assert_eq!(next_view(View::Home, false), View::Settings);
    }

    #[test]
    fn failure_keeps_the_domain_flag() {
        let f = Failure::from(ApiError::Domain("Channel exists".into()));
        assert!(f.domain);
        assert_eq!(f.message, "Channel exists");

        let f = Failure::from(ApiError::Payload(
            serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
        ));
        assert!(!f.domain);
    }
}
