//! Action enum — everything components can ask the app to do.

use deck_proto::protocol::{Settings, UploadRequest};

/// Unique identifier for a focusable panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    ServicePanel,
    ChannelList,
    RecordingGrid,
    SettingsForm,
}

/// One of the mutually exclusive top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Channels,
    Recordings,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Channels, View::Recordings, View::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Channels => "channels",
            Self::Recordings => "recordings",
            Self::Settings => "settings",
        }
    }

    /// Number-key hint shown in the nav strip.
    pub fn key(self) -> char {
        match self {
            Self::Home => '1',
            Self::Channels => '2',
            Self::Recordings => '3',
            Self::Settings => '4',
        }
    }
}

/// All actions that flow through the system.  Components produce them; the
/// app dispatcher applies them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchView(View),

    // ── Service ──────────────────────────────────────────────────────────────
    ToggleService,
    StopRecording(String), // channel

    // ── Channels ─────────────────────────────────────────────────────────────
    AddChannel(String),    // raw operator input, normalized at dispatch
    DeleteChannel(String), // name
    ToggleChannel(String), // name, fire-and-forget

    // ── Recordings ───────────────────────────────────────────────────────────
    RefreshRecordings,
    DeleteRecording(String), // filename
    CopyDownloadUrl(String), // absolute or service-relative URL
    OpenUploadModal(String), // filename

    // ── Upload modal ─────────────────────────────────────────────────────────
    SubmitUpload(UploadRequest),
    CloseUploadModal,

    // ── Settings ─────────────────────────────────────────────────────────────
    SaveSettings(Settings),
    /// Persist the form, then request the authorization URL.
    StartYoutubeAuth {
        client_secrets: String,
        settings: Settings,
    },

    // ── Dialogs ──────────────────────────────────────────────────────────────
    /// Ask before a destructive action; `then` runs on confirmation.
    Confirm { prompt: String, then: Box<Action> },
    /// Blocking message the operator must dismiss.
    Notice(String),

    // ── Input mode bookkeeping ───────────────────────────────────────────────
    EditingStarted,
    EditingEnded,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Noop,
}
