use serde::{Deserialize, Serialize};

/// Snapshot of the service as reported by `GET /api/status`.  Replaced
/// wholesale on every poll tick; the client never patches it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceStatus {
    #[serde(default)]
    pub service_enabled: bool,
    #[serde(default)]
    pub active_recordings: Vec<ActiveRecording>,
}

/// A capture currently in progress.  Identity = channel name (unique among
/// active recordings at any instant).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActiveRecording {
    pub channel: String,
    #[serde(default)]
    pub filename: String,
}

/// A watch-list entry.  Identity = name; the server is the source of truth
/// for uniqueness — the client performs no local dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// A completed (or still-capturing) recording as listed by
/// `GET /api/recordings`.  Identity = filename.
///
/// `upload_status` presence is the idle/uploading discriminator on the wire;
/// downstream code switches on [`RecordingPhase`] instead of probing the
/// option directly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Recording {
    pub filename: String,
    #[serde(default)]
    pub size_mb: f64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub upload_status: Option<UploadStatus>,
}

/// In-flight transfer state for one recording.  Polled, never pushed;
/// progress is monotonically non-decreasing while present, and its
/// disappearance signals completion or failure (which of the two is only
/// known from the synchronous response of the upload call itself).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadStatus {
    pub target: String,
    #[serde(default)]
    pub progress: f64,
}

/// Per-row render state, derived once at the parse boundary.
///
/// An in-flight upload takes precedence over the live-capture flag: the row
/// must show transfer progress and lock the destructive actions either way.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingPhase {
    Idle,
    Active,
    Uploading { target: String, progress: f64 },
}

impl RecordingPhase {
    pub fn of(rec: &Recording) -> Self {
        if let Some(up) = &rec.upload_status {
            return Self::Uploading {
                target: up.target.clone(),
                progress: up.progress.clamp(0.0, 100.0),
            };
        }
        if rec.is_active {
            Self::Active
        } else {
            Self::Idle
        }
    }

    /// Whether a new upload may be staged for this row.
    pub fn can_upload(&self) -> bool {
        !matches!(self, Self::Uploading { .. })
    }

    /// Whether the row may be deleted.  Unsafe mid-transfer.
    pub fn can_delete(&self) -> bool {
        !matches!(self, Self::Uploading { .. })
    }
}

/// One upload dispatch, tagged by destination.  Each variant carries exactly
/// the field set its endpoint accepts — an archive submission can never leak
/// video-platform fields and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UploadRequest {
    Archive {
        filename: String,
        title: String,
    },
    Youtube {
        filename: String,
        title: String,
        description: String,
        privacy: String,
    },
}

impl UploadRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Archive { .. } => "/api/upload/archive",
            Self::Youtube { .. } => "/api/upload/youtube",
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Archive { filename, .. } | Self::Youtube { filename, .. } => filename,
        }
    }

    pub fn target_label(&self) -> &'static str {
        match self {
            Self::Archive { .. } => "archive",
            Self::Youtube { .. } => "youtube",
        }
    }
}

/// Successful upload response body.  Failure bodies carry `error` and are
/// mapped to a domain error by the client before this type is decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// `POST /api/auth/youtube/init` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthInit {
    pub auth_url: String,
}

/// Service settings, loaded on panel entry and fully overwritten on save.
///
/// `check_interval` and `recording_format` stay optional here: the panel
/// applies display defaults when they are unset but never invents values on
/// the wire unless the operator saves.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub check_interval: Option<u64>,
    #[serde(default)]
    pub recording_format: Option<String>,
    #[serde(default)]
    pub upload_targets: UploadTargets,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadTargets {
    #[serde(default)]
    pub archive: ArchiveTarget,
    #[serde(default)]
    pub youtube: YoutubeTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchiveTarget {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct YoutubeTarget {
    #[serde(default)]
    pub client_secrets: String,
    /// Written by the server's auth callback, never by this client.  Skipped
    /// on serialize so a save cannot clobber a token minted out-of-band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl YoutubeTarget {
    /// The server stores an empty string for "no token"; treat it as absent.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }
}

/// Marker the watch-list understands in pasted channel URLs.
const CHANNEL_URL_MARKER: &str = "twitch.tv/";

/// Normalize free-text channel input: a pasted channel URL reduces to the
/// path segment after the platform marker, with any trailing path trimmed.
/// Lowercased to match what the server stores.
pub fn normalize_channel_input(input: &str) -> String {
    let trimmed = input.trim();
    let after = trimmed
        .rsplit_once(CHANNEL_URL_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let name = after.split('/').next().unwrap_or(after);
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_pure_in_flags() {
        let mut rec = Recording {
            filename: "bar.mp4".into(),
            ..Recording::default()
        };
        assert_eq!(RecordingPhase::of(&rec), RecordingPhase::Idle);

        rec.is_active = true;
        assert_eq!(RecordingPhase::of(&rec), RecordingPhase::Active);

        rec.upload_status = Some(UploadStatus {
            target: "archive".into(),
            progress: 42.0,
        });
        let phase = RecordingPhase::of(&rec);
        assert_eq!(
            phase,
            RecordingPhase::Uploading {
                target: "archive".into(),
                progress: 42.0
            }
        );
        assert!(!phase.can_upload());
        assert!(!phase.can_delete());

        rec.upload_status = None;
        rec.is_active = false;
        let phase = RecordingPhase::of(&rec);
        assert!(phase.can_upload());
        assert!(phase.can_delete());
    }

    #[test]
    fn phase_clamps_progress() {
        let rec = Recording {
            filename: "a.mp4".into(),
            upload_status: Some(UploadStatus {
                target: "YouTube".into(),
                progress: 140.0,
            }),
            ..Recording::default()
        };
        match RecordingPhase::of(&rec) {
            RecordingPhase::Uploading { progress, .. } => assert_eq!(progress, 100.0),
            other => panic!("expected uploading, got {:?}", other),
        }
    }

    #[test]
    fn normalize_strips_marker_and_trailing_path() {
        assert_eq!(
            normalize_channel_input("https://twitch.tv/somechannel/videos"),
            "somechannel"
        );
        assert_eq!(normalize_channel_input("twitch.tv/abc"), "abc");
        assert_eq!(normalize_channel_input("  SomeChannel  "), "somechannel");
        assert_eq!(
            normalize_channel_input("https://www.twitch.tv/foo/"),
            "foo"
        );
    }

    #[test]
    fn upload_request_archive_serializes_archive_fields_only() {
        let req = UploadRequest::Archive {
            filename: "rec_foo".into(),
            title: "A title".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["filename"], "rec_foo");
        assert_eq!(v["title"], "A title");
        assert!(v.get("description").is_none());
        assert!(v.get("privacy").is_none());
        assert_eq!(req.endpoint(), "/api/upload/archive");
    }

    #[test]
    fn upload_request_youtube_carries_full_field_set() {
        let req = UploadRequest::Youtube {
            filename: "rec_foo".into(),
            title: "T".into(),
            description: "D".into(),
            privacy: "private".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["privacy"], "private");
        assert_eq!(v["description"], "D");
        assert_eq!(req.endpoint(), "/api/upload/youtube");
        assert_eq!(req.filename(), "rec_foo");
    }

    #[test]
    fn settings_never_serialize_an_absent_token() {
        let s = Settings {
            check_interval: Some(15),
            recording_format: Some("mp4".into()),
            ..Settings::default()
        };
        let v = serde_json::to_value(&s).unwrap();
        assert!(v["upload_targets"]["youtube"].get("token").is_none());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let yt = YoutubeTarget {
            client_secrets: "{}".into(),
            token: Some(String::new()),
        };
        assert!(!yt.has_token());
        let yt = YoutubeTarget {
            token: Some("{\"refresh\":1}".into()),
            ..YoutubeTarget::default()
        };
        assert!(yt.has_token());
    }

    #[test]
    fn status_tolerates_unknown_fields() {
        // The live endpoint also reports active_uploads; the panel ignores it.
        let json = r#"{
            "service_enabled": true,
            "active_recordings": [{"channel": "foo", "filename": "foo_2024.mp4", "pid": 123}],
            "active_uploads": {}
        }"#;
        let status: ServiceStatus = serde_json::from_str(json).unwrap();
        assert!(status.service_enabled);
        assert_eq!(status.active_recordings.len(), 1);
        assert_eq!(status.active_recordings[0].channel, "foo");
    }
}
