//! Contract tests for the recording-service HTTP facade.
//!
//! These verify exact request shape per endpoint and the two-channel error
//! split: transport faults vs domain failures (`error` in the payload, with
//! any HTTP status).

use deck_proto::client::{ApiClient, ApiError};
use deck_proto::protocol::{RecordingPhase, Settings, UploadRequest};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ────────────────────────────────────────────────────────────────────────────
// Reads
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_parses_enabled_and_active_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service_enabled": true,
            "active_recordings": [{"channel": "foo", "filename": "foo_2024.mp4"}],
            "active_uploads": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let status = client.status().await.unwrap();
    assert!(status.service_enabled);
    assert_eq!(status.active_recordings.len(), 1);
    assert_eq!(status.active_recordings[0].channel, "foo");
    assert_eq!(status.active_recordings[0].filename, "foo_2024.mp4");
}

#[tokio::test]
async fn recordings_parse_all_three_row_states() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"filename": "idle.mp4", "size_mb": 10.5, "date": "01/02/2024 10:00",
             "url": "/files/idle.mp4", "is_active": false},
            {"filename": "live.mp4", "size_mb": 3.0, "date": "01/02/2024 11:00",
             "url": "/files/live.mp4", "is_active": true, "thumbnail": null},
            {"filename": "bar.mp4", "size_mb": 99.9, "date": "01/02/2024 12:00",
             "url": "/files/bar.mp4", "is_active": false,
             "upload_status": {"target": "Archive.org", "progress": 42.0, "status": "uploading"}}
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let recs = client.recordings().await.unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(RecordingPhase::of(&recs[0]), RecordingPhase::Idle);
    assert_eq!(RecordingPhase::of(&recs[1]), RecordingPhase::Active);
    match RecordingPhase::of(&recs[2]) {
        RecordingPhase::Uploading { target, progress } => {
            assert_eq!(target, "Archive.org");
            assert_eq!(progress, 42.0);
        }
        other => panic!("expected uploading, got {:?}", other),
    }
}

#[tokio::test]
async fn settings_token_presence_survives_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "check_interval": 30,
            "recording_format": "ts",
            "upload_targets": {
                "archive": {"access_key": "AK", "secret_key": "SK"},
                "youtube": {"enabled": false, "client_secrets": "{}", "token": "tok"}
            }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let settings = client.settings().await.unwrap();
    assert_eq!(settings.check_interval, Some(30));
    assert_eq!(settings.recording_format.as_deref(), Some("ts"));
    assert!(settings.upload_targets.youtube.has_token());
    assert_eq!(settings.upload_targets.archive.access_key, "AK");
}

// ────────────────────────────────────────────────────────────────────────────
// Mutations: request shape
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_channel_posts_the_channel_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/channels"))
        .and(body_json(json!({"channel": "somechannel"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "added"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    client.add_channel("somechannel").await.unwrap();
}

#[tokio::test]
async fn channel_delete_and_toggle_use_path_identity() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/channels/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/channels/toggle/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "toggled"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    client.delete_channel("foo").await.unwrap();
    client.toggle_channel("foo").await.unwrap();
}

#[tokio::test]
async fn upload_archive_hits_archive_endpoint_with_archive_fields_only() {
    let server = MockServer::start().await;

    // Exact body match: the video-platform fields must never appear.
    Mock::given(method("POST"))
        .and(path("/api/upload/archive"))
        .and(body_json(json!({"filename": "rec_foo", "title": "My stream"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "message": "Uploaded to https://archive.org/details/rec_foo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let outcome = client
        .upload(&UploadRequest::Archive {
            filename: "rec_foo".into(),
            title: "My stream".into(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, "success");
    assert!(outcome.message.contains("archive.org"));
}

#[tokio::test]
async fn upload_youtube_carries_description_and_privacy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload/youtube"))
        .and(body_json(json!({
            "filename": "rec_foo",
            "title": "T",
            "description": "D",
            "privacy": "private"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "message": "Uploaded to YouTube! Video ID: abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let outcome = client
        .upload(&UploadRequest::Youtube {
            filename: "rec_foo".into(),
            title: "T".into(),
            description: "D".into(),
            privacy: "private".into(),
        })
        .await
        .unwrap();
    assert!(outcome.message.contains("abc123"));
}

#[tokio::test]
async fn update_settings_sends_the_full_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_partial_json(json!({
            "check_interval": 15,
            "recording_format": "mp4",
            "upload_targets": {"archive": {"access_key": "AK"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"check_interval": 15})))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = Settings {
        check_interval: Some(15),
        recording_format: Some("mp4".into()),
        ..Settings::default()
    };
    settings.upload_targets.archive.access_key = "AK".into();

    let client = ApiClient::new(server.uri());
    client.update_settings(&settings).await.unwrap();
}

// ────────────────────────────────────────────────────────────────────────────
// Error channels
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_recording_error_payload_is_a_domain_failure() {
    let server = MockServer::start().await;

    // The service reports a mid-upload conflict as 409 + error body.
    Mock::given(method("DELETE"))
        .and(path("/api/recording/bar.mp4"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "File is currently being uploaded. Please wait."
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.delete_recording("bar.mp4").await.unwrap_err();
    match err {
        ApiError::Domain(msg) => assert!(msg.contains("currently being uploaded")),
        other => panic!("expected domain failure, got {:?}", other),
    }
}

#[tokio::test]
async fn two_hundred_with_error_field_is_still_a_domain_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/youtube/init"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Invalid client secrets"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.init_youtube_auth("{}").await.unwrap_err();
    assert!(err.is_domain());
}

#[tokio::test]
async fn auth_init_success_returns_the_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/youtube/init"))
        .and(body_json(json!({"client_secrets": "{\"installed\":{}}"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth_url": "https://accounts.example.com/o/oauth2/auth?x=1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let init = client.init_youtube_auth("{\"installed\":{}}").await.unwrap();
    assert!(init.auth_url.starts_with("https://"));
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    // Nothing listening on this port.
    let client = ApiClient::new("http://127.0.0.1:9");
    let err = client.status().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
