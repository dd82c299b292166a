// Integration tests for the analysis submission client
//
// These run against a real local HTTP server so that multipart encoding,
// status handling and network failures are exercised end to end.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use voxcheck::audio::{AudioClip, ClipSource};
use voxcheck::config::ApiConfig;
use voxcheck::error::SubmitError;
use voxcheck::AnalyzeClient;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> AnalyzeClient {
    AnalyzeClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn wav_clip() -> AudioClip {
    // One second of silence at 16kHz mono
    AudioClip::from_samples("voice_test", &vec![0i16; 16000], 16000, 1).unwrap()
}

fn analysis_json() -> serde_json::Value {
    json!({
        "id": "anl_1724500000000",
        "is_real": false,
        "confidence": 0.89,
        "prob_fake": 0.89,
        "duration": 3.1,
        "sample_rate": 16000,
        "processing_ms": 42,
        "timestamp": "2026-08-24T12:00:00Z",
        "explanations": { "features": "241D (mel100 mean+std + mfcc20 mean+std + duration)" }
    })
}

#[derive(Clone, Default)]
struct Seen {
    field: Arc<Mutex<Option<(String, String, usize)>>>,
}

async fn record_multipart(State(seen): State<Seen>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        *seen.field.lock().await = Some((name, filename, bytes.len()));
    }
    Json(analysis_json())
}

#[tokio::test]
async fn successful_submission_parses_response() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/analyze", post(record_multipart))
        .with_state(seen.clone());
    let base = spawn_server(router).await;

    let clip = wav_clip();
    let response = client_for(&base).analyze(&clip).await.unwrap();

    assert_eq!(response.id, "anl_1724500000000");
    assert!(!response.is_real);
    assert!((response.confidence - 0.89).abs() < 1e-9);
    assert!((response.duration - 3.1).abs() < 1e-9);
    assert_eq!(response.sample_rate, 16000);
    assert_eq!(response.processing_ms, 42);
    assert!(response.explanations.is_some());

    // The clip went out as multipart field "file" with its filename
    let (name, filename, size) = seen.field.lock().await.clone().unwrap();
    assert_eq!(name, "file");
    assert_eq!(filename, "voice_test");
    assert_eq!(size, clip.bytes.len());
}

#[tokio::test]
async fn missing_optional_fields_are_tolerated() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async {
            Json(json!({
                "id": "anl_2",
                "is_real": true,
                "confidence": 0.937,
                "duration": 2.3,
                "sample_rate": 16000,
                "processing_ms": 10,
                "timestamp": "2026-08-24T12:00:00Z"
            }))
        }),
    );
    let base = spawn_server(router).await;

    let response = client_for(&base).analyze(&wav_clip()).await.unwrap();
    assert!(response.is_real);
    assert_eq!(response.prob_fake, 0.0);
    assert!(response.explanations.is_none());
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable") }),
    );
    let base = spawn_server(router).await;

    let err = client_for(&base).analyze(&wav_clip()).await.unwrap_err();
    match err {
        SubmitError::Http { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("model unavailable"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_text() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "") }),
    );
    let base = spawn_server(router).await;

    let err = client_for(&base).analyze(&wav_clip()).await.unwrap_err();
    match err {
        SubmitError::Http { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    // Nothing listens on the discard port
    let client = client_for("http://127.0.0.1:9");

    let err = client.analyze(&wav_clip()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_clip_is_rejected_before_any_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_for_handler = Arc::clone(&hits);
    let router = Router::new().route(
        "/api/analyze",
        post(move || {
            let hits = Arc::clone(&hits_for_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(analysis_json())
            }
        }),
    );
    let base = spawn_server(router).await;

    let empty = AudioClip::from_samples("voice_empty", &[], 16000, 1).unwrap();
    let err = client_for(&base).analyze(&empty).await.unwrap_err();

    assert!(matches!(err, SubmitError::EmptyAudio));
    assert_eq!(hits.load(Ordering::SeqCst), 0, "no request must be sent");
}

#[tokio::test]
async fn unparseable_media_type_is_rejected_before_any_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_for_handler = Arc::clone(&hits);
    let router = Router::new().route(
        "/api/analyze",
        post(move || {
            let hits = Arc::clone(&hits_for_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(analysis_json())
            }
        }),
    );
    let base = spawn_server(router).await;

    let clip = AudioClip {
        filename: "voice.wav".to_string(),
        media_type: "not a mime type".to_string(),
        format: ".WAV".to_string(),
        duration_secs: 1.0,
        source: ClipSource::Upload,
        bytes: vec![1, 2, 3, 4],
    };
    let err = client_for(&base).analyze(&clip).await.unwrap_err();

    match err {
        SubmitError::InvalidMediaType(mt) => assert_eq!(mt, "not a mime type"),
        other => panic!("expected InvalidMediaType, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0, "no request must be sent");
}

#[tokio::test]
async fn cancellation_aborts_an_inflight_submission() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(analysis_json())
        }),
    );
    let base = spawn_server(router).await;

    let client = client_for(&base);
    let clip = wav_clip();
    let token = CancellationToken::new();

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let err = client.analyze_with_cancel(&clip, &token).await.unwrap_err();
    assert!(matches!(err, SubmitError::Cancelled));
}

#[tokio::test]
async fn upload_clip_preserves_declared_media_type() {
    // Non-WAV uploads pass through opaquely
    let clip = AudioClip {
        filename: "uploaded_audio.mp3".to_string(),
        media_type: "audio/mpeg".to_string(),
        format: ".MP3".to_string(),
        duration_secs: 0.0,
        source: ClipSource::Upload,
        bytes: vec![0xff, 0xfb, 0x90, 0x00],
    };
    assert!(!clip.is_empty());

    let router = Router::new().route("/api/analyze", post(|| async { Json(analysis_json()) }));
    let base = spawn_server(router).await;

    let response = client_for(&base).analyze(&clip).await.unwrap();
    assert!(!response.is_real);
}
