//! HTTP API endpoints of the TTS relay.
//!
//! The relay validates a conversion request, forwards it to the upstream
//! provider and streams the audio back without buffering it.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use std::sync::Arc;

use crate::battle::catalog;
use crate::protocol::*;
use crate::state::RelayState;
use crate::tts::{SpeechRequest, UpstreamError};
use crate::types::*;

/// Errors surfaced to relay callers
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Text is required")]
    InvalidText,

    #[error("Invalid voice ID")]
    InvalidVoice,

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Audio streaming failed")]
    StreamInterrupted,
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidText => "invalid_text",
            RelayError::InvalidVoice => "invalid_voice",
            RelayError::Upstream(_) => "upstream_unavailable",
            RelayError::StreamInterrupted => "stream_interrupted",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidText | RelayError::InvalidVoice => StatusCode::BAD_REQUEST,
            RelayError::Upstream(e) => e
                .upstream_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            RelayError::StreamInterrupted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Check a conversion body against the relay's input rules
pub fn validate_convert(body: ConvertBody) -> Result<SpeechRequest, RelayError> {
    let text = body
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RelayError::InvalidText)?;

    let voice: Voice = body
        .voice_id
        .as_deref()
        .ok_or(RelayError::InvalidVoice)?
        .parse()
        .map_err(|_| RelayError::InvalidVoice)?;

    Ok(SpeechRequest {
        text: text.to_string(),
        voice,
    })
}

/// Build the relay router.
///
/// CORS, tracing and static files are layered on by the binary.
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/voices", get(list_voices))
        .route("/api/categories", get(list_categories))
        .route("/api/convert", post(convert))
        .with_state(state)
}

/// Liveness check.
///
/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// List the allow-listed voices.
///
/// GET /api/voices
pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: Voice::ALL.into_iter().map(VoiceInfo::from).collect(),
        default_left: Side::Left.default_voice().id().to_string(),
        default_right: Side::Right.default_voice().id().to_string(),
    })
}

/// List battle categories with their rapper pairs and suggestion pools.
///
/// GET /api/categories
pub async fn list_categories() -> Json<CategoriesResponse> {
    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            category,
            pair: catalog::rapper_pair(category),
            suggestions: catalog::suggestion_pool(category),
        })
        .collect();

    Json(CategoriesResponse { categories })
}

/// Bodies sent without a JSON content type are treated as empty
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Convert text to speech and stream the audio back.
///
/// POST /api/convert
///
/// The first non-empty upstream chunk is awaited before the response is
/// committed, so a stream that dies immediately still yields a 500. Once
/// bytes are flowing, an upstream error can only cut the body short.
pub async fn convert(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<Response, RelayError> {
    let body = if is_json(&headers) {
        ConvertBody::parse_lenient(&raw)
    } else {
        ConvertBody::default()
    };
    let request = validate_convert(body)?;
    let request_id = ulid::Ulid::new();

    tracing::info!(
        %request_id,
        voice = request.voice.id(),
        chars = request.text.chars().count(),
        provider = state.upstream.name(),
        "Converting text to speech"
    );

    let mut stream = state.upstream.synthesize(request).await.map_err(|e| {
        tracing::error!(%request_id, error = %e, "Upstream conversion failed");
        RelayError::Upstream(e)
    })?;

    let first = loop {
        match stream.next().await {
            Some(Ok(chunk)) if chunk.is_empty() => continue,
            Some(Ok(chunk)) => break Some(chunk),
            Some(Err(e)) => {
                tracing::error!(%request_id, error = %e, "Audio stream failed before first byte");
                return Err(RelayError::StreamInterrupted);
            }
            None => break None,
        }
    };

    if first.is_none() {
        tracing::warn!(%request_id, "Upstream returned an empty audio stream");
    }

    let relayed = futures::stream::iter(first.map(Ok))
        .chain(stream)
        .map(move |chunk| {
            if let Err(ref e) = chunk {
                tracing::warn!(%request_id, error = %e, "Audio stream interrupted mid-transfer");
            }
            chunk
        });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(Body::from_stream(relayed))
        .map_err(|e| {
            tracing::error!(%request_id, error = %e, "Failed to build audio response");
            RelayError::StreamInterrupted
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::{AudioStream, TtsUpstream, UpstreamResult};
    use async_trait::async_trait;
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    /// Upstream that replays scripted chunks and counts invocations
    struct StubUpstream {
        calls: AtomicUsize,
        seen: Mutex<Vec<SpeechRequest>>,
        script: Vec<Result<&'static str, &'static str>>,
        fail_with: Option<u16>,
    }

    impl StubUpstream {
        fn streaming(script: Vec<Result<&'static str, &'static str>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                script,
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::streaming(vec![])
            }
        }
    }

    #[async_trait]
    impl TtsUpstream for StubUpstream {
        async fn synthesize(&self, request: SpeechRequest) -> UpstreamResult<AudioStream> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request);
            if let Some(status) = self.fail_with {
                return Err(UpstreamError::Status {
                    status,
                    message: "provider said no".to_string(),
                });
            }
            let items: Vec<UpstreamResult<Bytes>> = self
                .script
                .iter()
                .map(|item| match item {
                    Ok(chunk) => Ok(Bytes::from_static(chunk.as_bytes())),
                    Err(msg) => Err(UpstreamError::Stream(msg.to_string())),
                })
                .collect();
            Ok(futures::stream::iter(items).boxed())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn app(upstream: Arc<dyn TtsUpstream>) -> Router {
        router(Arc::new(RelayState::new(upstream)))
    }

    fn convert_request(json: serde_json::Value) -> Request<Body> {
        raw_convert_request(Some("application/json"), json.to_string())
    }

    fn raw_convert_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/api/convert");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(body.into()).unwrap()
    }

    async fn error_body(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let upstream = Arc::new(StubUpstream::streaming(vec![]));
        let response = app(upstream)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.message, "Server is running");
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_upstream_call() {
        let upstream = Arc::new(StubUpstream::streaming(vec![Ok("RIFF")]));

        for text in ["", "   \n\t "] {
            let response = app(upstream.clone())
                .oneshot(convert_request(
                    serde_json::json!({"text": text, "voiceId": "en-IN-rohan"}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = error_body(response).await;
            assert_eq!(body.kind, "invalid_text");
            assert_eq!(body.error, "Text is required");
        }

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_voice_rejected_without_upstream_call() {
        let upstream = Arc::new(StubUpstream::streaming(vec![Ok("RIFF")]));

        for body in [
            serde_json::json!({"text": "bars", "voiceId": "en-US-bogus"}),
            serde_json::json!({"text": "bars"}),
        ] {
            let response = app(upstream.clone())
                .oneshot(convert_request(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(error_body(response).await.kind, "invalid_voice");
        }

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_badly_typed_bodies_get_json_400() {
        let upstream = Arc::new(StubUpstream::streaming(vec![Ok("RIFF")]));

        let cases = [
            (
                Some("application/json"),
                r#"{"text":"bars","voiceId":42}"#,
                "invalid_voice",
            ),
            (
                Some("application/json"),
                r#"{"text":123,"voiceId":"en-IN-rohan"}"#,
                "invalid_text",
            ),
            (Some("application/json"), r#"{"text":"bars","voi"#, "invalid_text"),
            (Some("application/json"), "", "invalid_text"),
            (None, r#"{"text":"bars","voiceId":"en-IN-rohan"}"#, "invalid_text"),
            (
                Some("text/plain"),
                r#"{"text":"bars","voiceId":"en-IN-rohan"}"#,
                "invalid_text",
            ),
        ];

        for (content_type, body, kind) in cases {
            let response = app(upstream.clone())
                .oneshot(raw_convert_request(content_type, body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            assert_eq!(error_body(response).await.kind, kind, "{body}");
        }

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_json_content_type_with_charset() {
        let upstream = Arc::new(StubUpstream::streaming(vec![Ok("RIFF")]));

        let response = app(upstream.clone())
            .oneshot(raw_convert_request(
                Some("application/json; charset=utf-8"),
                r#"{"text":"bars","voiceId":"en-IN-rohan"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    /// Sends one chunk, then holds the stream open until released
    struct HeldUpstream {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl TtsUpstream for HeldUpstream {
        async fn synthesize(&self, _request: SpeechRequest) -> UpstreamResult<AudioStream> {
            let release = self.release.clone();
            let head = futures::stream::once(async { Ok::<_, UpstreamError>(Bytes::from_static(b"RIFF")) });
            let tail = futures::stream::once(async move {
                release.notified().await;
                Ok::<_, UpstreamError>(Bytes::from_static(b"WAVE"))
            });
            Ok(head.chain(tail).boxed())
        }

        fn name(&self) -> &str {
            "held"
        }
    }

    #[tokio::test]
    async fn test_convert_relays_chunks_before_upstream_finishes() {
        let release = Arc::new(Notify::new());
        let upstream = Arc::new(HeldUpstream {
            release: release.clone(),
        });

        let response = tokio::time::timeout(
            Duration::from_secs(2),
            app(upstream).oneshot(convert_request(
                serde_json::json!({"text": "bars", "voiceId": "en-IN-rohan"}),
            )),
        )
        .await
        .expect("response should not wait for the whole upstream body")
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut body = response.into_body().into_data_stream();
        let first = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("first chunk should arrive while upstream is still open")
            .unwrap()
            .unwrap();
        assert_eq!(&first[..], b"RIFF");

        release.notify_one();
        let second = body.next().await.unwrap().unwrap();
        assert_eq!(&second[..], b"WAVE");
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_convert_streams_upstream_bytes() {
        let upstream = Arc::new(StubUpstream::streaming(vec![
            Ok("RIFF"),
            Ok(""),
            Ok("\x24\x00\x00\x00WAVE"),
            Ok("fmt "),
        ]));

        let response = app(upstream.clone())
            .oneshot(convert_request(
                serde_json::json!({"text": "  spit fire  ", "voiceId": "en-US-natalie"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/wav"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"RIFF\x24\x00\x00\x00WAVEfmt ");

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
        let seen = upstream.seen.lock().unwrap();
        assert_eq!(seen[0].text, "spit fire");
        assert_eq!(seen[0].voice, Voice::EnUsNatalie);
    }

    #[tokio::test]
    async fn test_stream_error_before_first_byte_is_500() {
        let upstream = Arc::new(StubUpstream::streaming(vec![Ok(""), Err("reset")]));

        let response = app(upstream)
            .oneshot(convert_request(
                serde_json::json!({"text": "bars", "voiceId": "en-IN-aarav"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(body.kind, "stream_interrupted");
        assert_eq!(body.error, "Audio streaming failed");
    }

    #[tokio::test]
    async fn test_stream_error_after_bytes_truncates_body() {
        let upstream = Arc::new(StubUpstream::streaming(vec![
            Ok("RIFF"),
            Err("reset"),
            Ok("never sent"),
        ]));

        let response = app(upstream)
            .oneshot(convert_request(
                serde_json::json!({"text": "bars", "voiceId": "en-IN-aarav"}),
            ))
            .await
            .unwrap();

        // Status was committed with the first chunk
        assert_eq!(response.status(), StatusCode::OK);
        let result = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_upstream_status_is_surfaced() {
        let upstream = Arc::new(StubUpstream::failing(401));

        let response = app(upstream)
            .oneshot(convert_request(
                serde_json::json!({"text": "bars", "voiceId": "en-IN-rohan"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = error_body(response).await;
        assert_eq!(body.kind, "upstream_unavailable");
        assert!(body.error.contains("401"));
    }

    #[test]
    fn test_upstream_errors_without_status_map_to_500() {
        let err = RelayError::Upstream(UpstreamError::MissingCredential);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = RelayError::Upstream(UpstreamError::Status {
            status: 302,
            message: "moved".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_voices() {
        let Json(voices) = list_voices().await;
        let ids: Vec<_> = voices.voices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["en-US-natalie", "en-IN-rohan", "en-IN-aarav"]);
        assert_eq!(voices.default_left, "en-IN-rohan");
        assert_eq!(voices.default_right, "en-IN-aarav");
    }

    #[tokio::test]
    async fn test_list_categories() {
        let Json(response) = list_categories().await;
        assert_eq!(response.categories.len(), 4);
        let roast = &response.categories[0];
        assert_eq!(roast.category, Category::Roast);
        assert_eq!(roast.pair.left.name, "Raftaar");
        assert_eq!(roast.suggestions.english.len(), 2);
    }
}
