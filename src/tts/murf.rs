use super::*;
use futures::{StreamExt, TryStreamExt};
use serde::Serialize;
use std::time::Instant;

/// Streaming endpoint of the Murf speech API
pub const DEFAULT_MURF_API_URL: &str = "https://api.murf.ai/v1/speech/stream";

/// Longest provider error body echoed back to callers
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Murf provider implementation
pub struct MurfUpstream {
    api_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    /// Bound on connecting and receiving response headers, not on the body
    timeout: Duration,
}

impl MurfUpstream {
    /// Create a new Murf provider.
    ///
    /// A missing key is accepted here; every request then fails with
    /// [`UpstreamError::MissingCredential`].
    pub fn new(api_url: String, api_key: Option<String>, timeout: Duration) -> UpstreamResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(Self {
            api_url,
            api_key,
            client,
            timeout,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MurfSpeechRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
}

#[async_trait]
impl TtsUpstream for MurfUpstream {
    async fn synthesize(&self, request: SpeechRequest) -> UpstreamResult<AudioStream> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential)?;

        let start = Instant::now();
        let body = MurfSpeechRequest {
            text: &request.text,
            voice_id: request.voice.id(),
        };

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(&self.api_url)
                .header("api-key", api_key)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| UpstreamError::Timeout(self.timeout))?
        .map_err(|e| UpstreamError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The error body gets the same bound as the headers
            let text = tokio::time::timeout(self.timeout, response.text())
                .await
                .ok()
                .and_then(Result::ok)
                .unwrap_or_default();
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string()
            } else {
                text.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            voice = request.voice.id(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Murf stream opened"
        );

        Ok(response
            .bytes_stream()
            .map_err(|e| UpstreamError::Stream(e.without_url().to_string()))
            .boxed())
    }

    fn name(&self) -> &str {
        "murf"
    }
}
