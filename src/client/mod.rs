//! Talking to the relay from the battle page, and playing what comes back.

mod playback;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::protocol::{ConvertBody, ErrorBody};
use crate::types::Voice;

pub use playback::{
    decode_wav, AudioGraph, DecodedClip, GraphError, NodeId, PlaybackError, Player,
};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Could not reach relay: {0}")]
    Request(String),

    /// The relay answered with a non-2xx status
    #[error("{message}")]
    Relay { status: u16, message: String },

    #[error("Audio stream ended early: {0}")]
    Truncated(String),

    #[error("Received empty audio")]
    EmptyAudio,

    #[error("Could not decode audio: {0}")]
    Decode(String),
}

/// Anything that can turn a verse into WAV bytes
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: Voice) -> ClientResult<Bytes>;
}

/// HTTP client for the relay's `/api/convert`
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://localhost:3000`
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert `text` with `voice` and collect the whole audio body
    pub async fn convert(&self, text: &str, voice: Voice) -> ClientResult<Bytes> {
        let body = ConvertBody {
            text: Some(text.trim().to_string()),
            voice_id: Some(voice.id().to_string()),
        };
        let url = format!("{}/api/convert", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) if !body.error.is_empty() => body.error,
                _ => "Conversion failed".to_string(),
            };
            tracing::warn!(status = status.as_u16(), %message, "Relay rejected conversion");
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ClientError::Truncated(e.to_string()))?;
        if audio.is_empty() {
            return Err(ClientError::EmptyAudio);
        }

        tracing::debug!(bytes = audio.len(), voice = voice.id(), "Audio received");
        Ok(audio)
    }
}

#[async_trait]
impl Synthesizer for RelayClient {
    async fn synthesize(&self, text: &str, voice: Voice) -> ClientResult<Bytes> {
        self.convert(text, voice).await
    }
}
