mod murf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::time::Duration;

use crate::types::Voice;

pub use murf::{MurfUpstream, DEFAULT_MURF_API_URL};

/// Result type for upstream TTS operations
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Audio bytes as they arrive from the provider, chunk boundaries intact
pub type AudioStream = BoxStream<'static, UpstreamResult<Bytes>>;

/// Errors that can occur while talking to the TTS provider
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("TTS provider credential is not configured")]
    MissingCredential,

    #[error("TTS request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("TTS provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Audio stream interrupted: {0}")]
    Stream(String),
}

impl UpstreamError {
    /// Status code reported by the provider, if it got that far
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single synthesis request, already validated
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Trimmed, non-empty text
    pub text: String,
    pub voice: Voice,
}

/// Trait that all TTS providers must implement
#[async_trait]
pub trait TtsUpstream: Send + Sync {
    /// Issue one upstream request and hand back the streamed audio
    async fn synthesize(&self, request: SpeechRequest) -> UpstreamResult<AudioStream>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}
