use crate::config::RelayConfig;
use crate::tts::{MurfUpstream, TtsUpstream, UpstreamResult};
use std::sync::Arc;

/// Shared relay state.
///
/// Read-only after startup: requests never mutate it.
#[derive(Clone)]
pub struct RelayState {
    pub upstream: Arc<dyn TtsUpstream>,
}

impl RelayState {
    pub fn new(upstream: Arc<dyn TtsUpstream>) -> Self {
        Self { upstream }
    }

    /// Build the state around the Murf provider described by `config`
    pub fn from_config(config: &RelayConfig) -> UpstreamResult<Self> {
        let upstream = MurfUpstream::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.upstream_timeout,
        )?;
        Ok(Self::new(Arc::new(upstream)))
    }
}
