use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::{ClientError, Synthesizer};
use crate::battle::Notice;
use crate::types::Voice;

/// PCM audio ready for playback. Samples are interleaved and scaled to -1..1.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl DecodedClip {
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }
}

/// Decode a complete WAV file
pub fn decode_wav(data: &[u8]) -> Result<DecodedClip, ClientError> {
    let reader =
        hound::WavReader::new(Cursor::new(data)).map_err(|e| ClientError::Decode(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, hound::Error>>()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, hound::Error>>(),
    }
    .map_err(|e| ClientError::Decode(e.to_string()))?;

    if samples.is_empty() {
        return Err(ClientError::EmptyAudio);
    }

    Ok(DecodedClip {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

pub type NodeId = u64;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct GraphError(pub String);

/// Minimal audio node graph: a buffer source feeding a gain feeding the output
pub trait AudioGraph: Send {
    fn create_source(&mut self, clip: &DecodedClip) -> Result<NodeId, GraphError>;

    fn create_gain(&mut self, gain: f32) -> Result<NodeId, GraphError>;

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError>;

    fn connect_to_output(&mut self, node: NodeId) -> Result<(), GraphError>;

    fn start(&mut self, source: NodeId) -> Result<(), GraphError>;

    fn stop(&mut self, source: NodeId) -> Result<(), GraphError>;

    fn disconnect(&mut self, node: NodeId) -> Result<(), GraphError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Already processing, please wait")]
    Busy,

    #[error("Please enter text to convert")]
    EmptyText,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Audio playback failed: {0}")]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, Copy)]
struct Chain {
    source: NodeId,
    gain: NodeId,
}

struct GraphState<G> {
    graph: G,
    active: Option<Chain>,
}

impl<G: AudioGraph> GraphState<G> {
    /// Stop and disconnect the current chain, if any. Errors from nodes that
    /// already stopped on their own are logged and ignored.
    fn teardown(&mut self) {
        let Some(chain) = self.active.take() else {
            return;
        };
        if let Err(e) = self.graph.stop(chain.source) {
            tracing::warn!(error = %e, "Error stopping source");
        }
        if let Err(e) = self.graph.disconnect(chain.source) {
            tracing::warn!(error = %e, "Error disconnecting source");
        }
        if let Err(e) = self.graph.disconnect(chain.gain) {
            tracing::warn!(error = %e, "Error disconnecting gain node");
        }
    }
}

/// Clears the processing flag when dropped
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Plays one clip at a time through an [`AudioGraph`]
pub struct Player<G> {
    state: Mutex<GraphState<G>>,
    processing: AtomicBool,
}

impl<G: AudioGraph> Player<G> {
    pub fn new(graph: G) -> Self {
        Self {
            state: Mutex::new(GraphState {
                graph,
                active: None,
            }),
            processing: AtomicBool::new(false),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub async fn is_playing(&self) -> bool {
        self.state.lock().await.active.is_some()
    }

    /// Run `f` against the underlying graph
    pub async fn with_graph<R>(&self, f: impl FnOnce(&G) -> R) -> R {
        f(&self.state.lock().await.graph)
    }

    /// Replace whatever is playing with `clip`. Returns the clip length.
    pub async fn start(&self, clip: &DecodedClip) -> Result<Duration, PlaybackError> {
        let mut state = self.state.lock().await;
        state.teardown();

        let source = state.graph.create_source(clip)?;
        let gain = match state.graph.create_gain(1.0) {
            Ok(gain) => gain,
            Err(e) => {
                if let Err(e) = state.graph.disconnect(source) {
                    tracing::warn!(error = %e, "Error disconnecting source");
                }
                return Err(e.into());
            }
        };
        state.active = Some(Chain { source, gain });

        let wired = state
            .graph
            .connect(source, gain)
            .and_then(|_| state.graph.connect_to_output(gain))
            .and_then(|_| state.graph.start(source));
        if let Err(e) = wired {
            state.teardown();
            return Err(e.into());
        }

        tracing::debug!(
            sample_rate = clip.sample_rate,
            channels = clip.channels,
            frames = clip.frames(),
            "Playback started"
        );
        Ok(clip.duration())
    }

    /// Stop playback. Safe to call at any time.
    pub async fn stop(&self) {
        self.state.lock().await.teardown();
    }

    /// Convert `text`, play the result to the end and tear it down.
    ///
    /// Only one conversion runs at a time; overlapping calls get
    /// [`PlaybackError::Busy`] instead of queueing.
    pub async fn convert_and_play<S: Synthesizer + ?Sized>(
        &self,
        synth: &S,
        text: &str,
        voice: Voice,
    ) -> Result<Notice, PlaybackError> {
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            tracing::debug!("Already processing, ignoring request");
            return Err(PlaybackError::Busy);
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(PlaybackError::EmptyText);
        }

        self.stop().await;
        let audio = synth.synthesize(text, voice).await?;
        let clip = decode_wav(&audio)?;
        let duration = self.start(&clip).await?;

        tokio::time::sleep(duration).await;
        self.stop().await;

        Ok(Notice::success("Audio played successfully"))
    }
}
