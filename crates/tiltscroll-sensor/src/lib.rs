pub mod orientation;
pub mod recording;
pub mod types;

pub use orientation::{EstimateError, OrientationEstimator};
pub use types::{OrientationAngles, RawSample, ScreenRotation};

use anyhow::Result;
use glam::{Quat, Vec3};
use recording::RecordingParser;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

/// Samples buffered between the feed task and its consumer.
const CHANNEL_CAPACITY: usize = 256;

/// Parameters of the synthetic tilt sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepParams {
    /// Peak roll in degrees. Pitch peaks at half of this.
    pub amplitude_degrees: f32,
    /// Time for one full roll oscillation.
    pub period: Duration,
    /// Stop after this many samples (`None` runs until dropped).
    pub limit: Option<u64>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            amplitude_degrees: 40.0,
            period: Duration::from_secs(4),
            limit: None,
        }
    }
}

/// Source of rotation-vector samples for a layout.
///
/// Runs a background task that either replays a recording or synthesizes a
/// sweep, pacing delivery at the configured sample rate.
pub struct SensorFeed {
    sample_rx: mpsc::Receiver<RawSample>,
    _task: tokio::task::JoinHandle<()>,
}

impl SensorFeed {
    /// Replay a recording file (see [`recording`] for the line format).
    pub async fn open_recording(path: &Path, sample_rate_hz: u32) -> Result<Self> {
        tracing::info!(?path, sample_rate_hz, "Opening sensor recording");
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::from_reader(file, sample_rate_hz))
    }

    /// Replay samples read from any async byte stream.
    pub fn from_reader<R>(reader: R, sample_rate_hz: u32) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (sample_tx, sample_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(replay_loop(reader, sample_tx, sample_period(sample_rate_hz)));
        Self {
            sample_rx,
            _task: task,
        }
    }

    /// Synthetic feed for running without sensor hardware.
    pub fn sweep(sample_rate_hz: u32, params: SweepParams) -> Self {
        let (sample_tx, sample_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(sweep_loop(sample_tx, sample_rate_hz, params));
        Self {
            sample_rx,
            _task: task,
        }
    }

    /// Wait for the next sample. `None` once the feed is exhausted.
    pub async fn recv(&mut self) -> Option<RawSample> {
        self.sample_rx.recv().await
    }
}

fn sample_period(sample_rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / sample_rate_hz.max(1) as f64)
}

/// Synthesize the sweep sample at `index` for a feed running at `sample_rate_hz`.
pub fn sweep_sample(index: u64, sample_rate_hz: u32, params: &SweepParams) -> RawSample {
    let t = index as f64 / sample_rate_hz.max(1) as f64;
    let period = params.period.as_secs_f64().max(f64::EPSILON);
    let phase = std::f64::consts::TAU * t / period;

    let roll = (params.amplitude_degrees as f64 * phase.sin()) as f32;
    let pitch = (params.amplitude_degrees as f64 * 0.5 * (phase * 0.5).sin()) as f32;

    // Roll turns about the device Y axis; positive pitch is a negative X turn.
    let q = Quat::from_rotation_x(-pitch.to_radians()) * Quat::from_rotation_y(roll.to_radians());
    RawSample::new(Vec3::new(q.x, q.y, q.z), (t * 1e9) as u64).with_scalar(q.w)
}

/// Background task: read the stream, parse lines, publish samples at a fixed pace.
async fn replay_loop<R>(mut reader: R, sample_tx: mpsc::Sender<RawSample>, period: Duration)
where
    R: AsyncRead + Unpin,
{
    let mut parser = RecordingParser::new();
    let mut buf = [0u8; 4096];
    let mut interval = tokio::time::interval(period);
    let mut sample_count: u64 = 0;

    loop {
        let eof = match reader.read(&mut buf).await {
            Ok(0) => true,
            Ok(n) => {
                parser.push_data(&buf[..n]);
                false
            }
            Err(e) => {
                tracing::error!(?e, "Recording read error");
                break;
            }
        };

        // Drain all available samples.
        loop {
            let next = if eof {
                parser.finish()
            } else {
                parser.next_sample()
            };
            let Some(result) = next else { break };
            match result {
                Ok(sample) => {
                    interval.tick().await;
                    if sample_tx.send(sample).await.is_err() {
                        tracing::debug!("Sensor feed consumer dropped");
                        return;
                    }
                    sample_count += 1;
                    if sample_count % 1000 == 0 {
                        tracing::debug!(sample_count, "Recorded samples replayed");
                    }
                }
                Err(e) => {
                    tracing::warn!(%e, "Skipping malformed recording line");
                }
            }
        }

        if eof {
            tracing::info!(sample_count, "Recording finished");
            break;
        }
    }
}

async fn sweep_loop(sample_tx: mpsc::Sender<RawSample>, sample_rate_hz: u32, params: SweepParams) {
    let mut interval = tokio::time::interval(sample_period(sample_rate_hz));
    let mut index: u64 = 0;

    while params.limit.map_or(true, |limit| index < limit) {
        interval.tick().await;
        let sample = sweep_sample(index, sample_rate_hz, &params);
        if sample_tx.send(sample).await.is_err() {
            return;
        }
        index += 1;
    }
    tracing::info!(samples = index, "Sweep finished");
}
