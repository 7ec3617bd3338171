use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tiltscroll_config::{AppConfig, Direction};
use tiltscroll_layout::GravityLayout;
use tiltscroll_sensor::{ScreenRotation, SensorFeed, SweepParams};
use tracing::{debug, info, warn};

/// Headless host for a tilt-driven parallax layout.
///
/// Feeds rotation-vector samples into a `GravityLayout`, drives its animation
/// at the configured tick rate and logs the resulting offsets.
#[derive(Debug, Parser)]
#[command(name = "tiltscroll", version)]
struct Args {
    /// Replay a recorded capture (`timestamp_ns,x,y,z[,w]` per line)
    /// instead of the synthetic sweep.
    #[arg(long)]
    recording: Option<PathBuf>,
    /// Screen rotation in degrees (0, 90, 180, 270).
    #[arg(long, value_parser = parse_rotation)]
    rotation: Option<ScreenRotation>,
    /// Scroll animation duration in milliseconds.
    #[arg(long)]
    duration_ms: Option<u32>,
    /// Scroll against the tilt instead of with it.
    #[arg(long)]
    reverse: bool,
    /// Stop after this many samples.
    #[arg(long)]
    samples: Option<u64>,
    /// Write the effective config back to disk.
    #[arg(long)]
    save_config: bool,
}

fn parse_rotation(s: &str) -> Result<ScreenRotation, String> {
    s.parse::<u32>()
        .ok()
        .and_then(ScreenRotation::from_degrees)
        .ok_or_else(|| format!("expected 0, 90, 180 or 270, got {s:?}"))
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(rotation) = args.rotation {
        config.feed.screen_rotation = rotation;
    }
    if let Some(duration_ms) = args.duration_ms {
        config.layout.scroll_duration_ms = duration_ms;
    }
    if args.reverse {
        config.layout.direction = Direction::Reverse;
    }
}

fn tick_period(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64)
}

async fn open_feed(config: &AppConfig, args: &Args) -> SensorFeed {
    let rate = config.feed.sample_rate_hz;
    if let Some(path) = &args.recording {
        match SensorFeed::open_recording(path, rate).await {
            Ok(feed) => return feed,
            Err(e) => warn!(?e, "Recording not available, using synthetic sweep"),
        }
    }
    SensorFeed::sweep(
        rate,
        SweepParams {
            limit: args.samples,
            ..SweepParams::default()
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tiltscroll=info,tiltscroll_layout=info,tiltscroll_sensor=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    info!("tiltscroll starting");

    // Load config.
    let mut config = tiltscroll_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    apply_overrides(&mut config, &args);
    info!(?config.layout, ?config.feed, "Config loaded");

    if args.save_config {
        tiltscroll_config::save_config(&config)?;
    }

    let rotation = config.feed.screen_rotation;
    let mut feed = open_feed(&config, &args).await;

    let mut layout = GravityLayout::new(config.layout.clone(), true);
    layout.set_tilt_listener(|x_ratio, y_ratio| debug!(x_ratio, y_ratio, "Tilt"));
    layout.set_attached(true);
    info!(
        active = layout.is_active(),
        rotation_degrees = rotation.degrees(),
        "Layout attached"
    );

    let mut ticker = tokio::time::interval(tick_period(config.feed.tick_rate_hz));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut feed_done = false;
    let mut sample_count: u64 = 0;
    let mut event_count: u64 = 0;

    loop {
        tokio::select! {
            sample = feed.recv(), if !feed_done => {
                match sample {
                    Some(sample) => {
                        if let Some(event) = layout.on_sample(&sample, rotation, Instant::now()) {
                            event_count += 1;
                            debug!(target_x = event.target.x, target_y = event.target.y, "New scroll target");
                        }
                        sample_count += 1;
                        if args.samples.is_some_and(|limit| sample_count >= limit) {
                            feed_done = true;
                        }
                    }
                    None => feed_done = true,
                }
            }
            _ = ticker.tick() => {
                match layout.tick(Instant::now()) {
                    Some(offset) => info!(x = offset.x, y = offset.y, "Offset applied"),
                    // Let the last trajectory settle before exiting.
                    None if feed_done => break,
                    None => {}
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }

    layout.set_attached(false);
    info!(
        sample_count,
        event_count,
        dropped = layout.dropped_samples(),
        final_x = layout.offset().x,
        final_y = layout.offset().y,
        "tiltscroll finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_argument_accepts_right_angles() {
        assert_eq!(parse_rotation("90"), Ok(ScreenRotation::Rot90));
        assert_eq!(parse_rotation("270"), Ok(ScreenRotation::Rot270));
        assert!(parse_rotation("45").is_err());
        assert!(parse_rotation("up").is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from(["tiltscroll", "--rotation", "180", "--duration-ms", "250", "--reverse"]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.feed.screen_rotation, ScreenRotation::Rot180);
        assert_eq!(config.layout.scroll_duration_ms, 250);
        assert_eq!(config.layout.direction, Direction::Reverse);
        assert_eq!(config.layout.max_horizontal_offset_px, 150);
    }
}
