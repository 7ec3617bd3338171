use crate::gate::{GateTransition, SensorLifecycleGate};
use crate::mapper::{MapperConfig, TiltMapper};
use crate::smoother::MotionSmoother;
use glam::{IVec2, Vec2};
use std::fmt;
use std::time::{Duration, Instant};
use tiltscroll_config::LayoutConfig;
use tiltscroll_sensor::{OrientationAngles, OrientationEstimator, RawSample, ScreenRotation};

/// Emitted once per accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltEvent {
    /// Normalized tilt in [-1, 1]: x from roll, y from pitch.
    pub ratio: Vec2,
    /// Offset the content is now scrolling toward.
    pub target: IVec2,
}

type TiltListener = Box<dyn FnMut(f32, f32)>;

/// Parallax scroll container driven by device tilt.
///
/// The host forwards lifecycle signals, sensor samples and animation ticks;
/// the layout answers with tilt events and the content offset to apply.
/// Everything runs on the caller's thread.
pub struct GravityLayout {
    config: LayoutConfig,
    gate: SensorLifecycleGate,
    estimator: OrientationEstimator,
    mapper: TiltMapper,
    smoother: MotionSmoother,
    offset: IVec2,
    listener: Option<TiltListener>,
    dropped_samples: u64,
}

impl GravityLayout {
    pub fn new(config: LayoutConfig, sensor_available: bool) -> Self {
        Self {
            config,
            gate: SensorLifecycleGate::new(sensor_available),
            estimator: OrientationEstimator::new(),
            mapper: TiltMapper::new(),
            smoother: MotionSmoother::new(),
            offset: IVec2::ZERO,
            listener: None,
            dropped_samples: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Changes apply from the next sample on.
    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Register the tilt callback, receiving `(x_ratio, y_ratio)`.
    pub fn set_tilt_listener(&mut self, listener: impl FnMut(f32, f32) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_tilt_listener(&mut self) {
        self.listener = None;
    }

    pub fn set_attached(&mut self, attached: bool) -> GateTransition {
        self.gate.set_attached(attached)
    }

    pub fn set_window_visible(&mut self, visible: bool) -> GateTransition {
        self.gate.set_window_visible(visible)
    }

    pub fn set_visible(&mut self, visible: bool) -> GateTransition {
        self.gate.set_visible(visible)
    }

    pub fn on_visibility_aggregated(&mut self, visible: bool) -> GateTransition {
        self.gate.on_visibility_aggregated(visible)
    }

    /// Whether samples are currently being accepted.
    pub fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    /// Content offset last applied by [`tick`](Self::tick).
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        !self.smoother.is_settled()
    }

    /// Samples dropped because they could not be turned into angles.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    /// Feed one sensor sample. Returns the tilt event if the sample moved the target.
    ///
    /// Samples arriving while inactive, and malformed samples, are dropped.
    pub fn on_sample(
        &mut self,
        sample: &RawSample,
        rotation: ScreenRotation,
        now: Instant,
    ) -> Option<TiltEvent> {
        if !self.gate.is_active() {
            return None;
        }
        match self.estimator.estimate(sample, rotation) {
            Ok(angles) => self.apply_angles(angles, now),
            Err(e) => {
                self.dropped_samples += 1;
                tracing::trace!(%e, timestamp_ns = sample.timestamp_ns, "Dropping sensor sample");
                None
            }
        }
    }

    /// Feed already-estimated angles, bypassing the sensor gate.
    pub fn on_angles(&mut self, angles: OrientationAngles, now: Instant) -> Option<TiltEvent> {
        self.apply_angles(angles, now)
    }

    /// Advance the scroll animation. Returns the offset to apply, if it moved.
    pub fn tick(&mut self, now: Instant) -> Option<IVec2> {
        let offset = self.smoother.tick(now)?;
        self.offset = offset;
        Some(offset)
    }

    fn apply_angles(&mut self, angles: OrientationAngles, now: Instant) -> Option<TiltEvent> {
        let mapping = self.mapper.map(angles, &MapperConfig::from(&self.config))?;

        let duration = Duration::from_millis(self.config.scroll_duration_ms.into());
        // Start from the current animated position so a retarget never jumps.
        if self.smoother.retarget(self.offset, mapping.target, duration, now) {
            tracing::debug!(
                from_x = self.offset.x,
                from_y = self.offset.y,
                to_x = mapping.target.x,
                to_y = mapping.target.y,
                "Scroll retargeted"
            );
        }

        if let Some(listener) = self.listener.as_mut() {
            listener(mapping.ratio.x, mapping.ratio.y);
        }
        Some(TiltEvent {
            ratio: mapping.ratio,
            target: mapping.target,
        })
    }
}

impl fmt::Debug for GravityLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GravityLayout")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("offset", &self.offset)
            .field("target", &self.mapper.last_target())
            .field("animating", &self.is_animating())
            .finish_non_exhaustive()
    }
}
