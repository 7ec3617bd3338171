use glam::IVec2;
use std::time::{Duration, Instant};

/// Ease-out curve: fast start, decelerating into the target.
fn ease_out(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy)]
struct Trajectory {
    start: IVec2,
    target: IVec2,
    start_time: Instant,
    duration: Duration,
}

impl Trajectory {
    /// Position at `now`, and whether the trajectory has reached its target.
    fn sample(&self, now: Instant) -> (IVec2, bool) {
        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            return (self.target, true);
        }
        let progress = ease_out(elapsed.as_secs_f32() / self.duration.as_secs_f32());
        // Truncation rounds toward the start, so the target is only reached
        // once the full duration has elapsed.
        let delta = ((self.target - self.start).as_vec2() * progress).as_ivec2();
        (self.start + delta, false)
    }
}

/// Animates the content offset toward the latest target.
///
/// Holds at most one trajectory. A new target replaces the in-flight one and
/// starts from wherever the animation currently is.
#[derive(Debug, Default)]
pub struct MotionSmoother {
    trajectory: Option<Trajectory>,
    position: IVec2,
}

impl MotionSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a trajectory from `current` to `target` over `duration`.
    ///
    /// Any running trajectory is dropped. Returns `false` when the two points
    /// are equal: the content is already there, so nothing is animated.
    pub fn retarget(&mut self, current: IVec2, target: IVec2, duration: Duration, now: Instant) -> bool {
        self.position = current;
        if target == current {
            self.trajectory = None;
            return false;
        }
        self.trajectory = Some(Trajectory {
            start: current,
            target,
            start_time: now,
            duration,
        });
        true
    }

    /// Advance to `now`. Returns the new position, or `None` once settled.
    ///
    /// The call that reaches the target returns it exactly and settles the
    /// smoother; a `now` earlier than the trajectory start yields the start.
    pub fn tick(&mut self, now: Instant) -> Option<IVec2> {
        let trajectory = self.trajectory?;
        let (position, finished) = trajectory.sample(now);
        self.position = position;
        if finished {
            self.trajectory = None;
        }
        Some(position)
    }

    /// Last computed position.
    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn is_settled(&self) -> bool {
        self.trajectory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn zero_duration_jumps_on_first_tick() {
        let t0 = Instant::now();
        let mut smoother = MotionSmoother::new();
        assert!(smoother.retarget(IVec2::ZERO, IVec2::new(-75, 20), Duration::ZERO, t0));

        assert_eq!(smoother.tick(t0), Some(IVec2::new(-75, 20)));
        assert!(smoother.is_settled());
        assert_eq!(smoother.tick(t0 + ms(16)), None);
    }

    #[test]
    fn eased_trajectory_reaches_target_at_duration() {
        let t0 = Instant::now();
        let start = IVec2::new(10, -10);
        let target = IVec2::new(-75, 40);
        let mut smoother = MotionSmoother::new();
        smoother.retarget(start, target, ms(300), t0);

        let at_0 = smoother.tick(t0).unwrap();
        let at_150 = smoother.tick(t0 + ms(150)).unwrap();
        let at_300 = smoother.tick(t0 + ms(300)).unwrap();

        assert_eq!(at_0, start);
        assert_ne!(at_150, target);
        assert_eq!(at_300, target);

        // Progress never goes backwards on either axis.
        assert!(at_0.x >= at_150.x && at_150.x >= at_300.x);
        assert!(at_0.y <= at_150.y && at_150.y <= at_300.y);

        // Ease-out covers more than half the distance in half the time.
        assert!((at_150.x - start.x).abs() * 2 > (target.x - start.x).abs());

        assert_eq!(smoother.tick(t0 + ms(316)), None);
    }

    #[test]
    fn never_reaches_target_early_or_overshoots() {
        let t0 = Instant::now();
        let target = IVec2::new(150, -130);
        let mut smoother = MotionSmoother::new();
        smoother.retarget(IVec2::ZERO, target, ms(300), t0);

        let mut previous = IVec2::ZERO;
        for step in 0..300 {
            let p = smoother.tick(t0 + ms(step)).unwrap();
            assert_ne!(p, target, "reached target at {step}ms");
            assert!(p.x >= previous.x && p.x <= target.x);
            assert!(p.y <= previous.y && p.y >= target.y);
            previous = p;
        }
        assert_eq!(smoother.tick(t0 + ms(300)), Some(target));
    }

    #[test]
    fn tick_before_start_is_clamped() {
        let t0 = Instant::now();
        let mut smoother = MotionSmoother::new();
        smoother.retarget(IVec2::new(5, 5), IVec2::new(50, 5), ms(200), t0 + ms(100));
        assert_eq!(smoother.tick(t0), Some(IVec2::new(5, 5)));
        assert!(!smoother.is_settled());
    }

    #[test]
    fn retarget_starts_from_interpolated_position() {
        let t0 = Instant::now();
        let mut smoother = MotionSmoother::new();
        smoother.retarget(IVec2::ZERO, IVec2::new(100, 0), ms(300), t0);
        let mid = smoother.tick(t0 + ms(100)).unwrap();
        assert!(mid.x > 0 && mid.x < 100);

        let t1 = t0 + ms(100);
        smoother.retarget(smoother.position(), IVec2::new(-100, 0), ms(300), t1);
        assert_eq!(smoother.tick(t1), Some(mid));
        assert_eq!(smoother.tick(t1 + ms(300)), Some(IVec2::new(-100, 0)));
    }

    #[test]
    fn target_at_current_position_stops_running_trajectory() {
        let t0 = Instant::now();
        let mut smoother = MotionSmoother::new();
        smoother.retarget(IVec2::ZERO, IVec2::new(-150, 0), ms(300), t0);
        let mid = smoother.tick(t0 + ms(60)).unwrap();

        assert!(!smoother.retarget(mid, mid, ms(300), t0 + ms(60)));
        assert!(smoother.is_settled());
        assert_eq!(smoother.tick(t0 + ms(400)), None);
        assert_eq!(smoother.position(), mid);
    }

    #[test]
    fn unchanged_target_is_ignored() {
        let t0 = Instant::now();
        let mut smoother = MotionSmoother::new();
        assert!(!smoother.retarget(IVec2::new(3, 4), IVec2::new(3, 4), ms(300), t0));
        assert!(smoother.is_settled());
        assert_eq!(smoother.tick(t0 + ms(10)), None);
    }
}
