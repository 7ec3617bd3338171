use glam::{IVec2, Vec2};
use tiltscroll_config::{Direction, LayoutConfig};
use tiltscroll_sensor::OrientationAngles;

/// Threshold substituted for a zero (or non-finite) configured threshold.
const FALLBACK_THRESHOLD: f32 = 1.0;

/// Parameters of the tilt-to-offset mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapperConfig {
    /// Tilt angle (degrees) at which the offset saturates.
    pub threshold_degrees: f32,
    /// Offset at full tilt, in pixels (x = horizontal, y = vertical).
    pub max_offset: IVec2,
    pub direction: Direction,
}

impl MapperConfig {
    /// Threshold actually divided by. Zero degrades to 1 instead of failing.
    pub fn effective_threshold(&self) -> f32 {
        let t = self.threshold_degrees;
        if t == 0.0 || !t.is_finite() {
            FALLBACK_THRESHOLD
        } else {
            t.abs()
        }
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for MapperConfig {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            threshold_degrees: config.threshold_degrees,
            max_offset: IVec2::new(
                config.max_horizontal_offset_px,
                config.max_vertical_offset_px,
            ),
            direction: config.direction,
        }
    }
}

/// Result of mapping one accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltMapping {
    /// Normalized tilt in [-1, 1]: x from roll, y from pitch.
    pub ratio: Vec2,
    /// Content offset to scroll toward.
    pub target: IVec2,
}

/// Map angles to a tilt ratio and pixel target.
///
/// Returns `None` when the rounded target equals `previous_target`, which
/// filters sensor jitter below one pixel of output.
pub fn map_tilt(
    angles: OrientationAngles,
    config: &MapperConfig,
    previous_target: IVec2,
) -> Option<TiltMapping> {
    let threshold = config.effective_threshold();
    let ratio = Vec2::new(
        angles.roll.clamp(-threshold, threshold) / threshold,
        angles.pitch.clamp(-threshold, threshold) / threshold,
    );

    // Positive content offset moves content left/up, hence the extra negation.
    let base_factor = config.direction.factor() * -1.0;
    let target = (ratio * config.max_offset.as_vec2() * base_factor)
        .round()
        .as_ivec2();

    (target != previous_target).then_some(TiltMapping { ratio, target })
}

/// [`map_tilt`] plus the last emitted target.
#[derive(Debug, Default, Clone)]
pub struct TiltMapper {
    last_target: IVec2,
}

impl TiltMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_target(&self) -> IVec2 {
        self.last_target
    }

    /// Map `angles`, remembering the target when it changed.
    pub fn map(&mut self, angles: OrientationAngles, config: &MapperConfig) -> Option<TiltMapping> {
        let mapping = map_tilt(angles, config, self.last_target)?;
        self.last_target = mapping.target;
        Some(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threshold: f32, direction: Direction) -> MapperConfig {
        MapperConfig {
            threshold_degrees: threshold,
            max_offset: IVec2::new(150, 130),
            direction,
        }
    }

    fn angles(pitch: f32, roll: f32) -> OrientationAngles {
        OrientationAngles::new(pitch, roll)
    }

    #[test]
    fn half_threshold_roll_maps_to_half_offset() {
        let mapping = map_tilt(angles(0.0, 22.5), &config(45.0, Direction::Normal), IVec2::ZERO)
            .unwrap();
        assert_eq!(mapping.ratio, Vec2::new(0.5, 0.0));
        assert_eq!(mapping.target, IVec2::new(-75, 0));
    }

    #[test]
    fn offsets_stay_within_max() {
        let cfg = config(45.0, Direction::Normal);
        let mut degrees = -90.0;
        while degrees <= 90.0 {
            for (pitch, roll) in [(degrees, 0.0), (0.0, degrees), (degrees, -degrees)] {
                if let Some(m) = map_tilt(angles(pitch, roll), &cfg, IVec2::new(i32::MAX, 0)) {
                    assert!(m.target.x.abs() <= 150, "{degrees}: {:?}", m.target);
                    assert!(m.target.y.abs() <= 130, "{degrees}: {:?}", m.target);
                    assert!(m.ratio.abs().max_element() <= 1.0);
                }
            }
            degrees += 2.5;
        }
    }

    #[test]
    fn tilt_past_threshold_saturates() {
        let mapping = map_tilt(angles(-80.0, 60.0), &config(45.0, Direction::Normal), IVec2::ZERO)
            .unwrap();
        assert_eq!(mapping.ratio, Vec2::new(1.0, -1.0));
        assert_eq!(mapping.target, IVec2::new(-150, 130));
    }

    #[test]
    fn reverse_flips_sign() {
        for (pitch, roll) in [(5.0, 10.0), (-12.3, 30.0), (44.0, -7.7)] {
            let normal = map_tilt(angles(pitch, roll), &config(45.0, Direction::Normal), IVec2::MAX)
                .unwrap();
            let reverse = map_tilt(angles(pitch, roll), &config(45.0, Direction::Reverse), IVec2::MAX)
                .unwrap();
            assert_eq!(normal.target, -reverse.target);
            assert_eq!(normal.ratio, reverse.ratio);
        }
    }

    #[test]
    fn repeated_sample_is_debounced() {
        let cfg = config(45.0, Direction::Normal);
        let mut mapper = TiltMapper::new();

        let first = mapper.map(angles(5.0, 10.0), &cfg);
        assert!(first.is_some());
        assert_eq!(mapper.map(angles(5.0, 10.0), &cfg), None);

        // Jitter that rounds to the same pixel is filtered too.
        assert_eq!(mapper.map(angles(5.0, 10.01), &cfg), None);
        assert_eq!(mapper.last_target(), first.unwrap().target);
    }

    #[test]
    fn level_device_emits_nothing_initially() {
        let mut mapper = TiltMapper::new();
        assert_eq!(mapper.map(angles(0.0, 0.0), &MapperConfig::default()), None);
    }

    #[test]
    fn zero_threshold_behaves_like_one() {
        let zero = config(0.0, Direction::Normal);
        let one = config(1.0, Direction::Normal);
        for (pitch, roll) in [(0.3, -0.7), (0.5, 0.5), (10.0, -10.0), (-0.01, 0.99)] {
            assert_eq!(
                map_tilt(angles(pitch, roll), &zero, IVec2::MAX),
                map_tilt(angles(pitch, roll), &one, IVec2::MAX)
            );
        }
    }

    #[test]
    fn negative_max_offset_mirrors() {
        let mut cfg = config(45.0, Direction::Normal);
        cfg.max_offset = IVec2::new(-150, 130);
        let mapping = map_tilt(angles(0.0, 22.5), &cfg, IVec2::ZERO).unwrap();
        assert_eq!(mapping.target, IVec2::new(75, 0));
    }

    #[test]
    fn layout_config_conversion() {
        let layout = LayoutConfig {
            max_horizontal_offset_px: 10,
            max_vertical_offset_px: 20,
            threshold_degrees: 30.0,
            direction: Direction::Reverse,
            ..LayoutConfig::default()
        };
        let cfg = MapperConfig::from(&layout);
        assert_eq!(cfg.max_offset, IVec2::new(10, 20));
        assert_eq!(cfg.threshold_degrees, 30.0);
        assert_eq!(cfg.direction, Direction::Reverse);
    }
}
