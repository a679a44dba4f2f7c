use super::angle::{ANGLE_STEP, ArcAngles};
use std::time::Duration;

/// Tick rate of the sweep, 10 Hz.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(100);

const PEAK: i8 = 8;
const PIVOT: i8 = 4;

/// Indeterminate "breathing" sweep.
///
/// The arc advances by a constant `4 * ANGLE_STEP` per tick while its length changes by
/// `ANGLE_STEP * (±4 - direction)`. `direction` counts down through `-8..=-1` and `8..=1`
/// and flips sign at the ends, so one full cycle is sixteen ticks long and the length
/// returns to where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOscillator {
    direction: i8,
}

impl Default for SweepOscillator {
    fn default() -> Self {
        Self { direction: -PEAK }
    }
}

impl SweepOscillator {
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Returns the next target angles and advances the phase.
    pub fn tick(&mut self, angles: ArcAngles) -> ArcAngles {
        let pivot = if self.direction > 0 { PIVOT } else { -PIVOT };
        let stretch = ANGLE_STEP * f64::from(pivot - self.direction);
        let advance = ANGLE_STEP * f64::from(PIVOT);

        self.direction = match self.direction {
            1 => -PEAK,
            -1 => PEAK,
            d if d > 0 => d - 1,
            d => d + 1,
        };

        ArcAngles::new(angles.start + advance, angles.end + stretch + advance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYCLE: usize = 16;

    #[test]
    fn test_direction_sequence() {
        let mut oscillator = SweepOscillator::default();
        let mut seen = Vec::new();
        for _ in 0..CYCLE {
            seen.push(oscillator.direction());
            oscillator.tick(ArcAngles::default());
        }
        assert_eq!(
            seen,
            vec![-8, -7, -6, -5, -4, -3, -2, -1, 8, 7, 6, 5, 4, 3, 2, 1]
        );
        assert_eq!(oscillator.direction(), -8);
        assert!(seen.iter().all(|d| *d != 0 && d.abs() <= 8));
    }

    #[test]
    fn test_sweep_length_is_periodic_and_bounded() {
        let mut oscillator = SweepOscillator::default();
        let mut angles = ArcAngles::new(0.0, 1.0);
        let initial = angles.sweep();

        let mut lengths = Vec::new();
        for _ in 0..CYCLE {
            angles = oscillator.tick(angles);
            lengths.push(angles.sweep());
        }
        assert!((angles.sweep() - initial).abs() < 1e-9);

        let longest = lengths.iter().cloned().fold(f64::MIN, f64::max);
        let shortest = lengths.iter().cloned().fold(f64::MAX, f64::min);
        assert!((longest - (initial + 10.0 * ANGLE_STEP)).abs() < 1e-9);
        assert!((shortest - (initial - 6.0 * ANGLE_STEP)).abs() < 1e-9);

        for _ in 0..CYCLE {
            angles = oscillator.tick(angles);
        }
        assert!((angles.sweep() - initial).abs() < 1e-9);
    }

    #[test]
    fn test_start_advances_every_tick() {
        let mut oscillator = SweepOscillator::default();
        let mut angles = ArcAngles::default();
        for i in 1..=40 {
            angles = oscillator.tick(angles);
            assert!((angles.start - 4.0 * ANGLE_STEP * i as f64).abs() < 1e-9);
        }
    }
}
