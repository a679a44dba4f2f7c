use super::geometry::Point;
use cairo::Matrix;
use std::f64::consts::TAU;
use std::time::{Duration, Instant};

pub fn rotation_matrix(angle: f64) -> Matrix {
    let (sin, cos) = angle.sin_cos();
    Matrix::new(cos, sin, -sin, cos, 0.0, 0.0)
}

/// Rotation angle of a matrix built by [`rotation_matrix`], in `(-PI, PI]`.
pub fn angle_from_matrix(matrix: &Matrix) -> f64 {
    matrix.yx().atan2(matrix.xx())
}

#[derive(Debug, Clone, Copy)]
struct Spin {
    period: Duration,
    since: Instant,
}

/// Continuous rotation whose angle is owned state rather than decoded from a transform.
///
/// `bias` is a fixed offset added on top of the animated angle, which keeps two drivers
/// phase locked when they are started and stopped together.
#[derive(Debug, Clone, Default)]
pub struct RotationDriver {
    resting: f64,
    bias: f64,
    spin: Option<Spin>,
}

impl RotationDriver {
    pub fn new(bias: f64) -> Self {
        Self {
            bias,
            ..Self::default()
        }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn is_running(&self) -> bool {
        self.spin.is_some()
    }

    /// Starts a full turn every `period`, continuing from the current angle.
    /// Returns `false` when already running.
    pub fn start(&mut self, period: Duration, now: Instant) -> bool {
        if self.spin.is_some() || period.is_zero() {
            return false;
        }
        self.spin = Some(Spin { period, since: now });
        true
    }

    /// Freezes the rotation at its animated angle. Returns `false` when not running.
    pub fn stop(&mut self, now: Instant) -> bool {
        if self.spin.is_none() {
            return false;
        }
        self.resting = self.current_animated_angle(now);
        self.spin = None;
        true
    }

    /// Angle produced by the running animation, without bias.
    pub fn current_animated_angle(&self, now: Instant) -> f64 {
        match self.spin {
            None => self.resting,
            Some(spin) => {
                let turns = now.saturating_duration_since(spin.since).as_secs_f64()
                    / spin.period.as_secs_f64();
                (self.resting + TAU * turns.fract()).rem_euclid(TAU)
            }
        }
    }

    pub fn angle(&self, now: Instant) -> f64 {
        self.current_animated_angle(now) + self.bias
    }

    /// Rotation about `pivot`.
    pub fn transform(&self, now: Instant, pivot: Point) -> Matrix {
        let mut matrix = Matrix::identity();
        matrix.translate(pivot.x, pivot.y);
        matrix.rotate(self.angle(now));
        matrix.translate(-pivot.x, -pivot.y);
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    fn same_angle(a: f64, b: f64) -> bool {
        let diff = (a - b).rem_euclid(TAU);
        diff < 1e-9 || TAU - diff < 1e-9
    }

    #[test]
    fn test_matrix_round_trip() {
        for i in -2..=2 {
            for j in 0..3 {
                let angle = FRAC_PI_2 * i as f64 + FRAC_PI_6 * j as f64;
                let recovered = angle_from_matrix(&rotation_matrix(angle));
                let diff = (recovered - angle).rem_euclid(PI);
                assert!(diff < 1e-9 || PI - diff < 1e-9, "{angle} -> {recovered}");
                assert!(same_angle(recovered, angle), "{angle} -> {recovered}");
            }
        }
    }

    #[test]
    fn test_stop_keeps_animated_angle() {
        let t0 = Instant::now();
        let mut driver = RotationDriver::default();
        assert!(driver.start(Duration::from_secs(4), t0));

        let t1 = t0 + Duration::from_secs(1);
        assert!(same_angle(driver.current_animated_angle(t1), FRAC_PI_2));

        assert!(driver.stop(t1));
        let later = t0 + Duration::from_secs(10);
        assert!(same_angle(driver.current_animated_angle(later), FRAC_PI_2));

        assert!(driver.start(Duration::from_secs(4), later));
        let after = later + Duration::from_secs(1);
        assert!(same_angle(driver.current_animated_angle(after), PI));
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let t0 = Instant::now();
        let mut driver = RotationDriver::default();
        assert!(!driver.stop(t0));
        assert!(driver.start(Duration::from_secs(2), t0));
        assert!(!driver.start(Duration::from_secs(1), t0 + Duration::from_millis(500)));

        // still the first period
        let t1 = t0 + Duration::from_millis(500);
        assert!(same_angle(driver.current_animated_angle(t1), FRAC_PI_2));

        assert!(driver.stop(t1));
        assert!(!driver.stop(t1 + Duration::from_secs(1)));
        assert!(!driver.is_running());
    }

    #[test]
    fn test_bias_keeps_drivers_phase_locked() {
        let t0 = Instant::now();
        let mut front = RotationDriver::new(0.0);
        let mut back = RotationDriver::new(-FRAC_PI_2);
        front.start(Duration::from_secs(3), t0);
        back.start(Duration::from_secs(3), t0);

        for ms in [0, 250, 1700, 2999, 7123] {
            let now = t0 + Duration::from_millis(ms);
            assert!(same_angle(front.angle(now) - back.angle(now), FRAC_PI_2));
        }
    }

    #[test]
    fn test_transform_rotates_about_pivot() {
        let driver = RotationDriver::new(FRAC_PI_2);
        let matrix = driver.transform(Instant::now(), Point::new(50.0, 50.0));

        let (x, y) = matrix.transform_point(50.0, 50.0);
        assert!((x - 50.0).abs() < 1e-9 && (y - 50.0).abs() < 1e-9);

        let (x, y) = matrix.transform_point(100.0, 50.0);
        assert!((x - 50.0).abs() < 1e-9 && (y - 100.0).abs() < 1e-9);
        assert!(same_angle(angle_from_matrix(&matrix), FRAC_PI_2));
    }
}
