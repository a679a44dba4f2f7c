use std::f64::consts::PI;

/// Angular distance covered by one animation tick (2 degrees).
pub const ANGLE_STEP: f64 = PI / 90.0;

/// Angles closer than this (0.01 degrees) are considered equal.
pub const ANGLE_EPSILON: f64 = PI / 18000.0;

/// Next angle on the way from `current` to `target`.
///
/// Far from the target the angle moves by a fixed [`ANGLE_STEP`]; close to it the angle
/// jumps to the midpoint, so the motion decelerates instead of oscillating around the target.
pub fn next_tick_angle(current: f64, target: f64) -> f64 {
    let midpoint = (current + target) / 2.0;
    if (midpoint - target).abs() <= ANGLE_STEP {
        midpoint
    } else if current < target {
        current + ANGLE_STEP
    } else {
        current - ANGLE_STEP
    }
}

/// Start and end angle of an arc in radians. Increasing angles run clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }

    pub fn shifted(&self, delta: f64) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    fn is_close_to(&self, other: &Self) -> bool {
        (self.start - other.start).abs() < ANGLE_EPSILON
            && (self.end - other.end).abs() < ANGLE_EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Moved,
    Settled,
}

/// Rendered and requested angles of one arc.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleState {
    current: ArcAngles,
    target: ArcAngles,
    animated: bool,
}

impl AngleState {
    pub fn new(animated: bool) -> Self {
        Self {
            animated,
            ..Self::default()
        }
    }

    pub fn current(&self) -> ArcAngles {
        self.current
    }

    pub fn target(&self) -> ArcAngles {
        self.target
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    pub fn set_target_start(&mut self, start: f64) {
        self.set_target(ArcAngles::new(start, self.target.end));
    }

    pub fn set_target_end(&mut self, end: f64) {
        self.set_target(ArcAngles::new(self.target.start, end));
    }

    /// Requests new angles. Without animation the current angles follow immediately.
    pub fn set_target(&mut self, target: ArcAngles) {
        self.target = target;
        if !self.animated {
            self.current = target;
        }
    }

    /// Moves both current and target angles without animating.
    pub fn snap(&mut self, angles: ArcAngles) {
        self.current = angles;
        self.target = angles;
    }

    /// Rotates the whole state by `delta` so the interpolator sees no change.
    pub fn shift(&mut self, delta: f64) {
        self.current = self.current.shifted(delta);
        self.target = self.target.shifted(delta);
    }

    pub fn is_settled(&self) -> bool {
        self.current.is_close_to(&self.target)
    }

    /// Advances the current angles by one animation tick.
    pub fn step(&mut self) -> TickStatus {
        if self.is_settled() {
            return TickStatus::Settled;
        }
        self.current = ArcAngles::new(
            next_tick_angle(self.current.start, self.target.start),
            next_tick_angle(self.current.end, self.target.end),
        );
        TickStatus::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn run_to_rest(state: &mut AngleState) -> usize {
        let mut ticks = 0;
        while state.step() == TickStatus::Moved {
            ticks += 1;
            assert!(ticks < 10_000, "interpolator did not settle");
        }
        ticks
    }

    #[test]
    fn test_next_tick_angle_steps_linearly_when_far() {
        assert!((next_tick_angle(0.0, 1.0) - ANGLE_STEP).abs() < 1e-12);
        assert!((next_tick_angle(1.0, 0.0) - (1.0 - ANGLE_STEP)).abs() < 1e-12);
    }

    #[test]
    fn test_next_tick_angle_uses_midpoint_when_close() {
        let target = 0.5;
        let current = target - ANGLE_STEP;
        assert!((next_tick_angle(current, target) - (target - ANGLE_STEP / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let cases = [(0.0, PI), (3.0, -2.5), (-TAU, TAU), (0.1, 0.1 + ANGLE_STEP / 3.0)];

        for (from, to) in cases {
            let mut state = AngleState::new(true);
            state.snap(ArcAngles::new(from, from));
            state.set_target(ArcAngles::new(to, to));

            let mut ticks = 0;
            loop {
                let before = state.current().end;
                if state.step() == TickStatus::Settled {
                    break;
                }
                ticks += 1;
                let after = state.current().end;
                let overshoot = if to >= from { after - to } else { to - after };
                assert!(overshoot <= ANGLE_STEP, "overshoot {overshoot} from {from} to {to}");
                assert!((after - before).abs() <= ANGLE_STEP + 1e-12);
            }

            let bound = ((to - from).abs() / ANGLE_STEP).ceil() as usize + 16;
            assert!(ticks <= bound, "{ticks} ticks exceeds {bound}");
            assert!((state.current().end - to).abs() < ANGLE_EPSILON);
            assert!((state.current().start - to).abs() < ANGLE_EPSILON);
        }
    }

    #[test]
    fn test_step_is_noop_at_rest() {
        let mut state = AngleState::new(true);
        state.set_target(ArcAngles::new(-1.0, 2.0));
        run_to_rest(&mut state);

        let rested = state.current();
        assert_eq!(state.step(), TickStatus::Settled);
        assert_eq!(state.step(), TickStatus::Settled);
        assert_eq!(state.current(), rested);
    }

    #[test]
    fn test_unanimated_state_follows_target() {
        let mut state = AngleState::new(false);
        state.set_target_end(1.5);
        assert_eq!(state.current(), ArcAngles::new(0.0, 1.5));
        assert!(state.is_settled());
        assert_eq!(state.step(), TickStatus::Settled);
    }

    #[test]
    fn test_shift_keeps_relative_motion() {
        let mut state = AngleState::new(true);
        state.snap(ArcAngles::new(TAU - 0.1, TAU + 0.5));
        state.set_target(ArcAngles::new(TAU + 0.05, TAU + 0.7));
        let pending = state.target().start - state.current().start;

        state.shift(-TAU);

        assert!(state.target().start < TAU);
        assert!((state.target().start - state.current().start - pending).abs() < 1e-12);
        assert!((state.target().sweep() - 0.65).abs() < 1e-12);
    }
}
