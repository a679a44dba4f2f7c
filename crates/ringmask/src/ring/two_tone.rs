use super::angle::{ArcAngles, TickStatus};
use super::arc::LineArc;
use super::geometry::{Point, Size};
use crate::params::RingParameters;
use cairo::Context;
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::{Duration, Instant};

pub const DEFAULT_ANGLE_DIFFERENCE: f64 = FRAC_PI_2;

/// Two arcs drawn on top of each other with different colors.
///
/// The background arc is asked for angles shifted by `angle_difference` and its rotation is
/// biased back by the same amount, so both cover the same span on screen while their
/// gradients point in different directions.
pub struct TwoToneArc {
    foreground: LineArc,
    background: LineArc,
    angle_difference: f64,
}

impl TwoToneArc {
    pub fn new(color1: Srgba<f64>, color2: Srgba<f64>) -> Self {
        let mut arc = Self {
            foreground: LineArc::new(color1),
            background: LineArc::new(color2),
            angle_difference: DEFAULT_ANGLE_DIFFERENCE,
        };
        arc.background
            .rotation_mut()
            .set_bias(-DEFAULT_ANGLE_DIFFERENCE);
        arc.foreground.set_animated(true);
        arc.background.set_animated(true);
        arc.set_initial_angles(0.0, 0.0);
        arc
    }

    pub fn from_parameters(params: &RingParameters) -> Self {
        let mut arc = Self::new(*params.color1, *params.color2);
        arc.apply_parameters(params);
        arc
    }

    pub fn foreground(&self) -> &LineArc {
        &self.foreground
    }

    pub fn background(&self) -> &LineArc {
        &self.background
    }

    pub fn angle_difference(&self) -> f64 {
        self.angle_difference
    }

    pub fn set_angle_difference(&mut self, difference: f64) {
        let delta = difference - self.angle_difference;
        self.angle_difference = difference;
        self.background.rotation_mut().set_bias(-difference);
        self.background.shift_angles(delta);
    }

    pub fn parameters(&self) -> RingParameters {
        let config = self.foreground.config();
        RingParameters::new(
            self.foreground.color().into(),
            self.background.color().into(),
            config.gradation(),
            config.radius_ratio(),
            config.line_width_ratio(),
        )
    }

    pub fn apply_parameters(&mut self, params: &RingParameters) {
        self.set_color1(*params.color1);
        self.set_color2(*params.color2);
        self.each(|arc| {
            arc.set_gradation(params.blend);
            arc.set_radius_ratio(params.radius_ratio);
            arc.set_line_width_ratio(params.width_ratio);
        });
    }

    pub fn set_color1(&mut self, color: Srgba<f64>) {
        self.foreground.set_color(color);
    }

    pub fn set_color2(&mut self, color: Srgba<f64>) {
        self.background.set_color(color);
    }

    pub fn set_radius_ratio(&mut self, ratio: f64) {
        self.each(|arc| arc.set_radius_ratio(ratio));
    }

    pub fn set_line_width_ratio(&mut self, ratio: f64) {
        self.each(|arc| arc.set_line_width_ratio(ratio));
    }

    pub fn set_center_ratio(&mut self, ratio: Point) {
        self.each(|arc| arc.set_center_ratio(ratio));
    }

    pub fn set_gradation(&mut self, gradation: f64) {
        self.each(|arc| arc.set_gradation(gradation));
    }

    pub fn set_side(&mut self, side: f64) {
        self.each(|arc| arc.set_side(side));
    }

    pub fn set_auto_fit(&mut self, auto_fit: bool) {
        self.each(|arc| arc.set_auto_fit(auto_fit));
    }

    pub fn start_angle(&self) -> f64 {
        self.foreground.start_angle()
    }

    pub fn set_start_angle(&mut self, angle: f64) {
        self.foreground.set_start_angle(angle);
        self.background
            .set_start_angle(angle + self.angle_difference);
    }

    pub fn end_angle(&self) -> f64 {
        self.foreground.end_angle()
    }

    pub fn set_end_angle(&mut self, angle: f64) {
        self.foreground.set_end_angle(angle);
        self.background.set_end_angle(angle + self.angle_difference);
    }

    pub fn target_angles(&self) -> ArcAngles {
        self.foreground.angles().target()
    }

    pub fn set_angles(&mut self, angles: ArcAngles) {
        self.foreground.set_angles(angles);
        self.background
            .set_angles(angles.shifted(self.angle_difference));
    }

    /// Places both arcs without animating.
    pub fn set_initial_angles(&mut self, start: f64, end: f64) {
        let angles = ArcAngles::new(start, end);
        self.foreground.snap_angles(angles);
        self.background
            .snap_angles(angles.shifted(self.angle_difference));
    }

    /// Brings the foreground start angle back into the first turn, moving both arcs together.
    pub fn wrap(&mut self) {
        let start = self.foreground.angles().target().start;
        if start >= TAU {
            let delta = -TAU * (start / TAU).floor();
            self.each(|arc| arc.shift_angles(delta));
        }
    }

    pub fn tick(&mut self) -> TickStatus {
        let front = self.foreground.tick();
        let back = self.background.tick();
        if front == TickStatus::Moved || back == TickStatus::Moved {
            TickStatus::Moved
        } else {
            TickStatus::Settled
        }
    }

    pub fn is_settled(&self) -> bool {
        self.foreground.angles().is_settled() && self.background.angles().is_settled()
    }

    pub fn is_rotating(&self) -> bool {
        self.foreground.rotation().is_running()
    }

    pub fn start_rotation(&mut self, period: Duration, now: Instant) -> bool {
        if self.is_rotating() {
            return false;
        }
        self.each(|arc| {
            arc.rotation_mut().start(period, now);
        });
        true
    }

    pub fn stop_rotation(&mut self, now: Instant) -> bool {
        if !self.is_rotating() {
            return false;
        }
        self.each(|arc| {
            arc.rotation_mut().stop(now);
        });
        true
    }

    pub fn draw(&mut self, cr: &Context, bounds: Size, now: Instant) -> Result<(), cairo::Error> {
        self.background.draw(cr, bounds, now)?;
        self.foreground.draw(cr, bounds, now)
    }

    fn each(&mut self, mut f: impl FnMut(&mut LineArc)) {
        f(&mut self.foreground);
        f(&mut self.background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HexColor;
    use std::f64::consts::PI;

    fn two_tone() -> TwoToneArc {
        TwoToneArc::new(Srgba::new(1.0, 0.0, 0.0, 1.0), Srgba::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn test_background_offset_follows_any_angle() {
        let mut arc = two_tone();
        for angle in [0.0, -PI / 2.0, 7.5, -123.25, 1e-6] {
            arc.set_start_angle(angle);
            arc.set_end_angle(angle * 2.0);
            assert_eq!(arc.background().start_angle(), angle + FRAC_PI_2);
            assert_eq!(arc.background().end_angle(), angle * 2.0 + FRAC_PI_2);
            assert_eq!(arc.start_angle(), angle);
        }
    }

    #[test]
    fn test_both_arcs_land_on_same_span() {
        let mut arc = two_tone();
        arc.set_angles(ArcAngles::new(0.3, 2.0));
        while arc.tick() == TickStatus::Moved {}

        let now = Instant::now();
        let front = arc.foreground().angles().current();
        let back = arc.background().angles().current();
        let front_shown = front.start + arc.foreground().rotation().angle(now);
        let back_shown = back.start + arc.background().rotation().angle(now);
        assert!((front_shown - back_shown).abs() < 1e-3);
    }

    #[test]
    fn test_initial_angles_skip_animation() {
        let mut arc = two_tone();
        arc.set_initial_angles(-1.0, 1.0);
        assert!(arc.is_settled());
        assert_eq!(arc.tick(), TickStatus::Settled);
        assert_eq!(arc.background().angles().current().start, -1.0 + FRAC_PI_2);
    }

    #[test]
    fn test_changing_difference_moves_background() {
        let mut arc = two_tone();
        arc.set_initial_angles(0.0, 1.0);
        arc.set_angle_difference(PI);
        assert_eq!(arc.background().start_angle(), PI);
        assert_eq!(arc.background().rotation().bias(), -PI);
        arc.set_start_angle(0.5);
        assert_eq!(arc.background().start_angle(), 0.5 + PI);
    }

    #[test]
    fn test_wrap_preserves_offset() {
        let mut arc = two_tone();
        arc.set_initial_angles(TAU + 0.2, TAU + 1.0);
        arc.wrap();
        assert!((arc.start_angle() - 0.2).abs() < 1e-12);
        assert!((arc.background().start_angle() - (0.2 + FRAC_PI_2)).abs() < 1e-12);
        assert!(arc.is_settled());
    }

    #[test]
    fn test_rotation_lifecycle() {
        let t0 = Instant::now();
        let mut arc = two_tone();
        assert!(arc.start_rotation(Duration::from_secs(3), t0));
        assert!(!arc.start_rotation(Duration::from_secs(3), t0));
        assert!(arc.background().rotation().is_running());
        assert!(arc.stop_rotation(t0 + Duration::from_secs(1)));
        assert!(!arc.stop_rotation(t0 + Duration::from_secs(2)));
        assert!(!arc.background().rotation().is_running());
    }

    #[test]
    fn test_parameters_batch() {
        let mut arc = two_tone();
        let params = RingParameters::new(
            HexColor::rgba(0.0, 1.0, 0.0, 1.0),
            HexColor::rgba(1.0, 1.0, 0.0, 0.5),
            0.25,
            0.4,
            0.1,
        );
        arc.apply_parameters(&params);
        assert_eq!(arc.parameters(), params);
        assert_eq!(arc.background().config().radius_ratio(), 0.4);
        assert_eq!(arc.background().color(), Srgba::new(1.0, 1.0, 0.0, 0.5));
    }
}
