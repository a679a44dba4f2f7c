use super::angle::{AngleState, ArcAngles, TickStatus};
use super::compositor::GradientCompositor;
use super::geometry::{ArcConfig, ArcGeometry, Point, Size};
use super::path::ArcPath;
use super::rotation::RotationDriver;
use cairo::Context;
use palette::Srgba;
use std::time::Instant;

/// One thick arc with gradient fill, animated angles and its own rotation.
pub struct LineArc {
    config: ArcConfig,
    angles: AngleState,
    compositor: GradientCompositor,
    rotation: RotationDriver,
}

impl LineArc {
    pub fn new(color: Srgba<f64>) -> Self {
        let config = ArcConfig::default();
        Self {
            compositor: GradientCompositor::new(color, config.gradation()),
            config,
            angles: AngleState::new(false),
            rotation: RotationDriver::default(),
        }
    }

    pub fn config(&self) -> &ArcConfig {
        &self.config
    }

    pub fn set_side(&mut self, side: f64) {
        self.config.set_side(side);
    }

    pub fn set_auto_fit(&mut self, auto_fit: bool) {
        self.config.set_auto_fit(auto_fit);
    }

    pub fn set_radius_ratio(&mut self, ratio: f64) {
        self.config.set_radius_ratio(ratio);
    }

    pub fn set_line_width_ratio(&mut self, ratio: f64) {
        self.config.set_line_width_ratio(ratio);
    }

    pub fn set_center_ratio(&mut self, ratio: Point) {
        self.config.set_center_ratio(ratio);
    }

    pub fn set_gradation(&mut self, gradation: f64) {
        self.config.set_gradation(gradation);
        self.compositor.set_gradation(self.config.gradation());
    }

    pub fn color(&self) -> Srgba<f64> {
        self.compositor.color()
    }

    pub fn set_color(&mut self, color: Srgba<f64>) {
        self.compositor.set_color(color);
    }

    pub fn set_animated(&mut self, animated: bool) {
        self.angles.set_animated(animated);
    }

    pub fn angles(&self) -> &AngleState {
        &self.angles
    }

    pub fn start_angle(&self) -> f64 {
        self.angles.target().start
    }

    pub fn set_start_angle(&mut self, angle: f64) {
        self.angles.set_target_start(angle);
    }

    pub fn end_angle(&self) -> f64 {
        self.angles.target().end
    }

    pub fn set_end_angle(&mut self, angle: f64) {
        self.angles.set_target_end(angle);
    }

    pub fn set_angles(&mut self, angles: ArcAngles) {
        self.angles.set_target(angles);
    }

    pub fn snap_angles(&mut self, angles: ArcAngles) {
        self.angles.snap(angles);
    }

    pub fn shift_angles(&mut self, delta: f64) {
        self.angles.shift(delta);
    }

    pub fn tick(&mut self) -> TickStatus {
        self.angles.step()
    }

    pub fn rotation(&self) -> &RotationDriver {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationDriver {
        &mut self.rotation
    }

    pub fn geometry(&self, bounds: Size) -> ArcGeometry {
        self.config.resolve(bounds)
    }

    /// Outline at the angles rendered this frame.
    pub fn path(&self, bounds: Size) -> ArcPath {
        ArcPath::build(&self.geometry(bounds), self.angles.current())
    }

    pub fn draw(&mut self, cr: &Context, bounds: Size, now: Instant) -> Result<(), cairo::Error> {
        let path = self.path(bounds);

        cr.save()?;
        cr.transform(self.rotation.transform(now, bounds.center()));
        self.compositor.render(cr, &path, bounds)?;
        cr.restore()
    }
}
