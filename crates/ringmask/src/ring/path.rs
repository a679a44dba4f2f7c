use super::angle::{ANGLE_EPSILON, ArcAngles};
use super::geometry::{ArcGeometry, Point};
use cairo::Context;
use std::f64::consts::TAU;

/// Closed outline of a thick arc: outer edge clockwise, inner edge back counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    start: f64,
    sweep: f64,
}

impl ArcPath {
    /// Angles may come in either order; the band always covers the clockwise span from the
    /// smaller to the larger one, capped at a full turn.
    pub fn build(geometry: &ArcGeometry, angles: ArcAngles) -> Self {
        let (start, end) = if angles.end >= angles.start {
            (angles.start, angles.end)
        } else {
            (angles.end, angles.start)
        };

        Self {
            center: geometry.center,
            outer_radius: geometry.outer_radius(),
            inner_radius: geometry.inner_radius(),
            start,
            sweep: (end - start).min(TAU),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn is_empty(&self) -> bool {
        self.sweep < ANGLE_EPSILON || self.outer_radius <= self.inner_radius
    }

    pub fn is_full_ring(&self) -> bool {
        self.sweep >= TAU - ANGLE_EPSILON
    }

    pub fn append_to(&self, cr: &Context) {
        if self.is_empty() {
            return;
        }
        let Point { x, y } = self.center;
        let end = self.start + self.sweep;

        cr.new_sub_path();
        cr.arc(x, y, self.outer_radius, self.start, end);
        if self.is_full_ring() {
            // two opposite contours leave the hole unfilled without a seam
            cr.close_path();
            cr.new_sub_path();
        }
        cr.arc_negative(x, y, self.inner_radius, end, self.start);
        cr.close_path();
    }
}
