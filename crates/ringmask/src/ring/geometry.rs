#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

pub const MAX_RATIO: f64 = 0.5;

/// Ratio based description of a thick arc inside a square of `side` length.
///
/// Ratios are clamped when set, so an `ArcConfig` never holds a value outside its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcConfig {
    side: f64,
    radius_ratio: f64,
    line_width_ratio: f64,
    center_ratio: Point,
    gradation: f64,
    auto_fit: bool,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            side: 100.0,
            radius_ratio: 0.45,
            line_width_ratio: 0.05,
            center_ratio: Point::new(0.5, 0.5),
            gradation: 0.5,
            auto_fit: true,
        }
    }
}

impl ArcConfig {
    pub fn side(&self) -> f64 {
        self.side
    }

    pub fn set_side(&mut self, side: f64) {
        self.side = side.max(0.0);
    }

    pub fn radius_ratio(&self) -> f64 {
        self.radius_ratio
    }

    pub fn set_radius_ratio(&mut self, ratio: f64) {
        self.radius_ratio = clamp_ratio(ratio);
    }

    pub fn line_width_ratio(&self) -> f64 {
        self.line_width_ratio
    }

    pub fn set_line_width_ratio(&mut self, ratio: f64) {
        self.line_width_ratio = clamp_ratio(ratio);
    }

    pub fn center_ratio(&self) -> Point {
        self.center_ratio
    }

    pub fn set_center_ratio(&mut self, ratio: Point) {
        self.center_ratio = Point::new(ratio.x.clamp(0.0, 1.0), ratio.y.clamp(0.0, 1.0));
    }

    pub fn gradation(&self) -> f64 {
        self.gradation
    }

    pub fn set_gradation(&mut self, gradation: f64) {
        self.gradation = clamp_unit(gradation);
    }

    pub fn auto_fit(&self) -> bool {
        self.auto_fit
    }

    pub fn set_auto_fit(&mut self, auto_fit: bool) {
        self.auto_fit = auto_fit;
    }

    /// Side length used for this layout pass. Auto fit follows the container on every call.
    pub fn effective_side(&self, container: Size) -> f64 {
        if self.auto_fit {
            container.min_side().max(0.0)
        } else {
            self.side
        }
    }

    /// `radius_ratio` places the outer edge of the band; the returned radius is the
    /// centerline, half a line width further in.
    pub fn resolve(&self, container: Size) -> ArcGeometry {
        let side = self.effective_side(container);
        let line_width = side * self.line_width_ratio;
        let radius = (side * self.radius_ratio - line_width / 2.0).max(0.0);
        let min_side = container.min_side().max(0.0);

        ArcGeometry {
            radius,
            line_width,
            center: Point::new(min_side * self.center_ratio.x, min_side * self.center_ratio.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub radius: f64,
    pub line_width: f64,
    pub center: Point,
}

impl ArcGeometry {
    pub fn outer_radius(&self) -> f64 {
        self.radius + self.line_width / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        (self.radius - self.line_width / 2.0).max(0.0)
    }
}

pub(crate) fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_RATIO)
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(side: f64, radius_ratio: f64, line_width_ratio: f64) -> ArcConfig {
        let mut config = ArcConfig::default();
        config.set_auto_fit(false);
        config.set_side(side);
        config.set_radius_ratio(radius_ratio);
        config.set_line_width_ratio(line_width_ratio);
        config
    }

    #[test]
    fn test_resolve_scales_with_side() {
        let geometry = fixed(100.0, 0.5, 0.1).resolve(Size::square(100.0));
        assert!((geometry.radius - 45.0).abs() < 1e-9);
        assert!((geometry.line_width - 10.0).abs() < 1e-9);
        assert!((geometry.outer_radius() - 50.0).abs() < 1e-9);
        assert_eq!(geometry.center, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_ratios_are_clamped() {
        let config = fixed(100.0, 0.9, -0.2);
        assert_eq!(config.radius_ratio(), 0.5);
        assert_eq!(config.line_width_ratio(), 0.0);

        let mut config = ArcConfig::default();
        config.set_gradation(3.0);
        config.set_center_ratio(Point::new(-1.0, 2.0));
        assert_eq!(config.gradation(), 1.0);
        assert_eq!(config.center_ratio(), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_auto_fit_follows_every_layout() {
        let mut config = ArcConfig::default();
        config.set_radius_ratio(0.5);
        config.set_line_width_ratio(0.0);

        let wide = config.resolve(Size::new(300.0, 120.0));
        assert!((wide.radius - 60.0).abs() < 1e-9);
        assert_eq!(wide.center, Point::new(60.0, 60.0));

        let tall = config.resolve(Size::new(80.0, 400.0));
        assert!((tall.radius - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_side_ignores_container() {
        let geometry = fixed(200.0, 0.25, 0.1).resolve(Size::new(50.0, 60.0));
        assert!((geometry.line_width - 20.0).abs() < 1e-9);
        assert!((geometry.radius - 40.0).abs() < 1e-9);
        assert_eq!(geometry.center, Point::new(25.0, 25.0));
    }

    #[test]
    fn test_thick_band_never_goes_negative() {
        let geometry = fixed(100.0, 0.1, 0.5).resolve(Size::square(100.0));
        assert_eq!(geometry.radius, 0.0);
        assert_eq!(geometry.inner_radius(), 0.0);
    }
}
