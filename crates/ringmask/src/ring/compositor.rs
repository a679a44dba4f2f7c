use super::geometry::{Size, clamp_unit};
use super::path::ArcPath;
use cairo::{Context, Format, ImageSurface, LinearGradient, Operator};
use palette::Srgba;

struct Layers {
    size: (i32, i32),
    fill: ImageSurface,
    mask: ImageSurface,
}

/// Paints a solid color through the arc outline and a horizontal alpha gradient.
///
/// The gradient is opaque at the left edge of the bounds and fades to `1 - gradation` at the
/// right edge. In cairo angles the opaque side is around angle π, not angle 0 (the right
/// edge), so an unrotated arc is most transparent where its sweep starts at 0. The arc's
/// rotation carries the gradient with it. The fill and mask layers only depend on size, color and gradation and are
/// kept between frames; the outline is rebuilt by the caller every frame.
pub struct GradientCompositor {
    color: Srgba<f64>,
    gradation: f64,
    layers: Option<Layers>,
}

impl GradientCompositor {
    pub fn new(color: Srgba<f64>, gradation: f64) -> Self {
        Self {
            color,
            gradation: clamp_unit(gradation),
            layers: None,
        }
    }

    pub fn color(&self) -> Srgba<f64> {
        self.color
    }

    pub fn set_color(&mut self, color: Srgba<f64>) {
        if self.color != color {
            self.color = color;
            self.layers = None;
        }
    }

    pub fn gradation(&self) -> f64 {
        self.gradation
    }

    pub fn set_gradation(&mut self, gradation: f64) {
        let gradation = clamp_unit(gradation);
        if self.gradation != gradation {
            self.gradation = gradation;
            self.layers = None;
        }
    }

    pub fn is_cached_for(&self, bounds: Size) -> bool {
        self.layers
            .as_ref()
            .is_some_and(|layers| layers.size == pixel_size(bounds))
    }

    pub fn render(&mut self, cr: &Context, path: &ArcPath, bounds: Size) -> Result<(), cairo::Error> {
        if bounds.is_empty() || path.is_empty() {
            return Ok(());
        }
        let layers = self.layers_for(bounds)?;

        cr.save()?;
        cr.set_operator(Operator::Over);
        path.append_to(cr);
        cr.clip();
        cr.set_source_surface(&layers.fill, 0.0, 0.0)?;
        cr.mask_surface(&layers.mask, 0.0, 0.0)?;
        cr.restore()
    }

    fn layers_for(&mut self, bounds: Size) -> Result<&Layers, cairo::Error> {
        let size = pixel_size(bounds);
        let layers = match self.layers.take() {
            Some(layers) if layers.size == size => layers,
            _ => {
                log::debug!("Rebuilding arc layers at {}x{}", size.0, size.1);
                Layers {
                    size,
                    fill: fill_layer(self.color, size)?,
                    mask: gradient_mask(self.gradation, size)?,
                }
            }
        };
        Ok(self.layers.insert(layers))
    }
}

fn pixel_size(bounds: Size) -> (i32, i32) {
    (bounds.width.ceil() as i32, bounds.height.ceil() as i32)
}

fn fill_layer(color: Srgba<f64>, (width, height): (i32, i32)) -> Result<ImageSurface, cairo::Error> {
    let surface = ImageSurface::create(Format::ARgb32, width, height)?;
    {
        let cr = Context::new(&surface)?;
        let (r, g, b, a) = color.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.paint()?;
    }
    Ok(surface)
}

fn gradient_mask(gradation: f64, (width, height): (i32, i32)) -> Result<ImageSurface, cairo::Error> {
    let surface = ImageSurface::create(Format::A8, width, height)?;
    {
        let cr = Context::new(&surface)?;
        let gradient = LinearGradient::new(0.0, 0.0, width as f64, 0.0);
        gradient.add_color_stop_rgba(0.0, 0.0, 0.0, 0.0, 1.0);
        gradient.add_color_stop_rgba(1.0, 0.0, 0.0, 0.0, 1.0 - gradation);
        cr.set_source(&gradient)?;
        cr.paint()?;
    }
    Ok(surface)
}
