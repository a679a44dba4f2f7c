use crate::config::Config;
use cairo::{Context, Format, ImageSurface};
use ringmask::ProgressMask;
use ringmask::RingKind;
use ringmask::ring::Size;
use std::path::Path;
use std::time::Instant;
use strum::IntoEnumIterator;

/// Upper bound on settle iterations; a full turn takes 180 ticks.
const MAX_SETTLE_FRAMES: usize = 1024;

pub struct SnapshotOptions<'a> {
    pub progress: f64,
    pub size: i32,
    pub title: Option<&'a str>,
}

/// Renders a settled, fully visible indicator without a window.
pub fn render(config: &Config, opts: &SnapshotOptions) -> anyhow::Result<ImageSurface> {
    let mut mask = ProgressMask::new();
    mask.set_title(opts.title.unwrap_or(&config.title));
    mask.set_ring_side(config.ring_side);
    for kind in RingKind::iter() {
        mask.apply_parameters(kind, config.parameters(kind));
    }
    mask.set_progress(opts.progress);

    let now = Instant::now();
    mask.show(std::time::Duration::ZERO, now);
    mask.stop_animation(now);
    for _ in 0..MAX_SETTLE_FRAMES {
        if !mask.needs_frames() {
            break;
        }
        mask.advance(now);
    }

    let surface = ImageSurface::create(Format::ARgb32, opts.size, opts.size)?;
    {
        let cr = Context::new(&surface)?;
        let side = f64::from(opts.size);
        mask.draw(&cr, Size::square(side), now)?;
    }
    Ok(surface)
}

pub fn write_png(config: &Config, opts: &SnapshotOptions, output: &Path) -> anyhow::Result<()> {
    let surface = render(config, opts)?;
    let mut file = fs_err::File::create(output)?;
    surface.write_to_png(&mut file)?;
    log::info!("Wrote snapshot to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(surface: &mut ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        let pixel = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (pixel >> 24) as u8
    }

    #[test]
    fn test_render_covers_the_surface() {
        let config = Config::default();
        let opts = SnapshotOptions {
            progress: 0.25,
            size: 160,
            title: Some(""),
        };
        let mut surface = render(&config, &opts).unwrap();
        assert_eq!(surface.width(), 160);
        // Backdrop is drawn everywhere, the corner only gets the backdrop.
        let corner = alpha_at(&mut surface, 0, 0);
        assert!((170..=190).contains(&corner), "corner alpha {corner}");
        let center = alpha_at(&mut surface, 80, 80);
        assert!(center >= corner);
    }

    #[test]
    fn test_render_rejects_bad_size() {
        let opts = SnapshotOptions {
            progress: 0.0,
            size: -4,
            title: Some(""),
        };
        assert!(render(&Config::default(), &opts).is_err());
    }
}
