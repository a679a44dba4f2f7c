use super::geometry::{Rect, Size};
use super::oscillator::SweepOscillator;
use super::two_tone::TwoToneArc;
use crate::params::{RingKind, RingParameters};
use cairo::Context;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::time::{Duration, Instant};

pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(3);
pub const DEFAULT_ZERO_OFFSET: f64 = -FRAC_PI_2;
pub const ACTIVITY_SWEEP: f64 = PI / 2.0;

const PANEL_MARGIN: f64 = 8.0;
const RING_INSET: f64 = 16.0;
const CORNER_RADIUS: f64 = 32.0;
const DEFAULT_RING_SIDE: f64 = 100.0;
const TITLE_FONT_SIZE: f64 = 17.0;

#[derive(Debug, Clone, PartialEq, Eq, Default, Display, Deref, From, Into, AsRef)]
pub struct Title(String);

crate::impl_string_newtype!(Title);

pub struct Palette {
    pub backdrop: Srgba<f64>,
    pub panel: Srgba<f64>,
    pub title: Srgba<f64>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            backdrop: Srgba::new(0.0, 0.0, 0.0, 0.7),
            panel: Srgba::new(0.6, 0.6, 0.6, 0.9),
            title: Srgba::new(0.1, 0.1, 0.1, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeEnd {
    Shown,
    Hidden,
}

/// How a hide request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    /// The fade out ran to the end.
    Finished,
    /// A later `show`, `hide` or `cancel` took over before the fade ended.
    Interrupted,
}

pub type HideCallback = Box<dyn FnOnce(HideOutcome)>;

struct PendingHide {
    uninstall: bool,
    on_complete: Option<HideCallback>,
}

/// Hide callbacks that are due, plus whether the host should detach the widget.
///
/// The model never calls back into the host itself. Hosts take these with
/// [`ProgressMask::take_completions`] once they no longer hold the model.
#[must_use]
#[derive(Default)]
pub struct Completions {
    uninstall: bool,
    callbacks: Vec<(HideCallback, HideOutcome)>,
}

impl Completions {
    pub fn is_empty(&self) -> bool {
        !self.uninstall && self.callbacks.is_empty()
    }

    pub fn uninstall(&self) -> bool {
        self.uninstall
    }

    pub fn run(self) {
        for (callback, outcome) in self.callbacks {
            callback(outcome);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    since: Instant,
    duration: Duration,
}

impl Fade {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (now.saturating_duration_since(self.since).as_secs_f64() / self.duration.as_secs_f64())
            .min(1.0)
    }

    fn opacity(&self, now: Instant) -> f64 {
        self.from + (self.to - self.from) * self.progress(now)
    }

    fn end(&self) -> FadeEnd {
        if self.to > 0.0 {
            FadeEnd::Shown
        } else {
            FadeEnd::Hidden
        }
    }
}

/// Where the panel and the rings go inside the host area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub rings: Rect,
}

/// Progress and activity indicator: a dimmed backdrop, a rounded panel, a progress ring
/// driven by [`ProgressMask::set_progress`], an activity ring driven by the sweep
/// oscillator, and a title.
///
/// All methods must be called from the thread that owns the UI. Time is passed in
/// explicitly; the host is expected to call [`ProgressMask::advance`] every frame while
/// [`ProgressMask::needs_frames`] holds and [`ProgressMask::sweep_tick`] at
/// [`super::SWEEP_INTERVAL`] while [`ProgressMask::is_animating`] holds.
pub struct ProgressMask {
    title: Title,
    progress: f64,
    zero_offset: f64,
    progress_ring: TwoToneArc,
    activity_ring: TwoToneArc,
    oscillator: SweepOscillator,
    sweeping: bool,
    rotation_period: Duration,
    ring_side: f64,
    palette: Palette,
    opacity: f64,
    fade: Option<Fade>,
    pending_hide: Option<PendingHide>,
    completions: Completions,
}

impl Default for ProgressMask {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMask {
    pub fn new() -> Self {
        let mut progress_ring =
            TwoToneArc::from_parameters(&RingKind::Progress.default_parameters());
        progress_ring.set_initial_angles(DEFAULT_ZERO_OFFSET, DEFAULT_ZERO_OFFSET);

        let mut activity_ring =
            TwoToneArc::from_parameters(&RingKind::Activity.default_parameters());
        activity_ring.set_initial_angles(0.0, ACTIVITY_SWEEP);

        Self {
            title: Title::default(),
            progress: 0.0,
            zero_offset: DEFAULT_ZERO_OFFSET,
            progress_ring,
            activity_ring,
            oscillator: SweepOscillator::default(),
            sweeping: false,
            rotation_period: DEFAULT_ROTATION_PERIOD,
            ring_side: DEFAULT_RING_SIDE,
            palette: Palette::default(),
            opacity: 0.0,
            fade: None,
            pending_hide: None,
            completions: Completions::default(),
        }
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Title::new(title);
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Sets the completed fraction, clamped into `[0, 1]`.
    pub fn set_progress(&mut self, fraction: f64) {
        self.progress = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.progress_ring
            .set_end_angle(self.zero_offset + TAU * self.progress);
    }

    pub fn zero_offset(&self) -> f64 {
        self.zero_offset
    }

    pub fn set_zero_offset(&mut self, offset: f64) {
        self.zero_offset = offset;
        self.progress_ring.set_initial_angles(
            offset,
            offset + TAU * self.progress,
        );
    }

    pub fn ring(&self, kind: RingKind) -> &TwoToneArc {
        match kind {
            RingKind::Progress => &self.progress_ring,
            RingKind::Activity => &self.activity_ring,
        }
    }

    fn ring_mut(&mut self, kind: RingKind) -> &mut TwoToneArc {
        match kind {
            RingKind::Progress => &mut self.progress_ring,
            RingKind::Activity => &mut self.activity_ring,
        }
    }

    pub fn parameters(&self, kind: RingKind) -> RingParameters {
        self.ring(kind).parameters()
    }

    pub fn apply_parameters(&mut self, kind: RingKind, params: &RingParameters) {
        self.ring_mut(kind).apply_parameters(params);
    }

    pub fn set_color1(&mut self, kind: RingKind, color: impl Into<Srgba<f64>>) {
        self.ring_mut(kind).set_color1(color.into());
    }

    pub fn set_color2(&mut self, kind: RingKind, color: impl Into<Srgba<f64>>) {
        self.ring_mut(kind).set_color2(color.into());
    }

    /// Depth of the alpha falloff along the ring, clamped into `[0, 1]`.
    pub fn set_blend(&mut self, kind: RingKind, blend: f64) {
        self.ring_mut(kind).set_gradation(blend);
    }

    pub fn set_radius_ratio(&mut self, kind: RingKind, ratio: f64) {
        self.ring_mut(kind).set_radius_ratio(ratio);
    }

    pub fn set_width_ratio(&mut self, kind: RingKind, ratio: f64) {
        self.ring_mut(kind).set_line_width_ratio(ratio);
    }

    /// Sweep of the progress ring the caller asked for.
    pub fn progress_sweep(&self) -> f64 {
        self.progress_ring.target_angles().sweep()
    }

    pub fn rotation_period(&self) -> Duration {
        self.rotation_period
    }

    pub fn set_rotation_period(&mut self, period: Duration) {
        self.rotation_period = period;
    }

    pub fn set_ring_side(&mut self, side: f64) {
        self.ring_side = side.max(0.0);
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_animating(&self) -> bool {
        self.sweeping
    }

    /// Starts the activity rotation and sweep. Returns `false` when already running.
    pub fn start_animation(&mut self, now: Instant) -> bool {
        if self.sweeping {
            return false;
        }
        log::debug!("Starting activity animation");
        self.sweeping = true;
        self.activity_ring.start_rotation(self.rotation_period, now);
        true
    }

    /// Freezes the activity ring where it is. Returns `false` when not running.
    pub fn stop_animation(&mut self, now: Instant) -> bool {
        if !self.sweeping {
            return false;
        }
        log::debug!("Stopping activity animation");
        self.sweeping = false;
        self.activity_ring.stop_rotation(now);
        true
    }

    /// One oscillator step for the activity ring.
    pub fn sweep_tick(&mut self) {
        if !self.sweeping {
            return;
        }
        let next = self.oscillator.tick(self.activity_ring.target_angles());
        self.activity_ring.set_angles(next);
        self.activity_ring.wrap();
    }

    /// Fades in from the current opacity and starts the activity animation.
    /// A hide still in progress is reported as interrupted.
    pub fn show(&mut self, duration: Duration, now: Instant) {
        self.interrupt_hide();
        if self.opacity < 1.0 || self.fade.is_some() {
            self.fade = Some(Fade {
                from: self.opacity,
                to: 1.0,
                since: now,
                duration,
            });
        }
        self.start_animation(now);
    }

    /// Stops animation right away and fades out over `duration`.
    pub fn hide(&mut self, duration: Duration, now: Instant) {
        self.hide_and_notify(duration, now, false, None);
    }

    /// Like [`ProgressMask::hide`]. Once the fade ends, `on_complete` becomes due
    /// and, with `uninstall`, the host is asked to detach the widget.
    pub fn hide_and_notify(
        &mut self,
        duration: Duration,
        now: Instant,
        uninstall: bool,
        on_complete: Option<HideCallback>,
    ) {
        self.interrupt_hide();
        self.stop_animation(now);
        self.fade = Some(Fade {
            from: self.opacity,
            to: 0.0,
            since: now,
            duration,
        });
        self.pending_hide = Some(PendingHide {
            uninstall,
            on_complete,
        });
    }

    /// Stops animation and fading where they are.
    pub fn cancel(&mut self, now: Instant) {
        self.stop_animation(now);
        self.fade = None;
        self.interrupt_hide();
    }

    fn interrupt_hide(&mut self) {
        if let Some(pending) = self.pending_hide.take() {
            log::debug!("Hide interrupted");
            if let Some(callback) = pending.on_complete {
                self.completions
                    .callbacks
                    .push((callback, HideOutcome::Interrupted));
            }
        }
    }

    fn finish_hide(&mut self) {
        if let Some(pending) = self.pending_hide.take() {
            self.completions.uninstall |= pending.uninstall;
            if let Some(callback) = pending.on_complete {
                self.completions
                    .callbacks
                    .push((callback, HideOutcome::Finished));
            }
        }
    }

    /// Drains the callbacks that became due since the last call.
    pub fn take_completions(&mut self) -> Completions {
        std::mem::take(&mut self.completions)
    }

    pub fn needs_frames(&self) -> bool {
        self.fade.is_some()
            || self.sweeping
            || !self.progress_ring.is_settled()
            || !self.activity_ring.is_settled()
    }

    /// Advances angle interpolation and fading. Returns how a fade ended, if one did.
    pub fn advance(&mut self, now: Instant) -> Option<FadeEnd> {
        self.progress_ring.tick();
        self.activity_ring.tick();

        let fade = self.fade?;
        self.opacity = fade.opacity(now);
        if fade.progress(now) < 1.0 {
            return None;
        }
        self.opacity = fade.to;
        self.fade = None;
        let end = fade.end();
        if end == FadeEnd::Hidden {
            self.finish_hide();
        }
        Some(end)
    }

    pub fn layout(&self, area: Size) -> PanelLayout {
        let available = (area.min_side() - 2.0 * PANEL_MARGIN).max(0.0);
        let panel_side = (self.ring_side + 2.0 * RING_INSET).min(available);
        let panel = Rect::centered(area.center(), Size::square(panel_side));
        let ring_side = (panel_side - 2.0 * RING_INSET).max(0.0);
        PanelLayout {
            panel,
            rings: Rect::centered(area.center(), Size::square(ring_side)),
        }
    }

    pub fn draw(&mut self, cr: &Context, area: Size, now: Instant) -> Result<(), cairo::Error> {
        if area.is_empty() || self.opacity <= 0.0 {
            return Ok(());
        }
        let layout = self.layout(area);

        cr.save()?;
        cr.push_group();
        self.draw_backdrop(cr, area, &layout)?;

        cr.save()?;
        cr.translate(layout.rings.x, layout.rings.y);
        self.activity_ring.draw(cr, layout.rings.size(), now)?;
        self.progress_ring.draw(cr, layout.rings.size(), now)?;
        cr.restore()?;

        self.draw_title(cr, &layout)?;
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.opacity)?;
        cr.restore()
    }

    fn draw_backdrop(&self, cr: &Context, area: Size, layout: &PanelLayout) -> Result<(), cairo::Error> {
        let (r, g, b, a) = self.palette.backdrop.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.rectangle(0.0, 0.0, area.width, area.height);
        cr.fill()?;

        let (r, g, b, a) = self.palette.panel.into_components();
        cr.set_source_rgba(r, g, b, a);
        rounded_rect(cr, &layout.panel, CORNER_RADIUS);
        cr.fill()
    }

    fn draw_title(&self, cr: &Context, layout: &PanelLayout) -> Result<(), cairo::Error> {
        if self.title.is_empty() {
            return Ok(());
        }
        let (r, g, b, a) = self.palette.title.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(TITLE_FONT_SIZE);
        if let Ok(ext) = cr.text_extents(self.title.as_str()) {
            let center = layout.panel.center();
            cr.move_to(
                center.x - ext.width() / 2.0 - ext.x_bearing(),
                center.y + ext.height() / 2.0,
            );
            cr.show_text(self.title.as_str())?;
        }
        Ok(())
    }
}

fn rounded_rect(cr: &Context, rect: &Rect, radius: f64) {
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);

    cr.new_sub_path();
    cr.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    cr.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    cr.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    cr.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    cr.close_path();
}
