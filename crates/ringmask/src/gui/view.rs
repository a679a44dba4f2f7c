use crate::params::{RingKind, RingParameters};
use crate::ring::{HideOutcome, ProgressMask, SWEEP_INTERVAL, Size};
use glib::{ControlFlow, SourceId};
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Handles {
    tick: Option<gtk::TickCallbackId>,
    sweep: Option<SourceId>,
    container: Option<glib::WeakRef<gtk::Overlay>>,
}

struct Inner {
    model: RefCell<ProgressMask>,
    handles: RefCell<Handles>,
}

/// [`ProgressMask`] hosted in a [`gtk::DrawingArea`].
///
/// Angle interpolation and fading run on the widget's frame clock and stop as soon as
/// there is nothing left to animate. The activity sweep runs on a 10 Hz main loop timer.
/// gtk objects never leave the main thread, so neither does this view; work finished on
/// another thread has to be sent back to the main context before calling into it.
#[derive(Clone)]
pub struct ProgressMaskView {
    area: gtk::DrawingArea,
    inner: Rc<Inner>,
}

impl Default for ProgressMaskView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMaskView {
    pub fn new() -> Self {
        debug_assert!(
            gtk::is_initialized_main_thread(),
            "ProgressMaskView must be created on the gtk main thread"
        );

        let area = gtk::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.add_css_class("ringmask");

        let inner = Rc::new(Inner {
            model: RefCell::new(ProgressMask::new()),
            handles: RefCell::new(Handles::default()),
        });

        let draw_inner = inner.clone();
        area.set_draw_func(move |_, cr, width, height| {
            let size = Size::new(width as f64, height as f64);
            if let Err(e) = draw_inner
                .model
                .borrow_mut()
                .draw(cr, size, Instant::now())
            {
                log::error!("Drawing error: {}", e);
            }
        });

        Self { area, inner }
    }

    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    fn update(&self, f: impl FnOnce(&mut ProgressMask, Instant)) {
        f(&mut self.inner.model.borrow_mut(), Instant::now());
        self.area.queue_draw();
        ensure_ticking(&self.area, &self.inner);
        run_completions(&self.area, &self.inner);
    }

    pub fn is_attached(&self) -> bool {
        self.area.parent().is_some()
    }

    /// Places the indicator over everything else in `container`. After a hide that
    /// uninstalled it, the next `show` puts it back into the same container.
    pub fn attach_to(&self, container: &gtk::Overlay) {
        if self.is_attached() {
            log::warn!("Progress mask is already attached");
            return;
        }
        container.add_overlay(&self.area);
        self.inner.handles.borrow_mut().container = Some(container.downgrade());
    }

    fn reattach(&self) {
        if self.is_attached() {
            return;
        }
        let container = self
            .inner
            .handles
            .borrow()
            .container
            .as_ref()
            .and_then(|weak| weak.upgrade());
        match container {
            Some(container) => {
                log::debug!("Reinstalling progress mask");
                container.add_overlay(&self.area);
            }
            None => log::warn!("Progress mask has no container to return to"),
        }
    }

    pub fn set_title(&self, title: &str) {
        self.update(|model, _| model.set_title(title));
    }

    pub fn set_progress(&self, fraction: f64) {
        self.update(|model, _| model.set_progress(fraction));
    }

    pub fn set_rotation_period(&self, period: Duration) {
        self.update(|model, _| model.set_rotation_period(period));
    }

    pub fn set_ring_side(&self, side: f64) {
        self.update(|model, _| model.set_ring_side(side));
    }

    pub fn apply_parameters(&self, kind: RingKind, params: &RingParameters) {
        self.update(|model, _| model.apply_parameters(kind, params));
    }

    pub fn set_color1(&self, kind: RingKind, color: impl Into<Srgba<f64>>) {
        self.update(|model, _| model.set_color1(kind, color));
    }

    pub fn set_color2(&self, kind: RingKind, color: impl Into<Srgba<f64>>) {
        self.update(|model, _| model.set_color2(kind, color));
    }

    pub fn set_blend(&self, kind: RingKind, blend: f64) {
        self.update(|model, _| model.set_blend(kind, blend));
    }

    pub fn set_radius_ratio(&self, kind: RingKind, ratio: f64) {
        self.update(|model, _| model.set_radius_ratio(kind, ratio));
    }

    pub fn set_width_ratio(&self, kind: RingKind, ratio: f64) {
        self.update(|model, _| model.set_width_ratio(kind, ratio));
    }

    pub fn start_animation(&self) {
        self.update(|model, now| {
            model.start_animation(now);
        });
        ensure_sweeping(&self.area, &self.inner);
    }

    pub fn stop_animation(&self) {
        cancel_sweep(&self.inner);
        self.update(|model, now| {
            model.stop_animation(now);
        });
    }

    /// Fades in over `duration` and starts the activity animation. Puts the widget
    /// back if an earlier hide uninstalled it.
    pub fn show(&self, duration: Duration) {
        self.reattach();
        self.update(|model, now| model.show(duration, now));
        ensure_sweeping(&self.area, &self.inner);
    }

    /// Stops all animation and fades out over `duration`. `on_complete` always runs once:
    /// with [`HideOutcome::Finished`] after the fade, once the widget is detached if
    /// `uninstall` is set, or with [`HideOutcome::Interrupted`] when a later call
    /// takes over.
    pub fn hide(
        &self,
        duration: Duration,
        uninstall: bool,
        on_complete: impl FnOnce(HideOutcome) + 'static,
    ) {
        cancel_sweep(&self.inner);
        self.update(|model, now| {
            model.hide_and_notify(duration, now, uninstall, Some(Box::new(on_complete)))
        });
    }

    /// Cancels the frame callback and the sweep timer and detaches the widget.
    pub fn teardown(&self) {
        teardown(&self.area, &self.inner);
    }
}

fn ensure_ticking(area: &gtk::DrawingArea, inner: &Rc<Inner>) {
    if inner.handles.borrow().tick.is_some() || !inner.model.borrow().needs_frames() {
        return;
    }
    let tick_inner = inner.clone();
    let id = area.add_tick_callback(move |area, _clock| on_frame(area, &tick_inner));
    inner.handles.borrow_mut().tick = Some(id);
}

fn on_frame(area: &gtk::DrawingArea, inner: &Rc<Inner>) -> ControlFlow {
    inner.model.borrow_mut().advance(Instant::now());
    area.queue_draw();

    if run_completions(area, inner) {
        return ControlFlow::Break;
    }
    if inner.model.borrow().needs_frames() {
        return ControlFlow::Continue;
    }
    log::debug!("Progress mask idle, removing frame callback");
    inner.handles.borrow_mut().tick = None;
    ControlFlow::Break
}

/// Runs hide callbacks that became due. Returns `true` when the widget was detached,
/// in which case the frame callback is already forgotten.
fn run_completions(area: &gtk::DrawingArea, inner: &Rc<Inner>) -> bool {
    let due = inner.model.borrow_mut().take_completions();
    if due.is_empty() {
        return false;
    }
    let uninstall = due.uninstall();
    if uninstall {
        inner.handles.borrow_mut().tick = None;
        detach(area);
    }
    // callbacks may call back into the view
    due.run();
    uninstall
}

fn ensure_sweeping(area: &gtk::DrawingArea, inner: &Rc<Inner>) {
    if inner.handles.borrow().sweep.is_some() || !inner.model.borrow().is_animating() {
        return;
    }
    let weak_area = area.downgrade();
    let sweep_inner = inner.clone();
    let id = glib::timeout_add_local(SWEEP_INTERVAL, move || {
        let Some(area) = weak_area.upgrade() else {
            sweep_inner.handles.borrow_mut().sweep = None;
            return ControlFlow::Break;
        };
        if !sweep_inner.model.borrow().is_animating() {
            sweep_inner.handles.borrow_mut().sweep = None;
            return ControlFlow::Break;
        }
        sweep_inner.model.borrow_mut().sweep_tick();
        ensure_ticking(&area, &sweep_inner);
        ControlFlow::Continue
    });
    inner.handles.borrow_mut().sweep = Some(id);
}

fn cancel_sweep(inner: &Inner) {
    if let Some(id) = inner.handles.borrow_mut().sweep.take() {
        id.remove();
    }
}

fn teardown(area: &gtk::DrawingArea, inner: &Rc<Inner>) {
    cancel_sweep(inner);
    inner.model.borrow_mut().cancel(Instant::now());
    let tick = inner.handles.borrow_mut().tick.take();
    if let Some(id) = tick {
        id.remove();
    }
    detach(area);
    let due = inner.model.borrow_mut().take_completions();
    due.run();
}

fn detach(area: &gtk::DrawingArea) {
    let Some(parent) = area.parent() else {
        return;
    };
    match parent.downcast::<gtk::Overlay>() {
        Ok(overlay) => overlay.remove_overlay(area),
        Err(_) => area.unparent(),
    }
}
