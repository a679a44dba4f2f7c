use crate::config::{self, Config};
use crate::events::{AppEvent, RingSetting};
use glib::{ControlFlow, SourceId};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringmask::{HideOutcome, ProgressMaskView, RingKind, RingParameters};
use std::time::Duration;
use strum::IntoEnumIterator;

const JOB_INTERVAL: Duration = Duration::from_millis(100);
const JOB_STEP: f64 = 0.01;

pub struct AppModel {
    pub mask: ProgressMaskView,
    pub config: Config,
    job: Option<SourceId>,
    job_progress: f64,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Dismiss,
    Start,
    Stop,
    Simulate,
    JobTick,
    Progress(f64),
    Title(String),
    Params(RingKind, RingParameters),
    Ring(RingKind, RingSetting),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Dismiss => AppMsg::Dismiss,
            AppEvent::Start => AppMsg::Start,
            AppEvent::Stop => AppMsg::Stop,
            AppEvent::Simulate => AppMsg::Simulate,
            AppEvent::Progress(p) => AppMsg::Progress(p),
            AppEvent::Title(t) => AppMsg::Title(t),
            AppEvent::Params(kind, p) => AppMsg::Params(kind, p),
            AppEvent::Ring(kind, setting) => AppMsg::Ring(kind, setting),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("ringmask"),
            set_default_size: (480, 360),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::space => {
                            sender.input(AppMsg::Simulate);
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::Escape => {
                            sender.input(AppMsg::Dismiss);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[wrap(Some)]
                set_child = &gtk::Label {
                    set_label: "Space runs a simulated job. Escape dismisses the indicator.",
                    set_wrap: true,
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        let model = AppModel {
            mask: ProgressMaskView::new(),
            config,
            job: None,
            job_progress: 0.0,
        };

        let widgets = view_output!();

        model.apply_config();
        model.mask.attach_to(&widgets.overlay);
        model.mask.show(model.config.fade_duration());

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => self.mask.show(self.config.fade_duration()),
            AppMsg::Hide => {
                self.stop_job();
                self.mask
                    .hide(self.config.fade_duration(), false, log_hide("Indicator hidden"));
            }
            AppMsg::Dismiss => {
                self.stop_job();
                self.mask.hide(
                    self.config.fade_duration(),
                    true,
                    log_hide("Indicator dismissed"),
                );
            }
            AppMsg::Start => self.mask.start_animation(),
            AppMsg::Stop => self.mask.stop_animation(),
            AppMsg::Simulate => self.start_job(&sender),
            AppMsg::JobTick => self.advance_job(),
            AppMsg::Progress(p) => self.mask.set_progress(p),
            AppMsg::Title(t) => self.mask.set_title(&t),
            AppMsg::Params(kind, p) => self.mask.apply_parameters(kind, &p),
            AppMsg::Ring(kind, setting) => match setting {
                RingSetting::Color1(c) => self.mask.set_color1(kind, c),
                RingSetting::Color2(c) => self.mask.set_color2(kind, c),
                RingSetting::Blend(v) => self.mask.set_blend(kind, v),
                RingSetting::Radius(v) => self.mask.set_radius_ratio(kind, v),
                RingSetting::Width(v) => self.mask.set_width_ratio(kind, v),
            },
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.config = new_config;
                    self.apply_config();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn apply_config(&self) {
        self.mask.set_title(&self.config.title);
        self.mask.set_ring_side(self.config.ring_side);
        self.mask
            .set_rotation_period(self.config.rotation_period());
        for kind in RingKind::iter() {
            self.mask
                .apply_parameters(kind, self.config.parameters(kind));
        }
    }

    fn start_job(&mut self, sender: &ComponentSender<Self>) {
        if self.job.is_some() {
            log::warn!("Simulated job already running");
            return;
        }
        log::info!("Starting simulated job");
        self.job_progress = 0.0;
        self.mask.set_progress(0.0);
        self.mask.show(self.config.fade_duration());

        let sender = sender.clone();
        self.job = Some(glib::timeout_add_local(JOB_INTERVAL, move || {
            sender.input(AppMsg::JobTick);
            ControlFlow::Continue
        }));
    }

    fn advance_job(&mut self) {
        if self.job.is_none() {
            return;
        }
        self.job_progress = (self.job_progress + JOB_STEP).min(1.0);
        self.mask.set_progress(self.job_progress);

        if self.job_progress >= 1.0 {
            self.stop_job();
            // the next job reinstalls the widget
            self.mask.hide(
                self.config.fade_duration(),
                true,
                log_hide("Simulated job finished"),
            );
        }
    }

    fn stop_job(&mut self) {
        if let Some(id) = self.job.take() {
            id.remove();
        }
    }
}

fn log_hide(what: &'static str) -> impl FnOnce(HideOutcome) + 'static {
    move |outcome| match outcome {
        HideOutcome::Finished => log::info!("{}", what),
        HideOutcome::Interrupted => log::debug!("{}: fade out interrupted", what),
    }
}
