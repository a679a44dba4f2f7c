mod config;
mod events;
mod gui;
mod snapshot;
mod sys;

use clap::{Parser, Subcommand};
use events::AppEvent;
use gui::app::AppModel;
use relm4::prelude::*;
use ringmask::{HexColor, RingKind, RingParameters};
use snapshot::SnapshotOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringmask-demo", version, about, long_about = None)]
struct Cli {
    /// Without a subcommand the demo window starts and listens for commands.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Fade the indicator in and start the activity animation
    Show,
    /// Fade the indicator out
    Hide,
    /// Fade the indicator out and remove it from the window until the next show
    Dismiss,
    /// Start the activity animation
    Start,
    /// Stop the activity animation
    Stop,
    /// Run a simulated job that fills the progress ring over ten seconds
    Simulate,
    /// Set the progress fraction, clamped to [0, 1]
    Progress { fraction: f64 },
    /// Set the title shown above the rings
    Title {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Replace the colors and geometry of one ring
    Params {
        kind: RingKind,
        color1: HexColor,
        color2: HexColor,
        blend: f64,
        radius_ratio: f64,
        width_ratio: f64,
    },
    /// Set one ring value: color1, color2, blend, radius or width
    Ring {
        kind: RingKind,
        field: String,
        value: String,
    },
    /// Ask the running demo to reload its config file
    Reload,
    /// Render the indicator to a PNG file without opening a window
    Snapshot {
        output: PathBuf,
        #[arg(short, long, default_value_t = 0.5)]
        progress: f64,
        #[arg(short, long, default_value_t = 240)]
        size: i32,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Write the default config file if none exists and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let event = match cli.command {
        None => {
            run_app();
            return Ok(());
        }
        Some(Commands::Snapshot {
            output,
            progress,
            size,
            title,
        }) => {
            let config = config::load_or_default();
            let opts = SnapshotOptions {
                progress,
                size,
                title: title.as_deref(),
            };
            return snapshot::write_png(&config, &opts, &output);
        }
        Some(Commands::InitConfig) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            return Ok(());
        }
        Some(Commands::Show) => AppEvent::Show,
        Some(Commands::Hide) => AppEvent::Hide,
        Some(Commands::Dismiss) => AppEvent::Dismiss,
        Some(Commands::Start) => AppEvent::Start,
        Some(Commands::Stop) => AppEvent::Stop,
        Some(Commands::Simulate) => AppEvent::Simulate,
        Some(Commands::Progress { fraction }) => AppEvent::Progress(fraction),
        Some(Commands::Title { text }) => AppEvent::Title(text.join(" ")),
        Some(Commands::Params {
            kind,
            color1,
            color2,
            blend,
            radius_ratio,
            width_ratio,
        }) => AppEvent::Params(
            kind,
            RingParameters::new(color1, color2, blend, radius_ratio, width_ratio),
        ),
        Some(Commands::Ring { kind, field, value }) => {
            format!("ring {} {} {}", kind, field, value).parse()?
        }
        Some(Commands::Reload) => AppEvent::ConfigReload,
    };

    sys::client::send_event(&event)
}

fn run_app() {
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    let services = sys::runtime::start_background_services(tx);

    let app = RelmApp::new("org.ringmask.demo");
    app.run::<AppModel>((config, rx));

    services.stop();
}
