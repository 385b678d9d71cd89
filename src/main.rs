mod app;
mod fileops;
mod models;
mod picker;
mod scanner;
mod ui;
mod video;

use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use app::ClipsortApp;
use models::SettingsStore;
use picker::RfdFolderPicker;
use ui::console::ConsoleFrontend;
use ui::controller::MainController;
use video::player::StubBackend;

fn main() -> Result<()> {
    // Log to stderr so the terminal frontend keeps stdout to itself.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clipsort=info".parse().unwrap()),
        )
        .init();

    // Optional launch argument: a video file or a directory to open.
    let launch_path = std::env::args_os().nth(1).map(PathBuf::from);

    let settings = match SettingsStore::open_default() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Falling back to in-memory settings: {e:#}");
            SettingsStore::open_in_memory()?
        }
    };

    let controller = MainController::new(
        settings,
        Box::new(RfdFolderPicker),
        Box::new(StubBackend),
    );
    let frontend = ConsoleFrontend::new()?;

    ClipsortApp::new(controller, Box::new(frontend)).run(launch_path.as_deref())
}
