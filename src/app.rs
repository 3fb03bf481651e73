use gtk4::prelude::*;
use gtk4::{gio, Application};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::scanner::default_screenshot_dir;
use crate::ui::MainWindow;

const APP_ID: &str = "io.github.shotview.Screenshots";

pub struct ShotviewApp {
    app: Application,
}

impl ShotviewApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn load_config() -> Config {
        match Config::load_default() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = ?err, "Failed to load config, using defaults");
                Config::empty()
            }
        }
    }

    fn open_window(app: &Application, screenshot_dir: &Path) {
        info!("Showing screenshots from {}", screenshot_dir.display());
        let window = MainWindow::new(app, screenshot_dir, Self::load_config());
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }

    fn on_activate(app: &Application) {
        Self::open_window(app, &default_screenshot_dir());
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let dir: PathBuf = files
            .first()
            .and_then(|f| f.path())
            .unwrap_or_else(default_screenshot_dir);
        Self::open_window(app, &dir);
    }
}

impl Default for ShotviewApp {
    fn default() -> Self {
        Self::new()
    }
}
