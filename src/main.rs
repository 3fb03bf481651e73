mod app;
mod config;
mod image_loader;
mod layout;
mod models;
mod scanner;
mod ui;

use app::ShotviewApp;
use tracing_subscriber::EnvFilter;

fn main() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "shotview=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = ShotviewApp::new();
    std::process::exit(app.run());
}
