mod app;
mod logging;
mod markdown_view;
mod pages;
mod theme;

use std::io::stdout;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use demanual_config::Config;

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut config = Config::load()?;
    // An optional page slug, e.g. `demanual blog`, overrides the start page.
    if let Some(page) = std::env::args().nth(1) {
        config.start_page = page.parse()?;
    }
    logging::init(&config.log_path())?;
    tracing::info!(
        posts_dir = %config.posts_dir.display(),
        start_page = %config.start_page,
        "starting"
    );

    let app = App::new(config)?;
    execute!(stdout(), EnableMouseCapture)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!(error = %e, "failed to release mouse capture");
    }
    ratatui::restore();
    result
}
