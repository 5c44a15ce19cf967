mod bootstrap;
mod menu;
mod report;
mod sections;

use std::io;

use anyhow::Result;
use catalog_charts::PlottersRenderer;
use catalog_core::settings::Settings;
use catalog_data::reader::load_catalog;

use crate::menu::MenuController;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Book Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Dataset: {}, View: {}, Output: {}",
        settings.dataset.display(),
        settings.view,
        settings.output_dir.display()
    );

    let catalog = load_catalog(&settings.dataset)?;

    match settings.view.as_str() {
        "menu" => {
            let renderer = PlottersRenderer::new(&settings.output_dir)?;
            let stdin = io::stdin();
            let mut menu = MenuController::new(
                &catalog,
                renderer,
                stdin.lock(),
                io::stdout(),
                settings.top_authors,
            );
            menu.run()?;
        }

        "report" => {
            report::write_report(
                &catalog,
                settings.top_authors,
                &settings.format,
                io::stdout().lock(),
            )?;
        }

        unknown => anyhow::bail!("Unknown view mode: {}", unknown),
    }

    Ok(())
}
