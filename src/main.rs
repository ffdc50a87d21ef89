mod app;
mod cast;
mod util;

use std::path::PathBuf;

use clap::Parser;

use app::{AppOptions, LayoutKind};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset to load instead of the bundled one.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Layout shown at startup.
    #[arg(long, value_enum, default_value_t = LayoutKind::Manual)]
    layout: LayoutKind,

    /// Pins the randomized layouts; each computation uses the next seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!(
        "starting with {} layout, dataset {}",
        args.layout,
        args.dataset
            .as_deref()
            .map_or_else(|| "<bundled>".to_owned(), |path| path.display().to_string())
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };
    let app_options = AppOptions {
        dataset: args.dataset,
        initial_layout: args.layout,
        seed: args.seed,
    };

    eframe::run_native(
        "cast-web",
        options,
        Box::new(move |cc| Ok(Box::new(app::CastWebApp::new(cc, app_options)))),
    )
}
