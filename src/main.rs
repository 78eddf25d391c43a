mod app;
mod onet;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the occupation similarity dataset (JSON).
    #[arg(long, default_value = "data/occupation-neighbors.json")]
    dataset: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "O*NET Neighbors",
        options,
        Box::new(move |cc| Ok(Box::new(app::NeighborsApp::new(cc, args.dataset.clone())))),
    )
}
