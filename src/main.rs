use anyhow::Context;
use eframe::egui;

use label_curator::app::CuratorApp;
use label_curator::config::CurateConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = CurateConfig::from_env().context("loading configuration")?;
    log::debug!("Using {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Label Curator – CSV Filter & Merger",
        options,
        Box::new(|_cc| Ok(Box::new(CuratorApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
