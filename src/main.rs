mod app;
mod config;
mod dataset;

use std::fs;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use tracing_subscriber::EnvFilter;

use config::{AppConfig, Args};

const GLYPH_FONT: &str = "glyph-font";

fn glyph_fonts(bytes: Vec<u8>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(GLYPH_FONT.to_owned(), Arc::new(FontData::from_owned(bytes)));
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, GLYPH_FONT.to_owned());
    fonts
        .families
        .entry(FontFamily::Monospace)
        .or_default()
        .push(GLYPH_FONT.to_owned());
    fonts
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = AppConfig::from_args(&args);

    let glyph_font = args
        .glyph_font
        .as_deref()
        .map(|path| {
            fs::read(path).with_context(|| format!("reading glyph font {}", path.display()))
        })
        .transpose()?;

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Kanji Scatter")
        .with_inner_size([1440.0, 920.0]);
    if args.fullscreen {
        viewport = viewport.with_fullscreen(true);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!(
        metrics = %config.metrics_path.display(),
        relationships = %config.relationships_path.display(),
        presets = config.presets.len(),
        "starting"
    );

    eframe::run_native(
        "kanji-scatter",
        options,
        Box::new(move |cc| {
            if let Some(bytes) = glyph_font {
                cc.egui_ctx.set_fonts(glyph_fonts(bytes));
            }
            Ok(Box::new(app::KanjiScatterApp::new(cc, config)))
        }),
    )
    .map_err(|error| anyhow::anyhow!("eframe failed: {error}"))
}
