use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, FontId, Pos2, Rect};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{AppConfig, Settings};
use crate::dataset::{
    MetricBatch, MetricStore, RelationshipGraph, load_metric_batch, load_metric_store,
    load_relationships, preset_metrics_path,
};

mod axes;
mod frame;
mod graph;
mod idle;
mod input;
mod layout;
mod motion;
mod render_utils;
mod scatter;
mod scene;
mod selection;
mod ui;

use graph::GlyphCache;
use idle::IdleAutoSwitchTimer;
use scatter::Scatter;
use selection::Selection;
use ui::ControlPanel;

const UI_FONT_SIZE: f32 = 16.0;

pub struct KanjiScatterApp {
    config: AppConfig,
    state: AppState,
    preset_loader: PresetLoader,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedDataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadedDataset {
    store: MetricStore,
    relations: RelationshipGraph,
}

struct PresetReload {
    preset: usize,
    result: Result<MetricBatch, String>,
}

/// At most one preset reload runs at a time. A request made meanwhile is
/// remembered, and only the latest one is kept.
#[derive(Default)]
struct PresetLoader {
    rx: Option<Receiver<PresetReload>>,
    in_flight: Option<usize>,
    queued: Option<usize>,
}

impl PresetLoader {
    fn request(&mut self, config: &AppConfig, preset: usize) {
        if self.in_flight == Some(preset) {
            self.queued = None;
            return;
        }
        if self.rx.is_some() {
            tracing::debug!(preset, in_flight = ?self.in_flight, "preset reload busy, queueing request");
            self.queued = Some(preset);
            return;
        }

        tracing::debug!(preset, "loading dataset preset");
        self.in_flight = Some(preset);
        self.rx = Some(spawn_preset_reload(config, preset));
    }

    fn poll(&mut self) -> Option<PresetReload> {
        let rx = self.rx.take()?;
        match rx.try_recv() {
            Ok(reload) => {
                self.in_flight = None;
                Some(reload)
            }
            Err(TryRecvError::Empty) => {
                self.rx = Some(rx);
                None
            }
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("preset reload worker disconnected");
                self.in_flight = None;
                None
            }
        }
    }

    fn take_queued(&mut self) -> Option<usize> {
        if self.rx.is_some() {
            return None;
        }
        self.queued.take()
    }
}

struct ViewModel {
    settings: Settings,
    presets: Vec<String>,
    scatter: Scatter,
    panel: ControlPanel,
    selection: Selection,
    idle: IdleAutoSwitchTimer,
    glyphs: GlyphCache,
    rng: StdRng,
    ui_font: FontId,
    pointer: Option<Pos2>,
    hovered: Option<usize>,
    active_preset: usize,
}

impl ViewModel {
    fn new(dataset: LoadedDataset, config: &AppConfig, now: f64) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let settings = config.settings.clone();
        let scatter = Scatter::new(
            dataset.store,
            dataset.relations,
            &settings,
            Rect::ZERO,
            &mut rng,
        );
        let idle = IdleAutoSwitchTimer::new(&settings, now, &mut rng);

        Self {
            panel: ControlPanel::new(config.presets.len(), &settings),
            presets: config.presets.clone(),
            scatter,
            selection: Selection::default(),
            idle,
            glyphs: GlyphCache::new(settings.glyph_height),
            rng,
            ui_font: FontId::proportional(UI_FONT_SIZE),
            pointer: None,
            hovered: None,
            active_preset: 0,
            settings,
        }
    }

    fn apply_reload(&mut self, reload: PresetReload) {
        let label = self.presets.get(reload.preset).map_or("?", String::as_str);
        let batch = match reload.result {
            Ok(batch) => batch,
            Err(error) => {
                tracing::warn!(preset = label, %error, "preset reload failed, keeping current dataset");
                return;
            }
        };

        match self.scatter.reload(batch, &self.settings.volatile_metrics) {
            Ok(summary) => {
                tracing::info!(
                    preset = label,
                    updated = summary.updated,
                    untouched = summary.untouched,
                    unknown = summary.unknown,
                    "switched dataset preset"
                );
                self.active_preset = reload.preset;
                self.glyphs.reset();
            }
            Err(error) => {
                tracing::warn!(preset = label, %error, "preset dataset rejected, keeping current dataset");
            }
        }
    }
}

impl KanjiScatterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(config.clone());
        Self {
            config,
            state,
            preset_loader: PresetLoader::default(),
        }
    }

    fn spawn_load(config: AppConfig) -> Receiver<Result<LoadedDataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&config).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: AppConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config),
        }
    }
}

fn spawn_preset_reload(config: &AppConfig, preset: usize) -> Receiver<PresetReload> {
    let (tx, rx) = mpsc::channel();
    let path = config
        .presets
        .get(preset)
        .map(|label| preset_metrics_path(&config.metrics_path, label))
        .unwrap_or_else(|| config.metrics_path.clone());

    thread::spawn(move || {
        let result = load_metric_batch(&path)
            .with_context(|| format!("loading preset metrics from {}", path.display()))
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(PresetReload { preset, result });
    });

    rx
}

fn load_dataset(config: &AppConfig) -> anyhow::Result<LoadedDataset> {
    let metrics_path = match config.presets.first() {
        Some(label) => preset_metrics_path(&config.metrics_path, label),
        None => config.metrics_path.clone(),
    };
    let store = load_metric_store(&metrics_path, config.settings.range_epsilon)
        .with_context(|| format!("loading metrics from {}", metrics_path.display()))?;

    let relations = match load_relationships(&config.relationships_path) {
        Ok(relations) if relations.is_empty() => {
            tracing::warn!("relationship data has no entries");
            relations
        }
        Ok(relations) => relations,
        Err(error) => {
            tracing::warn!(%error, "relationship data unavailable, continuing without links");
            RelationshipGraph::default()
        }
    };

    Ok(LoadedDataset { store, relations })
}

impl eframe::App for KanjiScatterApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(dataset)) => {
                        let now = ctx.input(|input| input.time);
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            dataset,
                            &self.config,
                            now,
                        ))));
                    }
                    Ok(Err(error)) => {
                        tracing::error!(%error, "failed to load dataset");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading kanji metrics...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load kanji metrics");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                if let Some(reload) = self.preset_loader.poll() {
                    model.apply_reload(reload);
                }
                if let Some(preset) = self.preset_loader.take_queued()
                    && preset != model.active_preset
                {
                    self.preset_loader.request(&self.config, preset);
                }

                if let Some(preset) = model.show(ctx) {
                    self.preset_loader.request(&self.config, preset);
                }
            }
        }

        if let Some(next_state) = transition {
            self.preset_loader = PresetLoader::default();
            self.state = next_state;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::dataset::{metric_batch, sample_store};

    pub(crate) fn config(metrics_path: PathBuf) -> AppConfig {
        AppConfig {
            relationships_path: metrics_path.with_file_name("histogram_data.js"),
            metrics_path,
            presets: ["Hiragino", "Ryumin", "Reisho"].map(str::to_string).to_vec(),
            seed: Some(11),
            settings: Settings::default(),
        }
    }

    pub(crate) fn view_model() -> ViewModel {
        let dataset = LoadedDataset {
            store: sample_store(),
            relations: RelationshipGraph::default(),
        };
        ViewModel::new(dataset, &config(PathBuf::from("kanji_metrics.json")), 0.0)
    }

    fn wait_for_reload(loader: &mut PresetLoader) -> PresetReload {
        for _ in 0..5000 {
            if let Some(reload) = loader.poll() {
                return reload;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("preset reload never finished");
    }

    #[test]
    fn accepted_reload_switches_active_preset() {
        let mut model = view_model();
        model.apply_reload(PresetReload {
            preset: 2,
            result: Ok(metric_batch(
                "日",
                &[("density", 0.9), ("skeleton_length", 50.0), ("holes", 1.0)],
            )),
        });
        assert_eq!(model.active_preset, 2);
        let store = model.scatter.store();
        let density = store.find_key("density").unwrap();
        assert_eq!(store.symbols()[2].value(density), 0.9);
    }

    #[test]
    fn failed_or_rejected_reload_keeps_active_preset() {
        let mut model = view_model();
        model.apply_reload(PresetReload {
            preset: 1,
            result: Err("missing file".to_string()),
        });
        assert_eq!(model.active_preset, 0);

        model.apply_reload(PresetReload {
            preset: 1,
            result: Ok(metric_batch("日", &[("density", 0.9)])),
        });
        assert_eq!(model.active_preset, 0);
    }

    #[test]
    fn request_during_reload_is_queued_and_latest_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("kanji_metrics.json"));
        let mut loader = PresetLoader::default();

        loader.request(&config, 1);
        loader.request(&config, 2);
        loader.request(&config, 0);
        assert_eq!(loader.queued, Some(0));
        assert_eq!(loader.take_queued(), None);

        let reload = wait_for_reload(&mut loader);
        assert_eq!(reload.preset, 1);
        assert!(reload.result.is_err());
        assert_eq!(loader.take_queued(), Some(0));
        assert_eq!(loader.take_queued(), None);
    }

    #[test]
    fn re_requesting_the_running_preset_drops_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("kanji_metrics.json"));
        let mut loader = PresetLoader::default();

        loader.request(&config, 1);
        loader.request(&config, 2);
        loader.request(&config, 1);
        assert_eq!(loader.queued, None);
        assert_eq!(loader.in_flight, Some(1));

        wait_for_reload(&mut loader);
        assert_eq!(loader.in_flight, None);
        assert_eq!(loader.take_queued(), None);
    }
}
