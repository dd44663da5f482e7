use std::path::PathBuf;

use clap::Parser;

const DEFAULT_PRESETS: [&str; 6] = ["Hiragino", "Kizahashi", "Ryumin", "A1Mincho", "Haruhi", "Reisho"];

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Metric dataset (JSON array of `{char, metrics}` records).
    #[arg(long, default_value = "kanji_metrics.json")]
    pub metrics: PathBuf,

    /// Parent/child relationship dataset.
    #[arg(long, default_value = "histogram_data.js")]
    pub relationships: PathBuf,

    /// Dataset preset label; repeat to build the preset grid.
    #[arg(long = "preset")]
    pub presets: Vec<String>,

    /// Font file registered with egui so glyphs can be rendered.
    #[arg(long)]
    pub glyph_font: Option<PathBuf>,

    #[arg(long)]
    pub fullscreen: bool,

    #[arg(long, default_value_t = 10.0)]
    pub idle_timeout_secs: f64,

    /// Seed for initial placement and idle axis switching.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub margin: f32,
    pub damping: f32,
    pub range_epsilon: f64,
    pub glyph_height: f32,
    pub initial_spread: f32,
    pub idle_timeout_secs: f64,
    pub auto_switch_ms: (u32, u32),
    pub duplicate_commit_secs: f64,
    pub ghost_composition_secs: f64,
    pub volatile_metrics: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            margin: 60.0,
            damping: 0.08,
            range_epsilon: 0.001,
            glyph_height: 24.0,
            initial_spread: 1000.0,
            idle_timeout_secs: 10.0,
            auto_switch_ms: (350, 800),
            duplicate_commit_secs: 0.050,
            ghost_composition_secs: 0.100,
            volatile_metrics: ["density", "cog_x", "cog_y"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub metrics_path: PathBuf,
    pub relationships_path: PathBuf,
    pub presets: Vec<String>,
    pub seed: Option<u64>,
    pub settings: Settings,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let presets = if args.presets.is_empty() {
            DEFAULT_PRESETS.iter().map(|label| label.to_string()).collect()
        } else {
            args.presets.clone()
        };

        let settings = Settings {
            idle_timeout_secs: args.idle_timeout_secs.max(0.0),
            ..Settings::default()
        };

        Self {
            metrics_path: args.metrics.clone(),
            relationships_path: args.relationships.clone(),
            presets,
            seed: args.seed,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presets_apply_when_none_given() {
        let args = Args::parse_from(["kanji-scatter"]);
        let config = AppConfig::from_args(&args);
        assert_eq!(config.presets.len(), DEFAULT_PRESETS.len());
        assert_eq!(config.presets[0], "Hiragino");
        assert_eq!(config.settings.idle_timeout_secs, 10.0);
    }

    #[test]
    fn explicit_presets_and_timeout_override_defaults() {
        let args = Args::parse_from([
            "kanji-scatter",
            "--preset",
            "Ryumin",
            "--preset",
            "Reisho",
            "--idle-timeout-secs",
            "3.5",
            "--seed",
            "7",
        ]);
        let config = AppConfig::from_args(&args);
        assert_eq!(config.presets, vec!["Ryumin".to_string(), "Reisho".to_string()]);
        assert_eq!(config.settings.idle_timeout_secs, 3.5);
        assert_eq!(config.seed, Some(7));
    }
}
