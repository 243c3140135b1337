use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::detect::settings::{
    ExtensionConfig, MergeConfig, DEFAULT_EXTENSION_SCORE_CUTOFF, DEFAULT_MERGE_GAP,
    DEFAULT_MIN_DURATION, DEFAULT_SIGNIFICANT_OVERLAP, DEFAULT_THRESHOLD_RATIO, DEFAULT_WINDOW_MS,
};
use crate::detect::{DetectionSettings, Preset};
use crate::export::ExportFormat;

pub const CONFIG_FILE_NAME: &str = "video-cutter.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfig {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,
    #[serde(default = "default_window_ms")]
    pub window_ms: u32,
    #[serde(default = "default_merge_gap")]
    pub merge_gap: f64,
    #[serde(default = "default_significant_overlap")]
    pub significant_overlap: f64,
    /// Enables the extension step regardless of preset when set.
    #[serde(default)]
    pub extension_seconds: Option<f64>,
    #[serde(default = "default_extension_score_cutoff")]
    pub extension_score_cutoff: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            threshold: default_threshold(),
            min_duration: default_min_duration(),
            window_ms: default_window_ms(),
            merge_gap: default_merge_gap(),
            significant_overlap: default_significant_overlap(),
            extension_seconds: None,
            extension_score_cutoff: default_extension_score_cutoff(),
        }
    }
}

fn default_threshold() -> f64 { DEFAULT_THRESHOLD_RATIO }
fn default_min_duration() -> f64 { DEFAULT_MIN_DURATION }
fn default_window_ms() -> u32 { DEFAULT_WINDOW_MS }
fn default_merge_gap() -> f64 { DEFAULT_MERGE_GAP }
fn default_significant_overlap() -> f64 { DEFAULT_SIGNIFICANT_OVERLAP }
fn default_extension_score_cutoff() -> f64 { DEFAULT_EXTENSION_SCORE_CUTOFF }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Explicit path, else `./video-cutter.toml`, else the per-user config dir.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("video-cutter").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("video-cutter").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

/// Combine CLI and file settings. File values apply only where the CLI is
/// still at its default.
pub fn detection_settings(cli: &Cli, file: &DetectionConfig) -> DetectionSettings {
    let preset = if cli.preset == Preset::default() { file.preset } else { cli.preset };
    let mut settings = DetectionSettings::from_preset(preset);

    settings.threshold_ratio = if cli.threshold == DEFAULT_THRESHOLD_RATIO {
        file.threshold
    } else {
        cli.threshold
    };
    settings.min_duration = if cli.min_duration == DEFAULT_MIN_DURATION {
        file.min_duration
    } else {
        cli.min_duration
    };
    settings.window_ms = if cli.window == DEFAULT_WINDOW_MS { file.window_ms } else { cli.window };

    if let Some(merge) = settings.merge.as_mut() {
        *merge = MergeConfig {
            gap_tolerance: file.merge_gap,
            significant_overlap: file.significant_overlap,
        };
    }

    let seconds = cli
        .extend
        .or(file.extension_seconds)
        .or(settings.extension.map(|e| e.seconds));
    settings.extension = seconds.map(|seconds| ExtensionConfig {
        seconds,
        score_cutoff: file.extension_score_cutoff,
    });

    settings
}

pub fn output_format(cli: &Cli, file: &OutputConfig) -> ExportFormat {
    cli.format
        .or_else(|| cli.output.as_deref().and_then(ExportFormat::from_path))
        .or(file.format)
        .unwrap_or(ExportFormat::Csv)
}
