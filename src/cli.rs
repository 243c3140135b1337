use clap::Parser;
use std::path::PathBuf;

use crate::detect::settings::{DEFAULT_MIN_DURATION, DEFAULT_THRESHOLD_RATIO, DEFAULT_WINDOW_MS};
use crate::detect::Preset;
use crate::export::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "video-cutter",
    about = "Find exciting moments in a video by detecting sustained volume spikes"
)]
pub struct Cli {
    /// Input video or audio file
    pub input: PathBuf,

    /// Output file (default: <input name>_markers.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else csv)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Volume spike threshold, as a multiple of the median loudness
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_RATIO)]
    pub threshold: f64,

    /// Minimum excitement duration in seconds
    #[arg(short, long, default_value_t = DEFAULT_MIN_DURATION)]
    pub min_duration: f64,

    /// Analysis window size in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_MS)]
    pub window: u32,

    /// Post-processing preset
    #[arg(long, value_enum, default_value_t = Preset::Merged)]
    pub preset: Preset,

    /// Extend high-scoring segments forward by this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub extend: Option<f64>,

    /// Config file (default: ./video-cutter.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep the audio extracted by ffmpeg instead of deleting it
    #[arg(long)]
    pub keep_audio: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["video-cutter", "game.mp4"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("game.mp4"));
        assert_eq!(cli.threshold, 2.0);
        assert_eq!(cli.min_duration, 1.0);
        assert_eq!(cli.window, 1000);
        assert_eq!(cli.preset, Preset::Merged);
        assert!(cli.output.is_none() && cli.format.is_none() && cli.extend.is_none());
        assert!(!cli.verbose && !cli.keep_audio);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "video-cutter", "game.mp4", "-o", "cuts.llc", "-t", "2.5", "-m", "3",
            "-w", "500", "--preset", "simple", "--extend", "30", "--format", "llc", "-v",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("cuts.llc")));
        assert_eq!(cli.threshold, 2.5);
        assert_eq!(cli.min_duration, 3.0);
        assert_eq!(cli.window, 500);
        assert_eq!(cli.preset, Preset::Simple);
        assert_eq!(cli.extend, Some(30.0));
        assert_eq!(cli.format, Some(ExportFormat::Llc));
        assert!(cli.verbose);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["video-cutter"]).is_err());
    }
}
