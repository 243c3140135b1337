mod audio;
mod cli;
mod config;
mod detect;
mod export;

use anyhow::{Context, Result};
use clap::Parser;

use audio::extract;
use cli::Cli;
use detect::Outcome;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    let file_config = match config::find_config(cli.config.as_deref()) {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => config::Config::default(),
    };

    let settings = config::detection_settings(&cli, &file_config.detection);
    settings.validate().context("Invalid detection settings")?;

    let input = &cli.input;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let format = config::output_format(&cli, &file_config.output);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| export::default_output_path(input, format));

    println!("Processing video: {}", input.display());
    println!("Output file: {}", output.display());
    log::debug!("Detection settings: {:?}", settings);

    // 1. Get a decodable WAV. The guard deletes the temp file when dropped.
    let mut extracted = None;
    let audio_path = if extract::is_wav(input) {
        input.clone()
    } else {
        let mut wav = extract::extract_audio(input).context("Failed to extract audio")?;
        if cli.keep_audio {
            wav.keep();
        }
        extracted.insert(wav).path().to_path_buf()
    };

    // 2. Decode
    let audio = audio::decode::decode_audio(&audio_path).context("Failed to decode audio")?;
    drop(extracted);

    // 3. Detect, with the window bound to the real sample rate
    let analyzer = settings.resolve(audio.sample_rate)?;
    let outcome = detect::analyze(&audio.samples, &analyzer);
    match &outcome {
        Outcome::Markers(_) => {}
        Outcome::InsufficientData { windows } => {
            println!("Insufficient audio data ({} analysis windows); no markers found", windows);
        }
        Outcome::Silent { baseline } => {
            println!("Audio track is silent (baseline {:.2e}); no markers found", baseline);
        }
    }
    let markers = outcome.markers();
    for m in markers {
        log::debug!("{:>9.2}s - {:>9.2}s  {}", m.start_time, m.end_time, m.label);
    }

    // 4. Export
    export::export(markers, format, input, &output)?;

    println!("Found {} excitement markers", markers.len());
    println!("Markers exported to: {}", output.display());
    match format {
        export::ExportFormat::Csv => {
            println!("Import this CSV file into LosslessCut: File → Import project → CSV segments")
        }
        export::ExportFormat::Llc => println!("Open this project file in LosslessCut"),
    }

    Ok(())
}
