use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Sample rate requested from ffmpeg. The decoder still reads the real rate
/// from the WAV header.
pub const EXTRACT_SAMPLE_RATE: u32 = 44100;

/// A WAV file pulled out of a media container, removed on drop unless kept.
pub struct ExtractedAudio {
    path: PathBuf,
    keep: bool,
}

impl ExtractedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for ExtractedAudio {
    fn drop(&mut self) {
        if self.keep {
            log::info!("Keeping extracted audio: {}", self.path.display());
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temporary audio {}", self.path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("Failed to remove {}: {}", self.path.display(), err),
        }
    }
}

fn ffmpeg_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(), input.to_string_lossy().into_owned(),
        "-vn".into(),
        "-acodec".into(), "pcm_s16le".into(),
        "-ar".into(), EXTRACT_SAMPLE_RATE.to_string(),
        "-ac".into(), "1".into(),
        "-y".into(),
        output.to_string_lossy().into_owned(),
    ]
}

fn temp_wav_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    std::env::temp_dir().join(format!("video-cutter-{}-{}.wav", std::process::id(), stem))
}

/// Run ffmpeg to produce a mono 16-bit PCM WAV from `input`.
pub fn extract_audio(input: &Path) -> Result<ExtractedAudio> {
    let output = temp_wav_path(input);
    let args = ffmpeg_args(input, &output);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.set_message(format!("Extracting audio from {}", input.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .context("Failed to spawn ffmpeg. Is ffmpeg installed?");
    spinner.finish_and_clear();
    let result = result?;

    // From here on the file (if any) is cleaned up on every path.
    let extracted = ExtractedAudio { path: output, keep: false };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        anyhow::bail!("ffmpeg exited with {}:\n{}", result.status, stderr);
    }

    log::info!("Audio extracted to: {}", extracted.path().display());
    Ok(extracted)
}

/// WAV inputs can be decoded directly without a round trip through ffmpeg.
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffmpeg_requests_mono_pcm() {
        let args = ffmpeg_args(Path::new("match.mp4"), Path::new("/tmp/out.wav"));
        let joined = args.join(" ");
        assert_eq!(
            joined,
            "-i match.mp4 -vn -acodec pcm_s16le -ar 44100 -ac 1 -y /tmp/out.wav"
        );
    }

    #[test]
    fn temp_path_is_per_process() {
        let path = temp_wav_path(Path::new("/videos/final game.mkv"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("video-cutter-"));
        assert!(name.ends_with("-final game.wav"));
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn detects_wav_extension() {
        assert!(is_wav(Path::new("a.wav")));
        assert!(is_wav(Path::new("b.WAV")));
        assert!(!is_wav(Path::new("c.mp4")));
        assert!(!is_wav(Path::new("wav")));
    }

    #[test]
    fn dropping_removes_the_file() {
        let path = std::env::temp_dir().join(format!("video-cutter-drop-{}.wav", std::process::id()));
        std::fs::write(&path, b"RIFF").unwrap();
        drop(ExtractedAudio { path: path.clone(), keep: false });
        assert!(!path.exists());

        std::fs::write(&path, b"RIFF").unwrap();
        let mut kept = ExtractedAudio { path: path.clone(), keep: false };
        kept.keep();
        drop(kept);
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
