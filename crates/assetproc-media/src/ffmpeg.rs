//! ffmpeg/ffprobe invocation and chunk planning.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

use assetproc_core::defaults;
use assetproc_core::{Error, Result};

/// A time window of the source audio that becomes one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_secs: f64,
    pub len_secs: f64,
}

/// Split `duration_secs` of audio weighing `total_bytes` into equal windows
/// whose estimated size stays under `max_chunk_bytes`.
///
/// Size is assumed proportional to duration, which holds for stream-copied
/// constant-bitrate audio; a safety factor absorbs the rest.
pub fn plan_segments(duration_secs: f64, total_bytes: usize, max_chunk_bytes: usize) -> Vec<Segment> {
    if total_bytes <= max_chunk_bytes || max_chunk_bytes == 0 {
        return vec![Segment {
            start_secs: 0.0,
            len_secs: duration_secs,
        }];
    }

    let budget = (max_chunk_bytes as f64 * defaults::CHUNK_SIZE_SAFETY_FACTOR).max(1.0);
    let count = (total_bytes as f64 / budget).ceil() as usize;
    let window = duration_secs / count as f64;

    (0..count)
        .map(|i| {
            let start_secs = window * i as f64;
            let len_secs = if i + 1 == count {
                duration_secs - start_secs
            } else {
                window
            };
            Segment {
                start_secs,
                len_secs,
            }
        })
        .collect()
}

/// Split a file name into stem and lowercase extension.
pub fn split_name(name_hint: &str) -> (&str, Option<String>) {
    match name_hint.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem, Some(ext.to_ascii_lowercase()))
        }
        _ => (name_hint, None),
    }
}

/// Upload name for the chunk at `index`, e.g. `talk_part002.mp3`.
pub fn chunk_label(stem: &str, index: usize, ext: &str) -> String {
    let stem = if stem.is_empty() { "audio" } else { stem };
    format!("{}_part{:03}.{}", stem, index, ext)
}

/// MIME type for an audio file extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "mp3" | "mpga" | "mpeg" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "m4a" | "mp4" => "audio/mp4",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// Run a command that writes to files rather than stdout.
pub async fn run_cmd_status(cmd: &mut Command, timeout_secs: u64) -> Result<()> {
    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::Media(format!(
                "External command timed out after {}s",
                timeout_secs
            ))
        })?
        .map_err(|e| Error::Media(format!("Failed to execute command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Media(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

/// Get media duration in seconds using ffprobe.
pub async fn probe_duration(path: &Path, timeout_secs: u64) -> Result<f64> {
    let output = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output(),
    )
    .await
    .map_err(|_| Error::Media(format!("ffprobe timed out after {}s", timeout_secs)))?
    .map_err(|e| Error::Media(format!("ffprobe failed: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Media(
            "ffprobe failed to get duration".to_string(),
        ));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration = duration_str
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::Media(format!("Failed to parse duration: {}", e)))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::Media(format!("Invalid media duration: {}", duration)));
    }
    Ok(duration)
}

/// Extract the audio track of a video to MP3.
pub async fn extract_audio_track(input: &Path, output: &Path, timeout_secs: u64) -> Result<()> {
    run_cmd_status(
        Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .arg("-vn") // No video
            .arg("-acodec")
            .arg("libmp3lame")
            .arg("-b:a")
            .arg(defaults::EXTRACTED_AUDIO_BITRATE)
            .arg("-ac")
            .arg("1") // Mono
            .arg("-y") // Overwrite
            .arg(output),
        timeout_secs,
    )
    .await
}

/// Copy one time window of an audio file without re-encoding.
pub async fn cut_segment(
    input: &Path,
    output: &Path,
    segment: Segment,
    timeout_secs: u64,
) -> Result<()> {
    run_cmd_status(
        Command::new("ffmpeg")
            .arg("-ss")
            .arg(format!("{:.3}", segment.start_secs))
            .arg("-t")
            .arg(format!("{:.3}", segment.len_secs))
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg("-c")
            .arg("copy")
            .arg("-y")
            .arg(output),
        timeout_secs,
    )
    .await
}

/// Whether ffmpeg is installed and runnable.
pub async fn ffmpeg_available() -> bool {
    match Command::new("ffmpeg").arg("-version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
