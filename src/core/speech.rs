use crate::core::chapters::enforce_openai_opt_in;
use crate::error::{Error, Result};
use async_openai::{self, types::audio::CreateTranscriptionRequestArgs};
use std::path::Path;
use tokio::fs;

const SPEECH_MODEL: &str = "whisper-1";

// Uploads are capped by estimated runtime, derived from file size at typical
// bitrates (~1 MB per audio minute, ~10 MB per video minute).
const MAX_UPLOAD_MINUTES: f64 = 10.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a file by extension; `None` means the type is unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" | "mpga" | "wav" | "ogg" | "m4a" => Some(MediaKind::Audio),
            "mp4" | "mpeg" | "webm" | "mov" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SpeechService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl SpeechService {
    pub fn new() -> Self {
        Self {
            client: async_openai::Client::new(),
        }
    }

    /// Validate a local audio/video file and send it to the speech-to-text
    /// API, returning the transcript text.
    pub async fn transcribe_file(&self, path: &Path) -> Result<String> {
        enforce_openai_opt_in()?;

        let kind = MediaKind::from_path(path).ok_or_else(|| {
            Error::custom("Invalid file type. Please provide an audio or video file.")
        })?;

        let metadata = fs::metadata(path)
            .await
            .map_err(|_| Error::custom(format!("Cannot read file: {}", path.display())))?;

        let minutes = estimated_minutes(metadata.len(), kind);
        if minutes > MAX_UPLOAD_MINUTES {
            return Err(Error::custom(format!(
                "File duration exceeds the {MAX_UPLOAD_MINUTES:.0}-minute limit \
(estimated {minutes:.1} minutes)"
            )));
        }

        let file = path
            .to_str()
            .ok_or_else(|| Error::custom("File path is not valid UTF-8"))?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(file)
            .model(SPEECH_MODEL)
            .build()?;

        let response = self.client.audio().transcription().create(request).await?;

        if response.text.trim().is_empty() {
            return Err(Error::custom("Transcription returned empty text"));
        }

        Ok(response.text)
    }
}

fn estimated_minutes(size_bytes: u64, kind: MediaKind) -> f64 {
    let size_mb = size_bytes as f64 / BYTES_PER_MB;
    match kind {
        MediaKind::Audio => size_mb,
        MediaKind::Video => size_mb / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_UPLOAD_MINUTES, MediaKind, estimated_minutes};
    use std::path::Path;

    #[test]
    fn classifies_audio_and_video_extensions() {
        assert_eq!(MediaKind::from_path(Path::new("talk.mp3")), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_path(Path::new("talk.WAV")), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_path(Path::new("clip.mp4")), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path(Path::new("clip.mov")), Some(MediaKind::Video));
    }

    #[test]
    fn rejects_unknown_extensions() {
        assert_eq!(MediaKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(MediaKind::from_path(Path::new("no-extension")), None);
    }

    #[test]
    fn video_minutes_scale_down_by_bitrate() {
        let bytes = 20 * 1024 * 1024;
        assert!(estimated_minutes(bytes, MediaKind::Audio) > MAX_UPLOAD_MINUTES);
        assert!(estimated_minutes(bytes, MediaKind::Video) < MAX_UPLOAD_MINUTES);
    }

    #[test]
    fn small_audio_passes_the_cap() {
        let bytes = 5 * 1024 * 1024;
        assert!(estimated_minutes(bytes, MediaKind::Audio) <= MAX_UPLOAD_MINUTES);
    }
}
