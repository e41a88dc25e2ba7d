use crate::error::{Error, Result};
use yt_transcript_rs::{FetchedTranscript, api::YouTubeTranscriptApi};

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
}

impl TranscriptService {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to initialize transcript API: {e}")))?;
        Ok(Self { api })
    }

    pub async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
        preserve_formatting: bool,
    ) -> Result<FetchedTranscript> {
        match self
            .api
            .fetch_transcript(video_id, languages, preserve_formatting)
            .await
        {
            Ok(transcript) => Ok(transcript),
            Err(e) => Err(Error::custom(format!("Failed to fetch transcript: {e}"))),
        }
    }

    /// Collapse the snippet sequence into the single flat text the aligner
    /// and the AI prompts consume. Snippets carry HTML entities and stray
    /// newlines; the result is entity-decoded and single-spaced.
    pub fn flatten_text(transcript: &FetchedTranscript) -> String {
        let decoded: Vec<String> = transcript
            .snippets
            .iter()
            .map(|snippet| html_escape::decode_html_entities(&snippet.text).into_owned())
            .collect();
        let joined = decoded.join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Runtime estimate in whole seconds, taken from the end of the last
    /// snippet. Trailing silence after the last caption is not covered; the
    /// CLI accepts an explicit duration for callers that know better.
    pub fn estimated_duration_secs(transcript: &FetchedTranscript) -> u64 {
        transcript
            .snippets
            .last()
            .map(|snippet| (snippet.start + snippet.duration).ceil() as u64)
            .unwrap_or(0)
    }
}

pub fn extract_video_id(url: &str) -> Option<String> {
    // Accepts watch URLs, youtu.be short links, or a bare video ID.
    let raw_id = if let Some(v_param) = url.split("v=").nth(1) {
        v_param.split('&').next().unwrap_or(v_param)
    } else if let Some(youtu_be) = url.split("youtu.be/").nth(1) {
        youtu_be.split('?').next().unwrap_or(youtu_be)
    } else {
        url
    };

    sanitize_video_id(raw_id).ok()
}

const VIDEO_ID_LEN: usize = 11;

/// Ensure a video identifier is safe to hand to the transcript API: exactly
/// 11 characters from the YouTube ID alphabet (letters, digits, `-`, `_`).
pub fn sanitize_video_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::custom("Video ID cannot be empty"));
    }

    if trimmed.len() != VIDEO_ID_LEN {
        return Err(Error::custom(format!(
            "Video ID must be exactly {VIDEO_ID_LEN} characters"
        )));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::custom(
            "Video ID contains unsupported characters; expected only letters, numbers, '-' or '_'",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_video_id, sanitize_video_id};

    #[test]
    fn allows_expected_characters() {
        let id = sanitize_video_id("abcDEF123-_").expect("valid ID");
        assert_eq!(id, "abcDEF123-_");
    }

    #[test]
    fn rejects_empty() {
        assert!(sanitize_video_id("   ").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(sanitize_video_id("short").is_err());
        assert!(sanitize_video_id("waaaaaytoolongforanid").is_err());
    }

    #[test]
    fn rejects_invalid_chars() {
        assert!(sanitize_video_id("abc/../etc1").is_err());
    }

    #[test]
    fn extracts_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s");
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn extracts_from_short_url() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=xyz");
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn accepts_bare_id() {
        let id = extract_video_id("dQw4w9WgXcQ");
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn rejects_unrelated_url() {
        assert!(extract_video_id("https://example.com/clip").is_none());
    }
}
