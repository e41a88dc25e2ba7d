use crate::core::align::{Chapter, TimestampedChapter, align_chapters};
use crate::error::{Error, Result};
use async_openai::{
    self,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, ReasoningArgs, ReasoningEffort, Role,
    },
};
use serde::Deserialize;
use std::env;

const SEGMENT_MODEL: &str = "gpt-5.2";
const OPENAI_OPT_IN_ENV: &str = "CHAPTLY_ALLOW_OPENAI";

const SYSTEM_PROMPT: &str = "You are a video editor segmenting YouTube transcripts into \
topic-based chapters. You respond with valid JSON only, no prose.";

#[derive(Clone)]
pub struct ChapterService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

#[derive(Debug, Deserialize)]
struct ChaptersPayload {
    chapters: Vec<Chapter>,
}

impl ChapterService {
    pub fn new() -> Self {
        Self {
            client: async_openai::Client::new(),
        }
    }

    /// Segment the transcript, then estimate a start timestamp for every
    /// chapter from its position in the transcript text.
    pub async fn generate(
        &self,
        transcript: &str,
        video_duration: u64,
    ) -> Result<Vec<TimestampedChapter>> {
        let chapters = self.segment(transcript).await?;
        align_chapters(&chapters, transcript, video_duration)
    }

    pub async fn segment(&self, transcript: &str) -> Result<Vec<Chapter>> {
        enforce_openai_opt_in()?;

        let request = CreateResponseArgs::default()
            .max_output_tokens(16384_u32)
            .model(SEGMENT_MODEL)
            .reasoning(ReasoningArgs::default().effort(ReasoningEffort::Low).build()?)
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(SYSTEM_PROMPT)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(format!(
                            "Segment the YouTube transcript below into chapters:

1. Carefully analyze the transcript.
2. Identify distinct topic shifts.
3. Create a chapter break at each shift.
4. Give every chapter a concise title and copy its corresponding text verbatim \
into `content`, starting with the chapter's opening words from the transcript.
5. Return exactly this JSON structure and nothing else:
{{
    \"chapters\": [
        {{
            \"title\": \"Chapter Title\",
            \"content\": \"Chapter Content\"
        }}
    ]
}}

<TRANSCRIPT>
{transcript}
</TRANSCRIPT>"
                        ))
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    if let OutputMessageContent::OutputText(text) = c {
                        content.push_str(&text.text);
                    }
                }
            }
        }

        parse_chapters(&content)
    }
}

/// Parse and validate the model's chapter payload. Tolerates a markdown code
/// fence around the JSON, which some models add despite instructions.
fn parse_chapters(raw: &str) -> Result<Vec<Chapter>> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(Error::custom("Model returned no chapter data"));
    }

    let payload: ChaptersPayload = serde_json::from_str(cleaned)
        .map_err(|e| Error::custom(format!("Invalid chapter response: {e}")))?;

    if payload.chapters.is_empty() {
        return Err(Error::custom("Invalid chapter response: empty chapters array"));
    }

    for chapter in &payload.chapters {
        if chapter.title.trim().is_empty() || chapter.content.trim().is_empty() {
            return Err(Error::custom(
                "Invalid chapter response: chapter with blank title or content",
            ));
        }
    }

    Ok(payload.chapters)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Render timestamped chapters as `[HH:MM:SS] Title` headers with wrapped
/// content, for stdout and the TUI result view.
pub fn format_chapter_lines(chapters: &[TimestampedChapter], width: usize) -> String {
    let mut lines = Vec::new();
    for chapter in chapters {
        lines.push(format!("[{}] {}", chapter.timestamp, chapter.title));
        lines.push(textwrap::fill(&chapter.content, width));
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

pub(crate) fn enforce_openai_opt_in() -> Result<()> {
    match env::var(OPENAI_OPT_IN_ENV) {
        Ok(val)
            if matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ) =>
        {
            Ok(())
        }
        _ => Err(Error::custom(format!(
            "This command uploads content to OpenAI and requires explicit opt-in. \
Set {OPENAI_OPT_IN_ENV}=1 to enable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_chapter_lines, parse_chapters};
    use crate::core::align::TimestampedChapter;

    #[test]
    fn parses_plain_json() {
        let chapters = parse_chapters(
            r#"{"chapters": [{"title": "Intro", "content": "hello and welcome"}]}"#,
        )
        .expect("valid payload");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Intro");
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"chapters\": [{\"title\": \"A\", \"content\": \"b\"}]}\n```";
        let chapters = parse_chapters(raw).expect("valid payload");
        assert_eq!(chapters[0].content, "b");
    }

    #[test]
    fn rejects_empty_output() {
        assert!(parse_chapters("").is_err());
        assert!(parse_chapters("```json\n```").is_err());
    }

    #[test]
    fn rejects_missing_or_empty_chapters() {
        assert!(parse_chapters(r#"{"something": "else"}"#).is_err());
        assert!(parse_chapters(r#"{"chapters": []}"#).is_err());
    }

    #[test]
    fn rejects_blank_chapter_fields() {
        assert!(parse_chapters(r#"{"chapters": [{"title": " ", "content": "x"}]}"#).is_err());
        assert!(parse_chapters(r#"{"chapters": [{"title": "x", "content": ""}]}"#).is_err());
    }

    #[test]
    fn formats_header_lines() {
        let chapters = vec![TimestampedChapter {
            timestamp: "00:01:30".to_string(),
            title: "Getting started".to_string(),
            content: "short content".to_string(),
        }];
        let text = format_chapter_lines(&chapters, 80);
        assert!(text.starts_with("[00:01:30] Getting started\n"));
        assert!(text.contains("short content"));
    }
}
