use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A titled excerpt of a transcript, as produced by the segmentation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedChapter {
    pub timestamp: String,
    pub title: String,
    pub content: String,
}

/// Assign each chapter an estimated start timestamp by locating its opening
/// words inside the flat transcript and mapping the word-position fraction
/// linearly onto the video duration (uniform speaking rate assumption).
///
/// The first chapter always starts at `00:00:00`. Searches only ever move
/// forward: each chapter's match position becomes the floor for the next
/// chapter's search. When none of a chapter's words can be found, its start
/// falls back to uniform chapter spacing and the search cursor stays put.
pub fn align_chapters(
    chapters: &[Chapter],
    transcript: &str,
    video_duration: u64,
) -> Result<Vec<TimestampedChapter>> {
    if chapters.is_empty() {
        return Ok(Vec::new());
    }

    let total_words = transcript.split_whitespace().count();
    if total_words == 0 {
        return Err(Error::custom(
            "Cannot compute timestamps: transcript contains no words",
        ));
    }

    let mut timestamped = Vec::with_capacity(chapters.len());
    let mut start_index = 0usize;

    for (i, chapter) in chapters.iter().enumerate() {
        let start_time = if i == 0 {
            0
        } else {
            match find_chapter_offset(&chapter.content, transcript, start_index) {
                Some(match_index) => {
                    let words_before = transcript[..match_index].split_whitespace().count();
                    start_index = match_index;
                    scale_position(words_before as f64 / total_words as f64, video_duration)
                }
                // No word matched: estimate from the chapter's position in
                // the list. The cursor is left where it was.
                None => scale_position(i as f64 / chapters.len() as f64, video_duration),
            }
        };

        timestamped.push(TimestampedChapter {
            timestamp: format_time(start_time),
            title: chapter.title.clone(),
            content: chapter.content.clone(),
        });
    }

    Ok(timestamped)
}

/// Literal case-sensitive search for the first of the chapter's words that
/// occurs in `transcript` at or after `from`. Words that never appear are
/// skipped in favor of the next one.
fn find_chapter_offset(content: &str, transcript: &str, from: usize) -> Option<usize> {
    for word in content.split_whitespace() {
        if let Some(pos) = transcript[from..].find(word) {
            return Some(from + pos);
        }
    }
    None
}

fn scale_position(fraction: f64, video_duration: u64) -> u64 {
    (fraction * video_duration as f64).floor() as u64
}

/// Zero-padded `HH:MM:SS`; hours are unbounded rather than wrapping at 24.
pub fn format_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::{Chapter, align_chapters, format_time};

    fn chapter(title: &str, content: &str) -> Chapter {
        Chapter {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(59), "00:00:59");
        assert_eq!(format_time(3661), "01:01:01");
    }

    #[test]
    fn hours_are_not_clamped() {
        assert_eq!(format_time(360_000), "100:00:00");
    }

    #[test]
    fn empty_chapter_list_yields_empty_output() {
        let result = align_chapters(&[], "some transcript text", 120).expect("no error");
        assert!(result.is_empty());
    }

    #[test]
    fn empty_transcript_with_chapters_is_an_error() {
        let chapters = [chapter("Intro", "hello")];
        assert!(align_chapters(&chapters, "", 120).is_err());
        assert!(align_chapters(&chapters, "   \n\t ", 120).is_err());
    }

    #[test]
    fn first_chapter_always_starts_at_zero() {
        // Content placed at the very end of the transcript must not matter.
        let chapters = [chapter("Outro", "nine ten")];
        let result =
            align_chapters(&chapters, "one two three four five six seven eight nine ten", 100)
                .expect("aligns");
        assert_eq!(result[0].timestamp, "00:00:00");
    }

    #[test]
    fn output_matches_input_length_and_order() {
        let transcript = "one two three four five six seven eight nine ten";
        let chapters = [
            chapter("A", "one two"),
            chapter("B", "four five"),
            chapter("C", "eight nine"),
        ];
        let result = align_chapters(&chapters, transcript, 100).expect("aligns");
        assert_eq!(result.len(), 3);
        let titles: Vec<&str> = result.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn interpolates_matched_chapter_position() {
        let transcript = "one two three four five six seven eight nine ten";
        let chapters = [chapter("Intro", "one two"), chapter("Mid", "six seven")];
        let result = align_chapters(&chapters, transcript, 100).expect("aligns");
        assert_eq!(result[0].timestamp, "00:00:00");
        // "six" begins after five words: floor((5/10) * 100) = 50.
        assert_eq!(result[1].timestamp, "00:00:50");
    }

    #[test]
    fn unmatched_content_falls_back_to_positional_estimate() {
        let chapters = [
            chapter("A", "xyz-not-present"),
            chapter("B", "abc-not-present"),
        ];
        let result = align_chapters(&chapters, "hello world foo bar", 100).expect("aligns");
        assert_eq!(result[0].timestamp, "00:00:00");
        // floor((1/2) * 100) = 50.
        assert_eq!(result[1].timestamp, "00:00:50");
    }

    #[test]
    fn skips_missing_leading_words_before_matching() {
        let transcript = "one two three four five six seven eight nine ten";
        let chapters = [chapter("Intro", "one two"), chapter("Mid", "zzz six seven")];
        let result = align_chapters(&chapters, transcript, 100).expect("aligns");
        assert_eq!(result[1].timestamp, "00:00:50");
    }

    #[test]
    fn in_order_excerpts_produce_non_decreasing_timestamps() {
        let transcript = "alpha bravo charlie delta echo foxtrot golf hotel india juliett \
                          kilo lima mike november oscar papa quebec romeo sierra tango";
        let chapters = [
            chapter("One", "alpha bravo charlie"),
            chapter("Two", "foxtrot golf"),
            chapter("Three", "kilo lima"),
            chapter("Four", "quebec romeo sierra"),
        ];
        let result = align_chapters(&chapters, transcript, 3600).expect("aligns");
        let seconds: Vec<&String> = result.iter().map(|c| &c.timestamp).collect();
        for pair in seconds.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn search_cursor_only_moves_forward() {
        // "deep" occurs early and late. The second chapter's match anchors the
        // cursor past it, so the third chapter resolves to the later one.
        let transcript = "deep dive intro middle part deep dive again closing words";
        let chapters = [
            chapter("Intro", "deep dive intro"),
            chapter("Middle", "middle part"),
            chapter("Reprise", "deep dive again"),
        ];
        let result = align_chapters(&chapters, transcript, 100).expect("aligns");
        // "middle" starts after 3 words of 10: floor(3/10 * 100) = 30.
        assert_eq!(result[1].timestamp, "00:00:30");
        // The second "deep" starts after 5 words: floor(5/10 * 100) = 50.
        assert_eq!(result[2].timestamp, "00:00:50");
    }

    #[test]
    fn zero_duration_pins_every_chapter_to_start() {
        let transcript = "one two three four five six";
        let chapters = [chapter("A", "one two"), chapter("B", "five six")];
        let result = align_chapters(&chapters, transcript, 0).expect("aligns");
        assert!(result.iter().all(|c| c.timestamp == "00:00:00"));
    }
}
