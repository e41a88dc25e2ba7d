mod cli;
mod core;
mod error;
mod tui;

use crate::cli::{Cli, Commands};
use crate::core::{
    ChapterService, SpeechService, TitleService, TranscriptService, extract_video_id,
    format_chapter_lines, format_time,
};
use crate::error::Result;
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

const CLI_WRAP_WIDTH: usize = 80;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chapters {
            video_id,
            languages,
            duration,
            title,
        }) => {
            run_cli_chapters(video_id, languages, duration, title).await?;
        }
        Some(Commands::Title {
            video_id,
            languages,
        }) => {
            run_cli_title(video_id, languages).await?;
        }
        Some(Commands::Transcribe { file }) => {
            run_cli_transcribe(file).await?;
        }
        Some(Commands::Tui) | None => {
            if cli.cli {
                println!("Use 'chaptly --help' for available commands");
            } else {
                run_tui().await?;
            }
        }
    }

    Ok(())
}

async fn run_cli_chapters(
    video_input: String,
    languages: String,
    duration_override: Option<u64>,
    with_title: bool,
) -> Result<()> {
    let video_id = extract_video_id(&video_input)
        .ok_or_else(|| error::Error::custom("Invalid video URL or ID"))?;

    println!("Processing video: {video_id}");

    let transcript_service = TranscriptService::new()?;
    let chapter_service = ChapterService::new();

    let languages: Vec<&str> = languages.split(',').map(|s| s.trim()).collect();

    println!("Fetching transcript...");
    let transcript = transcript_service
        .fetch_transcript(&video_id, &languages, false)
        .await?;

    let flat = TranscriptService::flatten_text(&transcript);
    let duration = duration_override
        .unwrap_or_else(|| TranscriptService::estimated_duration_secs(&transcript));
    println!(
        "Transcript has {} words, video duration {}",
        flat.split_whitespace().count(),
        format_time(duration)
    );

    println!("Generating chapters...");
    let chapters = chapter_service.generate(&flat, duration).await?;

    println!();
    println!("{}", format_chapter_lines(&chapters, CLI_WRAP_WIDTH));

    if with_title {
        println!();
        println!("Generating title...");
        let title = TitleService::new().generate_title(&flat).await?;
        println!("Title: {title}");
    }

    Ok(())
}

async fn run_cli_title(video_input: String, languages: String) -> Result<()> {
    let video_id = extract_video_id(&video_input)
        .ok_or_else(|| error::Error::custom("Invalid video URL or ID"))?;

    println!("Processing video: {video_id}");

    let transcript_service = TranscriptService::new()?;
    let languages: Vec<&str> = languages.split(',').map(|s| s.trim()).collect();

    println!("Fetching transcript...");
    let transcript = transcript_service
        .fetch_transcript(&video_id, &languages, false)
        .await?;
    let flat = TranscriptService::flatten_text(&transcript);

    println!("Generating title...");
    let title = TitleService::new().generate_title(&flat).await?;

    println!();
    println!("{title}");

    Ok(())
}

async fn run_cli_transcribe(file: PathBuf) -> Result<()> {
    println!("Transcribing file: {}", file.display());

    let speech_service = SpeechService::new();
    let transcript = speech_service.transcribe_file(&file).await?;

    println!();
    println!("{transcript}");

    Ok(())
}

async fn run_tui() -> Result<()> {
    let mut terminal = tui_init()?;

    let mut app = App::new()?;
    let event_handler = EventHandler::new();

    // Channel for progress messages from background jobs
    let (tx, rx) = mpsc::unbounded_channel();
    app.processing_tx = Some(tx);
    app.processing_rx = Some(rx);

    loop {
        let event = event_handler.next_event()?;
        app.handle_event(event)?;

        terminal.draw(|f| {
            ui::draw(f, &mut app);
        })?;

        if app.should_quit {
            break;
        }
    }

    tui_restore()?;
    Ok(())
}
