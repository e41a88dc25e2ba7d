use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chaptly")]
#[command(about = "Chaptly - YouTube chapter and title generator")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Force CLI mode (skip TUI)
    #[arg(long)]
    pub cli: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate timestamped chapters for a video
    Chapters {
        /// YouTube video URL or video ID
        video_id: String,

        /// Preferred transcript languages (comma-separated)
        #[arg(short, long, default_value = "en")]
        languages: String,

        /// Video duration in seconds (overrides the transcript-based estimate)
        #[arg(short, long)]
        duration: Option<u64>,

        /// Also generate a catchy title
        #[arg(short, long)]
        title: bool,
    },

    /// Generate a catchy title for a video
    Title {
        /// YouTube video URL or video ID
        video_id: String,

        /// Preferred transcript languages (comma-separated)
        #[arg(short, long, default_value = "en")]
        languages: String,
    },

    /// Transcribe a local audio or video file
    Transcribe {
        /// Path to the audio/video file
        file: PathBuf,
    },

    /// Open TUI interface
    Tui,
}
