use crate::core::{
    ChapterService, TitleService, TranscriptService, extract_video_id, format_chapter_lines,
};
use crate::error::Result;
use crate::tui::components::{InputField, JobProgress, ResultView};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

const WRAP_WIDTH: usize = 76;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Home,
    JobForm,
    Processing { video_id: String },
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobKind {
    Chapters,
    Title,
}

impl JobKind {
    pub fn label(&self) -> &'static str {
        match self {
            JobKind::Chapters => "Chapters",
            JobKind::Title => "Title",
        }
    }
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,

    // Home screen
    pub selected_option: usize,

    // Job form
    pub job_kind: JobKind,
    pub url_input: InputField,
    pub languages_input: InputField,
    pub duration_input: InputField,
    pub input_focus: usize,

    // Processing screen
    pub progress: JobProgress,
    pending_result: Option<String>,

    // Results screen
    pub result_view: Option<ResultView>,
    pub viewer_height: u16,

    // Services
    pub transcript_service: TranscriptService,
    pub chapter_service: ChapterService,
    pub title_service: TitleService,

    // Async communication
    pub processing_tx: Option<mpsc::UnboundedSender<String>>,
    pub processing_rx: Option<mpsc::UnboundedReceiver<String>>,
}

impl App {
    pub fn new() -> Result<Self> {
        Ok(Self {
            state: AppState::Home,
            should_quit: false,

            selected_option: 0,

            job_kind: JobKind::Chapters,
            url_input: InputField::new("Video URL", "https://youtu.be/..."),
            languages_input: InputField::new("Languages", "en"),
            duration_input: InputField::new("Duration (seconds)", "Auto from transcript"),
            input_focus: 0,

            progress: JobProgress::new(),
            pending_result: None,

            result_view: None,
            viewer_height: 0,

            transcript_service: TranscriptService::new()?,
            chapter_service: ChapterService::new(),
            title_service: TitleService::new(),

            processing_tx: None,
            processing_rx: None,
        })
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.handle_tick(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::JobForm => self.handle_form_key(key),
            AppState::Processing { .. } => self.handle_processing_key(key),
            AppState::Results => self.handle_results_key(key),
        }
        Ok(())
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.selected_option = self.selected_option.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_option < 2 {
                    self.selected_option += 1;
                }
            }
            KeyCode::Char('1') => self.selected_option = 0,
            KeyCode::Char('2') => self.selected_option = 1,
            KeyCode::Char('3') => self.selected_option = 2,
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Enter => match self.selected_option {
                0 => self.open_job_form(JobKind::Chapters),
                1 => self.open_job_form(JobKind::Title),
                2 => self.should_quit = true,
                _ => {}
            },
            _ => {}
        }
    }

    fn open_job_form(&mut self, kind: JobKind) {
        self.job_kind = kind;
        self.url_input.clear();
        self.duration_input.clear();
        if self.languages_input.value.is_empty() {
            self.languages_input.value = "en".to_string();
        }
        self.input_focus = 0;
        self.set_form_focus();
        self.state = AppState::JobForm;
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
            }
            KeyCode::Tab => {
                self.input_focus = (self.input_focus + 1) % 3;
                self.set_form_focus();
            }
            KeyCode::Enter => {
                if self.input_focus < 2 {
                    self.input_focus += 1;
                    self.set_form_focus();
                } else {
                    self.start_processing();
                }
            }
            _ => {
                match self.input_focus {
                    0 => self.url_input.handle_key(key),
                    1 => self.languages_input.handle_key(key),
                    _ => self.duration_input.handle_key(key),
                };
            }
        }
    }

    fn set_form_focus(&mut self) {
        self.url_input.focused = self.input_focus == 0;
        self.languages_input.focused = self.input_focus == 1;
        self.duration_input.focused = self.input_focus == 2;
    }

    fn handle_processing_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            // The background task keeps running; handle_tick drops its late
            // messages once we leave the processing state.
            self.state = AppState::JobForm;
            self.progress.reset();
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.result_view = None;
                self.state = AppState::Home;
            }
            _ => {
                if let Some(view) = &mut self.result_view {
                    view.handle_key(key, self.viewer_height as usize);
                }
            }
        }
    }

    fn handle_tick(&mut self) -> Result<()> {
        let mut messages = Vec::new();
        if let Some(rx) = &mut self.processing_rx {
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
        }

        // Messages from a job that was cancelled with Esc arrive after the
        // state changed; drain them but apply nothing.
        if !matches!(self.state, AppState::Processing { .. }) {
            return Ok(());
        }

        for message in messages {
            if let Some(progress) = message.strip_prefix("PROGRESS:") {
                if let Ok(progress) = progress.parse::<f64>() {
                    self.progress.set_progress(progress);
                }
            } else if let Some(status) = message.strip_prefix("STATUS:") {
                self.progress.set_message(status.to_string());
            } else if let Some(log) = message.strip_prefix("LOG:") {
                self.progress.add_log(log.to_string());
            } else if let Some(result) = message.strip_prefix("RESULT:") {
                self.pending_result = Some(result.to_string());
            } else if message == "DONE" {
                if let Some(content) = self.pending_result.take() {
                    let heading = format!("{} result", self.job_kind.label());
                    self.result_view = Some(ResultView::new(content, heading));
                    self.state = AppState::Results;
                }
                self.progress.reset();
            }
            // FAILED: the task already pushed status and log lines; stay on
            // the processing screen so they remain readable.
        }
        Ok(())
    }

    fn start_processing(&mut self) {
        if !self.url_input.is_valid() {
            return;
        }
        let Some(video_id) = extract_video_id(&self.url_input.value) else {
            self.progress.add_log("Invalid video URL or ID".to_string());
            return;
        };

        let duration_override = match self.duration_input.value.trim() {
            "" => None,
            raw => match raw.parse::<u64>() {
                Ok(seconds) => Some(seconds),
                Err(_) => {
                    self.progress.add_log("Duration must be a number of seconds".to_string());
                    return;
                }
            },
        };

        let languages: Vec<String> = self
            .languages_input
            .value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        self.state = AppState::Processing {
            video_id: video_id.clone(),
        };
        self.pending_result = None;
        self.progress.reset();
        self.progress.set_message("Starting...".to_string());

        if let Some(tx) = &self.processing_tx {
            self.spawn_job(video_id, languages, duration_override, tx.clone());
        }
    }

    fn spawn_job(
        &self,
        video_id: String,
        languages: Vec<String>,
        duration_override: Option<u64>,
        tx: mpsc::UnboundedSender<String>,
    ) {
        let transcript_service = self.transcript_service.clone();
        let chapter_service = self.chapter_service.clone();
        let title_service = self.title_service.clone();
        let kind = self.job_kind;

        tokio::spawn(async move {
            let outcome = run_job(
                &transcript_service,
                &chapter_service,
                &title_service,
                kind,
                &video_id,
                &languages,
                duration_override,
                &tx,
            )
            .await;

            match outcome {
                Ok(result) => {
                    let _ = tx.send("PROGRESS:1.0".to_string());
                    let _ = tx.send("STATUS:Completed".to_string());
                    let _ = tx.send(format!("RESULT:{result}"));
                    let _ = tx.send("DONE".to_string());
                }
                Err(e) => {
                    let _ = tx.send(format!("LOG:Error: {e}"));
                    let _ = tx.send(format!("STATUS:Failed: {e}"));
                    let _ = tx.send("FAILED".to_string());
                }
            }
        });
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_job(
    transcript_service: &TranscriptService,
    chapter_service: &ChapterService,
    title_service: &TitleService,
    kind: JobKind,
    video_id: &str,
    languages: &[String],
    duration_override: Option<u64>,
    tx: &mpsc::UnboundedSender<String>,
) -> Result<String> {
    let languages: Vec<&str> = languages.iter().map(|s| s.as_str()).collect();

    let _ = tx.send("STATUS:Fetching transcript...".to_string());
    let _ = tx.send("PROGRESS:0.15".to_string());
    let _ = tx.send(format!("LOG:Fetching transcript for {video_id}..."));

    let transcript = transcript_service
        .fetch_transcript(video_id, &languages, false)
        .await?;

    let flat = TranscriptService::flatten_text(&transcript);
    let duration = duration_override
        .unwrap_or_else(|| TranscriptService::estimated_duration_secs(&transcript));

    let _ = tx.send("PROGRESS:0.4".to_string());
    let _ = tx.send(format!(
        "LOG:Transcript has {} words, duration {duration}s",
        flat.split_whitespace().count()
    ));

    match kind {
        JobKind::Chapters => {
            let _ = tx.send("STATUS:Generating chapters...".to_string());
            let chapters = chapter_service.generate(&flat, duration).await?;
            let _ = tx.send(format!("LOG:Generated {} chapters", chapters.len()));
            Ok(format_chapter_lines(&chapters, WRAP_WIDTH))
        }
        JobKind::Title => {
            let _ = tx.send("STATUS:Generating title...".to_string());
            let title = title_service.generate_title(&flat).await?;
            Ok(title)
        }
    }
}
