use crate::tui::app::{App, AppState, JobKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match &app.state {
        AppState::Home => draw_home(f, app),
        AppState::JobForm => draw_job_form(f, app),
        AppState::Processing { video_id } => {
            let video_id = video_id.clone();
            draw_processing(f, app, &video_id);
        }
        AppState::Results => draw_results(f, app),
    }
}

fn title_block(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn help_block(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn draw_home(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Menu
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_block("Chaptly"), chunks[0]);

    let options = ["Generate chapters", "Generate title", "Quit"];
    let menu_items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = i == app.selected_option;
            let marker = if selected { "●" } else { "○" };
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{marker} {option}"),
                style,
            )))
        })
        .collect();

    let menu = List::new(menu_items)
        .block(Block::default().borders(Borders::ALL).title("Mode"))
        .style(Style::default().fg(Color::White));
    f.render_widget(menu, chunks[1]);

    f.render_widget(
        help_block("[↑↓] Navigate  [Enter] Select  [q] Exit"),
        chunks[2],
    );
}

fn draw_job_form(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Length(3), // Languages input
            Constraint::Length(3), // Duration input
            Constraint::Min(0),    // Spacer
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let heading = match app.job_kind {
        JobKind::Chapters => "New chapter job",
        JobKind::Title => "New title job",
    };
    f.render_widget(title_block(heading), chunks[0]);

    app.url_input.render(f, chunks[1]);
    app.languages_input.render(f, chunks[2]);
    app.duration_input.render(f, chunks[3]);

    f.render_widget(
        help_block("[Enter] Next/Start  [Tab] Next field  [Esc] Back"),
        chunks[5],
    );
}

fn draw_processing(f: &mut Frame, app: &App, video_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Progress area
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_block("Processing..."), chunks[0]);
    app.progress.render(f, chunks[1], video_id);
    f.render_widget(help_block("[Esc] Cancel"), chunks[2]);
}

fn draw_results(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    if let Some(view) = &mut app.result_view {
        app.viewer_height = chunks[0].height;
        view.render(f, chunks[0]);
    }

    f.render_widget(
        help_block("[↑↓] Scroll  [PgUp/PgDn] Page  [Home/End] Jump  [Esc] Back"),
        chunks[1],
    );
}
