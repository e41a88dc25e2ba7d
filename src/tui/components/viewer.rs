use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Scrollable view of a finished job's output. Chapter header lines
/// (`[HH:MM:SS] Title`) are highlighted; everything else renders as-is.
pub struct ResultView {
    pub content: String,
    pub scroll: usize,
    pub heading: String,
}

impl ResultView {
    pub fn new(content: String, heading: String) -> Self {
        Self {
            content,
            scroll: 0,
            heading,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: usize) -> bool {
        let page = area_height.saturating_sub(2);
        let lines = self.content.lines().count();

        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.scroll < lines.saturating_sub(page) {
                    self.scroll += 1;
                }
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(page);
                true
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + page).min(lines.saturating_sub(page));
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                self.scroll = lines.saturating_sub(page);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;

        let lines: Vec<Line> = self
            .content
            .lines()
            .skip(self.scroll)
            .take(visible)
            .map(|line| {
                if line.starts_with('[') {
                    Line::from(Span::styled(
                        line,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::raw(line))
                }
            })
            .collect();

        let total = self.content.lines().count();
        let scroll_info = if total > visible {
            format!(
                " (line {}-{} of {})",
                self.scroll + 1,
                (self.scroll + visible).min(total),
                total
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}{scroll_info}", self.heading));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }
}
