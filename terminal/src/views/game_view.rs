use super::{View, ViewContext};
use crate::app::AppCommand;
use crate::render::{CharGridRenderer, StandardGlyphs};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// The board while a game is running.
#[derive(Debug, Default)]
pub struct GameView;

impl View for GameView {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::BackToMenu),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let snapshot = ctx.snapshot;
        let header = Paragraph::new(format!(
            "{} | Score: {} | Tick: {} ms",
            ctx.player, snapshot.score, snapshot.tick_interval_ms
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        render_board(frame, chunks[1], ctx);

        let controls = Paragraph::new("[Arrows/WASD] Steer   [q] Abandon")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(controls, chunks[2]);
    }
}

/// Board centred in `area` with a box drawn around it.
pub fn render_board(frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let mut renderer = CharGridRenderer::new(ctx.snapshot.grid_size, StandardGlyphs::default());
    renderer.render(ctx.snapshot);
    let grid = renderer.into_grid();

    let board_width = grid.physical_width();
    let board_height = grid.physical_height() + 2;
    let x_offset = area.width.saturating_sub(board_width as u16 + 2) / 2;
    let y_offset = area.height.saturating_sub(board_height as u16) / 2;
    let padding = " ".repeat(x_offset as usize);
    let border = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = Vec::with_capacity(board_height + y_offset as usize);
    for _ in 0..y_offset {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("{}┌{}┐", padding, "─".repeat(board_width)),
        border,
    )));
    for (chars, styles) in grid.into_styled_lines() {
        let mut spans = Vec::with_capacity(chars.len() + 3);
        spans.push(Span::raw(padding.clone()));
        spans.push(Span::styled("│", border));
        for (ch, style) in chars.into_iter().zip(styles) {
            spans.push(Span::styled(ch.to_string(), style));
        }
        spans.push(Span::styled("│", border));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        format!("{}└{}┘", padding, "─".repeat(board_width)),
        border,
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
