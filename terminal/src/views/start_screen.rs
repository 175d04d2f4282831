use super::{View, ViewContext};
use crate::app::AppCommand;
use common::SPEED_UP_SCORE_THRESHOLD;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Default)]
pub struct StartScreen;

impl View for StartScreen {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(AppCommand::StartGame),
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Quit),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        let title = Paragraph::new("SNAKE")
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let scores = match ctx.server {
            Some(server) => format!("Scores go to {}", server),
            None => "Offline: scores are not saved".to_string(),
        };
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("Player: "),
                Span::styled(ctx.player.to_string(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(scores, Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from("Steer with the arrow keys or WASD."),
            Line::from(format!(
                "Eat food to grow. Every {} points the snake speeds up.",
                SPEED_UP_SCORE_THRESHOLD
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Start   [q] Quit",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);
    }
}
