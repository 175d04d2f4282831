use super::game_view::render_board;
use super::{View, ViewContext};
use crate::app::AppCommand;
use common::score::ScoreRecord;
use common::{Termination, TerminationReason};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Final score, the board as it ended and the public high score table when
/// a score service is configured.
#[derive(Debug)]
pub struct GameOverScreen {
    pub termination: Termination,
    pub high_scores: Vec<ScoreRecord>,
    pub status: Option<String>,
}

impl GameOverScreen {
    pub fn new(termination: Termination) -> Self {
        Self {
            termination,
            high_scores: Vec::new(),
            status: None,
        }
    }

    fn reason_text(&self) -> &'static str {
        match self.termination.reason {
            TerminationReason::WallCollision => "Hit the wall",
            TerminationReason::SelfCollision => "Bit its own tail",
            TerminationReason::BoardFull => "Filled the whole board",
        }
    }
}

impl View for GameOverScreen {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => Some(AppCommand::StartGame),
            KeyCode::Char('m') | KeyCode::Esc => Some(AppCommand::BackToMenu),
            KeyCode::Char('q') => Some(AppCommand::Quit),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, ctx: &ViewContext) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(frame.area());

        render_board(frame, columns[0], ctx);

        let info = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0), Constraint::Length(1)])
            .split(columns[1]);

        let mut summary = vec![
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(self.reason_text()),
            Line::from(format!("{} scored {}", ctx.player, self.termination.final_score)),
        ];
        if let Some(status) = &self.status {
            summary.push(Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let summary = Paragraph::new(summary)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(summary, info[0]);

        let items: Vec<ListItem> = if self.high_scores.is_empty() {
            vec![ListItem::new("No scores yet")]
        } else {
            self.high_scores
                .iter()
                .enumerate()
                .map(|(rank, record)| {
                    let style = if record.player == ctx.player
                        && record.score == self.termination.final_score
                    {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    ListItem::new(format!("{:>2}. {:<20} {:>6}", rank + 1, record.player, record.score))
                        .style(style)
                })
                .collect()
        };
        let list = List::new(items).block(Block::default().title("High Scores").borders(Borders::ALL));
        frame.render_widget(list, info[1]);

        let controls = Paragraph::new("[Enter] Play again   [m] Menu   [q] Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(controls, info[2]);
    }
}
