use anyhow::{Context, Result};
use common::score::ScoreRecord;
use common::{DirectionMailbox, GameConfig, GameLoop, SimulationEngine, Termination};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::clock::IntervalTimer;
use crate::score_client::ScoreClient;
use crate::views::{GameOverScreen, GameView, StartScreen, View, ViewContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
    StartGame,
    BackToMenu,
}

pub enum AppState {
    Start(StartScreen),
    Playing(GameView),
    GameOver(Box<GameOverScreen>),
}

pub struct AppOptions {
    pub player: String,
    pub seed: u64,
    pub server: Option<String>,
    pub config: GameConfig,
}

pub struct App {
    pub state: AppState,
    engine: SimulationEngine,
    game_loop: GameLoop,
    clock: IntervalTimer,
    mailbox: DirectionMailbox,
    score_client: Option<ScoreClient>,
    player: String,
}

impl App {
    /// `mailbox` is the one the input thread posts direction keys to.
    pub fn new(options: AppOptions, mailbox: DirectionMailbox) -> Result<Self> {
        let engine = SimulationEngine::with_seed(options.config, options.seed)
            .context("Invalid game configuration")?;
        let score_client = options
            .server
            .as_deref()
            .map(ScoreClient::new)
            .transpose()?;

        Ok(Self {
            state: AppState::Start(StartScreen),
            engine,
            game_loop: GameLoop::new(),
            clock: IntervalTimer::new(),
            mailbox,
            score_client,
            player: options.player,
        })
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match &mut self.state {
            AppState::Start(screen) => screen.handle_input(key),
            AppState::Playing(view) => view.handle_input(key),
            AppState::GameOver(screen) => screen.handle_input(key),
        }
    }

    pub fn handle_command(&mut self, command: AppCommand) {
        match command {
            AppCommand::StartGame => self.start_game(),
            AppCommand::BackToMenu => {
                self.game_loop.stop(&mut self.clock);
                self.state = AppState::Start(StartScreen);
            }
            AppCommand::Quit => {
                // Handled in main loop
            }
        }
    }

    pub fn start_game(&mut self) {
        self.engine.restart();
        // Keys pressed on the menu must not steer the new game
        self.mailbox.take();
        self.mailbox.set_heading(self.engine.heading());
        self.game_loop.start(&self.engine, &mut self.clock);
        self.state = AppState::Playing(GameView);
        info!("Game started for {}", self.player);
    }

    /// Steps the engine when the clock is due. The latest direction key is
    /// applied right before the step.
    pub fn update(&mut self, now: Instant) {
        if !matches!(self.state, AppState::Playing(_)) || !self.clock.poll(now) {
            return;
        }

        if let Some(direction) = self.mailbox.take() {
            self.engine.request_direction(direction);
        }
        let outcome = self.game_loop.tick(&mut self.engine, &mut self.clock);
        self.mailbox.set_heading(self.engine.heading());
        if let Some(termination) = outcome.terminated {
            self.finish(termination);
        }
    }

    /// How long the UI loop may wait for input before the next step is due.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        match self.state {
            AppState::Playing(_) => self.clock.time_until_due(now),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let snapshot = self.engine.snapshot();
        let ctx = ViewContext {
            player: &self.player,
            server: self.score_client.as_ref().map(ScoreClient::base_url),
            snapshot: &snapshot,
        };
        match &self.state {
            AppState::Start(screen) => screen.render(frame, &ctx),
            AppState::Playing(view) => view.render(frame, &ctx),
            AppState::GameOver(screen) => screen.render(frame, &ctx),
        }
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn clock(&self) -> &IntervalTimer {
        &self.clock
    }

    fn finish(&mut self, termination: Termination) {
        info!(
            "Game over for {}: {} points ({:?})",
            self.player, termination.final_score, termination.reason
        );
        let mut screen = GameOverScreen::new(termination);
        if let Some(client) = &self.score_client {
            screen.status = Some(match client.submit(&self.player, termination.final_score) {
                Ok(saved) => format!("Saved {} points for {}", saved.score, saved.player),
                Err(e) => {
                    warn!("Score submission failed: {:#}", e);
                    format!("Score not saved: {}", e)
                }
            });
            screen.high_scores = fetch_high_scores(client);
        }
        self.state = AppState::GameOver(Box::new(screen));
    }
}

fn fetch_high_scores(client: &ScoreClient) -> Vec<ScoreRecord> {
    client.high_scores().unwrap_or_else(|e| {
        warn!("Failed to fetch high scores: {:#}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Direction, Position, TerminationReason};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn app(config: GameConfig) -> (App, DirectionMailbox) {
        let mailbox = DirectionMailbox::new();
        let options = AppOptions {
            player: "tester".to_string(),
            seed: 42,
            server: None,
            config,
        };
        (App::new(options, mailbox.clone()).unwrap(), mailbox)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tick(app: &mut App) {
        let due = app.clock().next_due().expect("clock should be running");
        app.update(due);
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn menu_starts_and_quits() {
        let (mut app, _) = app(GameConfig::default());
        assert_eq!(app.handle_input(key(KeyCode::Enter)), Some(AppCommand::StartGame));
        assert_eq!(app.handle_input(key(KeyCode::Char('q'))), Some(AppCommand::Quit));
        assert!(screen_text(&app).contains("SNAKE"));
    }

    #[test]
    fn steps_only_when_due() {
        let (mut app, _) = app(GameConfig::default());
        app.update(Instant::now() + Duration::from_secs(5));
        assert_eq!(app.engine().snapshot().head(), Some(Position::new(10, 10)));

        app.handle_command(AppCommand::StartGame);
        assert!(app.time_until_next_tick(Instant::now()).is_some());
        tick(&mut app);
        assert_eq!(app.engine().snapshot().head(), Some(Position::new(11, 10)));
        assert!(screen_text(&app).contains("Score: "));
    }

    #[test]
    fn mailbox_steers_the_next_step() {
        let (mut app, mailbox) = app(GameConfig::default());
        mailbox.post(Direction::Down);
        app.handle_command(AppCommand::StartGame);
        tick(&mut app);
        assert_eq!(app.engine().heading(), Direction::Right);

        mailbox.post(Direction::Left);
        mailbox.post(Direction::Up);
        tick(&mut app);
        assert_eq!(app.engine().heading(), Direction::Up);
        assert_eq!(app.engine().snapshot().head(), Some(Position::new(11, 9)));
    }

    #[test]
    fn turn_survives_a_later_reversal() {
        let (mut app, mailbox) = app(GameConfig::default());
        app.handle_command(AppCommand::StartGame);

        assert!(mailbox.post(Direction::Up));
        assert!(!mailbox.post(Direction::Left));
        tick(&mut app);
        assert_eq!(app.engine().heading(), Direction::Up);
        assert_eq!(app.engine().snapshot().head(), Some(Position::new(10, 9)));

        // The heading in effect is now Up, so Down is the reversal
        assert!(!mailbox.post(Direction::Down));
        tick(&mut app);
        assert_eq!(app.engine().snapshot().head(), Some(Position::new(10, 8)));
    }

    #[test]
    fn wall_hit_shows_game_over_and_restart_works() {
        let (mut app, _) = app(GameConfig::with_grid_size(5));
        app.handle_command(AppCommand::StartGame);
        for _ in 0..3 {
            tick(&mut app);
        }

        match &app.state {
            AppState::GameOver(screen) => {
                assert_eq!(screen.termination.reason, TerminationReason::WallCollision);
                assert!(screen.high_scores.is_empty());
                assert!(screen.status.is_none());
            }
            _ => panic!("expected game over screen"),
        }
        assert!(!app.clock().is_running());
        assert!(screen_text(&app).contains("GAME OVER"));

        assert_eq!(app.handle_input(key(KeyCode::Char('r'))), Some(AppCommand::StartGame));
        app.handle_command(AppCommand::StartGame);
        assert!(matches!(app.state, AppState::Playing(_)));
        assert!(!app.engine().is_terminated());
    }

    #[test]
    fn abandoning_returns_to_menu() {
        let (mut app, _) = app(GameConfig::default());
        app.handle_command(AppCommand::StartGame);
        let command = app.handle_input(key(KeyCode::Esc));
        assert_eq!(command, Some(AppCommand::BackToMenu));
        app.handle_command(AppCommand::BackToMenu);

        assert!(matches!(app.state, AppState::Start(_)));
        assert!(!app.clock().is_running());
        assert_eq!(app.time_until_next_tick(Instant::now()), None);
    }
}
