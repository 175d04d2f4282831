pub mod game_over;
pub mod game_view;
pub mod start_screen;

pub use game_over::GameOverScreen;
pub use game_view::GameView;
pub use start_screen::StartScreen;

use crate::app::AppCommand;
use common::GameSnapshot;
use crossterm::event::KeyEvent;
use ratatui::Frame;

/// What every screen gets to look at while drawing.
pub struct ViewContext<'a> {
    pub player: &'a str,
    pub server: Option<&'a str>,
    pub snapshot: &'a GameSnapshot,
}

pub trait View {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand>;
    fn render(&self, frame: &mut Frame, ctx: &ViewContext);
}
