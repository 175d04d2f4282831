use common::{Direction, DirectionMailbox};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Arrow keys and WASD.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

/// Reads the terminal on its own thread. Direction keys go to the mailbox,
/// everything else is forwarded to the UI loop. The thread ends once the
/// receiving side hangs up or the terminal stops delivering events.
pub fn spawn_input_thread(mailbox: DirectionMailbox, keys: Sender<KeyEvent>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                error!("Failed to poll terminal events: {}", e);
                return;
            }
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => {
                error!("Failed to read terminal event: {}", e);
                return;
            }
        };

        if let Some(direction) = direction_for_key(key.code) {
            if !mailbox.post(direction) {
                trace!("Ignoring reversal to {}", direction);
            }
        } else if keys.send(key).is_err() {
            debug!("UI loop gone, stopping input thread");
            return;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_arrows_and_wasd() {
        assert_eq!(direction_for_key(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for_key(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(direction_for_key(KeyCode::Char('S')), Some(Direction::Down));
        assert_eq!(direction_for_key(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for_key(KeyCode::Char('q')), None);
        assert_eq!(direction_for_key(KeyCode::Enter), None);
    }
}
