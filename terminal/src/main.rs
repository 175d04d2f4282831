use anyhow::{Context, Result};
use clap::Parser;
use common::{DirectionMailbox, GameConfig};
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

use terminal::app::{App, AppCommand, AppOptions};
use terminal::input::spawn_input_thread;

/// Redraw at least this often even when nothing happens.
const IDLE_FRAME: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "snake-terminal", about = "Play Snake in the terminal")]
struct Args {
    /// Score service base URL, e.g. http://localhost:5000
    #[arg(long)]
    server: Option<String>,

    /// Name scores are submitted under
    #[arg(long, default_value = "player")]
    player: String,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here. Without it nothing is logged
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mailbox = DirectionMailbox::new();
    let options = AppOptions {
        player: args.player,
        seed: args.seed.unwrap_or_else(seed_from_time),
        server: args.server,
        config: GameConfig::default(),
    };
    let mut app = App::new(options, mailbox.clone())?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (key_tx, key_rx) = mpsc::channel();
    spawn_input_thread(mailbox, key_tx);

    // Run app
    let res = run_app(&mut terminal, &mut app, &key_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, keys: &Receiver<KeyEvent>) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let wait = app
            .time_until_next_tick(Instant::now())
            .map_or(IDLE_FRAME, |until| until.min(IDLE_FRAME));
        match keys.recv_timeout(wait) {
            Ok(key) => match app.handle_input(key) {
                Some(AppCommand::Quit) => return Ok(()),
                Some(command) => app.handle_command(command),
                None => {}
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => anyhow::bail!("Input thread stopped"),
        }

        app.update(Instant::now());
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
