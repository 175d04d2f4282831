mod clock;
mod constants;
mod game_engine;
mod game_state;
mod mailbox;
mod snake;

pub mod render;
pub mod score;
pub mod util;

pub use clock::*;
pub use constants::*;
pub use game_engine::*;
pub use game_state::*;
pub use mailbox::*;
pub use snake::*;
pub use util::{PseudoRandom, RandomSource};
