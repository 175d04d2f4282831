pub mod board;
pub mod glyphs;
pub mod types;

pub use board::CharGridRenderer;
pub use glyphs::{GlyphSet, StandardGlyphs};
pub use types::{CharDimensions, CharGrid, CharPattern};
