use common::render::CellKind;
use ratatui::style::{Color, Style};

use super::types::{CharDimensions, CharPattern};

/// How each kind of board cell looks in the terminal.
pub trait GlyphSet {
    fn char_dimensions(&self) -> CharDimensions;

    fn cell(&self, kind: CellKind) -> CharPattern;

    fn empty(&self) -> CharPattern {
        CharPattern::empty(self.char_dimensions())
    }
}

/// Block characters coloured with the game palette. 2x1 keeps cells
/// roughly square in most terminal fonts.
pub struct StandardGlyphs {
    char_dims: CharDimensions,
}

impl StandardGlyphs {
    pub fn new(char_dims: CharDimensions) -> Self {
        Self { char_dims }
    }
}

impl Default for StandardGlyphs {
    fn default() -> Self {
        Self::new(CharDimensions::new(2, 1))
    }
}

impl GlyphSet for StandardGlyphs {
    fn char_dimensions(&self) -> CharDimensions {
        self.char_dims
    }

    fn cell(&self, kind: CellKind) -> CharPattern {
        let ch = match kind {
            CellKind::Head => '█',
            CellKind::Body => '▓',
            CellKind::Food => '●',
        };
        CharPattern::single(ch, self.char_dims, Style::default().fg(palette_color(kind)))
    }
}

/// The RGBA palette mapped onto a 24-bit terminal colour.
pub fn palette_color(kind: CellKind) -> Color {
    let [r, g, b, _] = kind.color();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_game_colors() {
        assert_eq!(palette_color(CellKind::Head), Color::Rgb(0, 255, 0));
        assert_eq!(palette_color(CellKind::Body), Color::Rgb(0, 204, 0));
        assert_eq!(palette_color(CellKind::Food), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn patterns_fill_the_cell() {
        let glyphs = StandardGlyphs::new(CharDimensions::new(3, 2));
        let head = glyphs.cell(CellKind::Head);
        assert_eq!(head.chars, vec![vec!['█'; 3]; 2]);
        assert_eq!(glyphs.empty().chars, vec![vec![' '; 3]; 2]);
    }
}
