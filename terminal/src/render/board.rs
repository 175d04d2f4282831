use common::render::{self, CellKind, RenderFrame, Renderer};
use common::{GameSnapshot, Position};
use std::convert::Infallible;

use super::glyphs::GlyphSet;
use super::types::CharGrid;

/// Draws frames into a [`CharGrid`] sized to the board.
pub struct CharGridRenderer<G: GlyphSet> {
    glyphs: G,
    grid_size: u16,
    grid: CharGrid,
}

impl<G: GlyphSet> CharGridRenderer<G> {
    pub fn new(grid_size: u16, glyphs: G) -> Self {
        let size = grid_size as usize;
        let grid = CharGrid::new(size, size, glyphs.char_dimensions());
        Self { glyphs, grid_size, grid }
    }

    /// Draws the snapshot and hands back the grid. An empty snake leaves the
    /// previous contents untouched.
    pub fn render(&mut self, snapshot: &GameSnapshot) -> &CharGrid {
        let frame = RenderFrame::from_snapshot(snapshot);
        match render::draw(self, &frame) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        &self.grid
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn into_grid(self) -> CharGrid {
        self.grid
    }
}

impl<G: GlyphSet> Renderer for CharGridRenderer<G> {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.grid.fill(&self.glyphs.empty());
        Ok(())
    }

    fn fill_cell(&mut self, position: Position, kind: CellKind) -> Result<(), Infallible> {
        if position.in_bounds(self.grid_size) {
            let pattern = self.glyphs.cell(kind);
            self.grid
                .set_logical_point(position.x as usize, position.y as usize, &pattern);
        }
        Ok(())
    }
}
