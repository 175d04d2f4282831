use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCell {
    pub position: Position,
    pub is_head: bool,
}

/// Everything a renderer needs for one frame: the snake head first, and food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub cells: Vec<RenderCell>,
    pub food: Option<Position>,
}

impl RenderFrame {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let cells = snapshot
            .snake
            .iter()
            .enumerate()
            .map(|(i, &position)| RenderCell {
                position,
                is_head: i == 0,
            })
            .collect();
        RenderFrame {
            cells,
            food: snapshot.food,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Head,
    Body,
    Food,
}

impl CellKind {
    /// RGBA fill colour
    pub fn color(self) -> [f32; 4] {
        match self {
            CellKind::Head => [0.0, 1.0, 0.0, 1.0],
            CellKind::Body => [0.0, 0.8, 0.0, 1.0],
            CellKind::Food => [1.0, 0.0, 0.0, 1.0],
        }
    }
}

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Draw target. Implementations only paint; they never look at game rules.
pub trait Renderer {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn fill_cell(&mut self, position: Position, kind: CellKind) -> Result<(), Self::Error>;
}

/// Draw one frame: clear, one fill per snake cell, then the food.
/// A frame without a snake is a transient during setup and draws nothing.
pub fn draw<R: Renderer>(renderer: &mut R, frame: &RenderFrame) -> Result<(), R::Error> {
    if frame.cells.is_empty() {
        return Ok(());
    }

    renderer.clear()?;
    for cell in &frame.cells {
        let kind = if cell.is_head { CellKind::Head } else { CellKind::Body };
        renderer.fill_cell(cell.position, kind)?;
    }
    if let Some(food) = frame.food {
        renderer.fill_cell(food, CellKind::Food)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Rectangle in clip space, where y points up and both axes span [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ClipRect {
    /// Two triangles covering the rectangle, as `(x, y)` pairs.
    pub fn triangles(&self) -> [f32; 12] {
        let ClipRect { left, top, right, bottom } = *self;
        [
            left, top, right, top, left, bottom,
            left, bottom, right, top, right, bottom,
        ]
    }
}

/// Maps grid cells onto a square surface of `grid_size * cell_size` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub grid_size: u16,
    pub cell_size: f32,
}

impl Viewport {
    pub fn new(grid_size: u16, cell_size: f32) -> Self {
        Viewport { grid_size, cell_size }
    }

    /// Side length of the surface in pixels
    pub fn extent(&self) -> f32 {
        self.grid_size as f32 * self.cell_size
    }

    pub fn pixel_rect(&self, position: Position) -> PixelRect {
        PixelRect {
            x: position.x as f32 * self.cell_size,
            y: position.y as f32 * self.cell_size,
            width: self.cell_size,
            height: self.cell_size,
        }
    }

    /// Row 0 ends up at the top of the surface.
    pub fn clip_rect(&self, position: Position) -> ClipRect {
        let extent = self.extent();
        let rect = self.pixel_rect(position);
        ClipRect {
            left: rect.x / extent * 2.0 - 1.0,
            top: 1.0 - rect.y / extent * 2.0,
            right: (rect.x + rect.width) / extent * 2.0 - 1.0,
            bottom: 1.0 - (rect.y + rect.height) / extent * 2.0,
        }
    }
}

/// Renderer that records its calls; handy for tests of anything that draws.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub clears: usize,
    pub fills: Vec<(Position, CellKind)>,
}

impl Renderer for RecordingRenderer {
    type Error = std::convert::Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.clears += 1;
        Ok(())
    }

    fn fill_cell(&mut self, position: Position, kind: CellKind) -> Result<(), Self::Error> {
        self.fills.push((position, kind));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, SessionStatus};

    fn snapshot(snake: Vec<Position>, food: Option<Position>) -> GameSnapshot {
        GameSnapshot {
            grid_size: 20,
            snake,
            food,
            heading: Direction::Right,
            score: 0,
            tick_interval_ms: 150,
            status: SessionStatus::Running,
        }
    }

    #[test]
    fn one_fill_per_cell_with_head_marked() {
        let frame = RenderFrame::from_snapshot(&snapshot(
            vec![Position::new(3, 2), Position::new(2, 2), Position::new(1, 2)],
            Some(Position::new(8, 8)),
        ));
        let mut renderer = RecordingRenderer::default();
        draw(&mut renderer, &frame).unwrap();

        assert_eq!(renderer.clears, 1);
        assert_eq!(
            renderer.fills,
            vec![
                (Position::new(3, 2), CellKind::Head),
                (Position::new(2, 2), CellKind::Body),
                (Position::new(1, 2), CellKind::Body),
                (Position::new(8, 8), CellKind::Food),
            ]
        );
    }

    #[test]
    fn empty_snake_draws_nothing() {
        let frame = RenderFrame::from_snapshot(&snapshot(Vec::new(), Some(Position::new(1, 1))));
        let mut renderer = RecordingRenderer::default();
        draw(&mut renderer, &frame).unwrap();
        assert_eq!(renderer.clears, 0);
        assert!(renderer.fills.is_empty());
    }

    #[test]
    fn pixel_rect_scales_linearly() {
        let viewport = Viewport::new(20, 20.0);
        assert_eq!(viewport.extent(), 400.0);
        assert_eq!(
            viewport.pixel_rect(Position::new(3, 5)),
            PixelRect { x: 60.0, y: 100.0, width: 20.0, height: 20.0 }
        );
    }

    #[test]
    fn clip_rect_flips_vertically() {
        let viewport = Viewport::new(20, 20.0);

        let close = |a: f32, b: f32| (a - b).abs() < 1e-6;

        let top_left = viewport.clip_rect(Position::new(0, 0));
        assert!(close(top_left.left, -1.0));
        assert!(close(top_left.top, 1.0));
        assert!(close(top_left.right, -0.9));
        assert!(close(top_left.bottom, 0.9));

        let bottom_right = viewport.clip_rect(Position::new(19, 19));
        assert!(close(bottom_right.right, 1.0));
        assert!(close(bottom_right.bottom, -1.0));
        assert!(bottom_right.top > bottom_right.bottom);
    }

    #[test]
    fn triangles_cover_the_rect_corners() {
        let rect = ClipRect { left: -1.0, top: 1.0, right: 0.0, bottom: 0.0 };
        let vertices = rect.triangles();
        assert_eq!(&vertices[..6], &[-1.0, 1.0, 0.0, 1.0, -1.0, 0.0]);
        assert_eq!(&vertices[6..], &[-1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
