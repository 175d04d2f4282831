use ratatui::style::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDimensions {
    pub horizontal: usize,
    pub vertical: usize,
}

impl CharDimensions {
    pub fn new(horizontal: usize, vertical: usize) -> Self {
        Self { horizontal, vertical }
    }
}

/// Board cells blown up to terminal characters. Each logical cell covers
/// `horizontal x vertical` characters, each with its own style.
#[derive(Clone, Debug)]
pub struct CharGrid {
    chars: Vec<Vec<char>>,
    styles: Vec<Vec<Style>>,
    logical_width: usize,
    logical_height: usize,
    char_dims: CharDimensions,
}

impl CharGrid {
    pub fn new(logical_width: usize, logical_height: usize, char_dims: CharDimensions) -> Self {
        let physical_width = logical_width * char_dims.horizontal;
        let physical_height = logical_height * char_dims.vertical;
        Self {
            chars: vec![vec![' '; physical_width]; physical_height],
            styles: vec![vec![Style::default(); physical_width]; physical_height],
            logical_width,
            logical_height,
            char_dims,
        }
    }

    /// Out-of-range writes are clipped.
    pub fn set_logical_point(&mut self, x: usize, y: usize, pattern: &CharPattern) {
        let start_x = x * self.char_dims.horizontal;
        let start_y = y * self.char_dims.vertical;

        for (dy, row) in pattern.chars.iter().enumerate() {
            for (dx, &ch) in row.iter().enumerate() {
                let (row_y, col_x) = (start_y + dy, start_x + dx);
                if let Some(cell) = self.chars.get_mut(row_y).and_then(|r| r.get_mut(col_x)) {
                    *cell = ch;
                }
                if let Some(style) = self.styles.get_mut(row_y).and_then(|r| r.get_mut(col_x)) {
                    *style = pattern.style;
                }
            }
        }
    }

    pub fn fill(&mut self, pattern: &CharPattern) {
        for y in 0..self.logical_height {
            for x in 0..self.logical_width {
                self.set_logical_point(x, y, pattern);
            }
        }
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.chars.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn style_at(&self, x: usize, y: usize) -> Option<Style> {
        self.styles.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn into_lines(self) -> Vec<Vec<char>> {
        self.chars
    }

    pub fn into_styled_lines(self) -> Vec<(Vec<char>, Vec<Style>)> {
        self.chars.into_iter().zip(self.styles).collect()
    }

    pub fn char_dims(&self) -> CharDimensions {
        self.char_dims
    }

    pub fn physical_width(&self) -> usize {
        self.logical_width * self.char_dims.horizontal
    }

    pub fn physical_height(&self) -> usize {
        self.logical_height * self.char_dims.vertical
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CharPattern {
    pub chars: Vec<Vec<char>>,
    pub style: Style,
}

impl CharPattern {
    pub fn new(chars: Vec<Vec<char>>, style: Style) -> Self {
        Self { chars, style }
    }

    pub fn single(ch: char, dims: CharDimensions, style: Style) -> Self {
        Self::new(vec![vec![ch; dims.horizontal]; dims.vertical], style)
    }

    pub fn empty(dims: CharDimensions) -> Self {
        Self::single(' ', dims, Style::default())
    }
}
