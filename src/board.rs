//! Playfield occupancy grid and line clearing.

/// Board width in cells.
pub const WIDTH: usize = 10;
/// Board height in cells.
pub const HEIGHT: usize = 20;

/// Fixed WIDTH x HEIGHT grid of occupancy bits. y=0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// rows[y][x]; rows[0] is top.
    rows: [[bool; WIDTH]; HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [[false; WIDTH]; HEIGHT],
        }
    }

    #[inline]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.rows[y][x]
    }

    /// Mark (x, y) occupied. Out-of-range coordinates are ignored.
    #[inline]
    pub fn fill(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = true;
        }
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.rows
    }

    pub fn row_is_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|&c| c)
    }

    /// Removes every full row, shifting the rows above it down and inserting
    /// empty rows at the top. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = HEIGHT;
        while y > 0 {
            if self.row_is_full(y - 1) {
                self.rows.copy_within(0..y - 1, 1);
                self.rows[0] = [false; WIDTH];
                cleared += 1;
                // Same index again: it now holds the row that was above.
            } else {
                y -= 1;
            }
        }
        cleared
    }
}
