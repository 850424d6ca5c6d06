//! Positioned, oriented piece and its board-relative queries.

use crate::board::{Board, HEIGHT, WIDTH};
use crate::shapes::{Cells, FRAME, ShapeKind, occupied};

/// Current piece: kind, top-left of its frame in board coordinates, and its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    x: i32,
    y: i32,
    cells: Cells,
}

impl Piece {
    pub fn new(kind: ShapeKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            cells: *kind.cells(),
        }
    }

    #[cfg(test)]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Replace the cell frame. Callers validate with [`Piece::is_valid_move`] first.
    pub fn set_cells(&mut self, cells: Cells) {
        self.cells = cells;
    }

    /// Colour tag; fixed by the kind, unaffected by rotation.
    pub fn color_index(&self) -> u8 {
        self.kind.color_index()
    }

    /// The cells turned 90° clockwise inside the fixed 4x4 frame. Does not touch `self`.
    pub fn rotated(&self) -> Cells {
        rotate_cw(&self.cells)
    }

    /// Board coordinates of every occupied cell at the current position.
    pub fn board_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        occupied(&self.cells).map(|(i, j)| (self.x + j as i32, self.y + i as i32))
    }

    /// True if `cells` placed with its frame at (new_x, new_y) stays inside the
    /// side walls and above the floor without overlapping locked cells.
    /// Rows above the top edge are not checked against the board.
    pub fn is_valid_move(&self, new_x: i32, new_y: i32, cells: &Cells, board: &Board) -> bool {
        occupied(cells).all(|(i, j)| {
            let bx = new_x + j as i32;
            let by = new_y + i as i32;
            if bx < 0 || bx >= WIDTH as i32 || by >= HEIGHT as i32 {
                return false;
            }
            by < 0 || !board.is_filled(bx as usize, by as usize)
        })
    }

    /// True if the piece fits where it is.
    pub fn fits(&self, board: &Board) -> bool {
        self.is_valid_move(self.x, self.y, &self.cells, board)
    }

    /// Marks every occupied cell on the board. Only call on a valid position.
    pub fn merge_to_board(&self, board: &mut Board) {
        for (bx, by) in self.board_cells() {
            if bx >= 0 && by >= 0 {
                board.fill(bx as usize, by as usize);
            }
        }
    }
}

/// Cell (i, j) moves to (j, FRAME-1-i).
pub fn rotate_cw(cells: &Cells) -> Cells {
    let mut out = [[false; FRAME]; FRAME];
    for (i, row) in cells.iter().enumerate() {
        for (j, &filled) in row.iter().enumerate() {
            out[j][FRAME - 1 - i] = filled;
        }
    }
    out
}
