//! Shape catalog: the seven piece kinds as 4x4 cell frames.

/// Side of the square frame every shape lives and rotates in.
pub const FRAME: usize = 4;

/// Occupancy of a piece's bounding frame, indexed `[row][col]`.
pub type Cells = [[bool; FRAME]; FRAME];

/// Tetromino kinds (I, O, T, Z, S, L, J).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    Z,
    S,
    L,
    J,
}

const X: bool = true;
const O: bool = false;

// Reference orientations, packed into the top-left corner of the frame.
const I_CELLS: Cells = [[X, X, X, X], [O, O, O, O], [O, O, O, O], [O, O, O, O]];
const O_CELLS: Cells = [[X, X, O, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]];
const T_CELLS: Cells = [[O, X, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]];
const Z_CELLS: Cells = [[X, X, O, O], [O, X, X, O], [O, O, O, O], [O, O, O, O]];
const S_CELLS: Cells = [[O, X, X, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]];
const L_CELLS: Cells = [[X, X, X, O], [X, O, O, O], [O, O, O, O], [O, O, O, O]];
const J_CELLS: Cells = [[X, X, X, O], [O, O, X, O], [O, O, O, O], [O, O, O, O]];

impl ShapeKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::Z, Self::S, Self::L, Self::J];

    /// Reference cell frame for this kind.
    pub fn cells(&self) -> &'static Cells {
        match self {
            Self::I => &I_CELLS,
            Self::O => &O_CELLS,
            Self::T => &T_CELLS,
            Self::Z => &Z_CELLS,
            Self::S => &S_CELLS,
            Self::L => &L_CELLS,
            Self::J => &J_CELLS,
        }
    }

    /// Colour tag 0..7 for `Theme::piece_color`.
    pub fn color_index(&self) -> u8 {
        match self {
            Self::I => 0, // Cyan
            Self::O => 1, // Yellow
            Self::T => 2, // Magenta
            Self::Z => 3, // Red
            Self::S => 4, // Green
            Self::L => 5, // Orange
            Self::J => 6, // Blue
        }
    }
}

/// Occupied `(row, col)` offsets of a frame, row-major.
pub fn occupied(cells: &Cells) -> impl Iterator<Item = (usize, usize)> + '_ {
    cells.iter().enumerate().flat_map(|(i, row)| {
        row.iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(move |(j, _)| (i, j))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_four_cells() {
        for kind in ShapeKind::ALL {
            assert_eq!(occupied(kind.cells()).count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn color_tags_are_distinct() {
        let mut seen: Vec<u8> = ShapeKind::ALL.iter().map(ShapeKind::color_index).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ShapeKind::ALL.len());
    }
}
