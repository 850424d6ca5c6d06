//! Game session: board, current and next piece, score, fall timer.
//!
//! One tick is `apply_command` followed by `advance_time`. Both complete the
//! whole transition (moves, gravity, locking, line clears, respawn) before
//! returning, so a renderer only ever sees settled state.

use crate::board::Board;
use crate::piece::Piece;
use crate::spawner::Spawner;

/// Time between gravity steps.
pub const FALL_INTERVAL_MS: u64 = 500;

/// Score awarded per cleared row.
pub const LINE_BONUS: u32 = 10;

/// Abstract per-tick command from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// A freshly spawned piece collided with the stack.
    GameOver,
    /// The player quit.
    Stopped,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current: Piece,
    next: Piece,
    spawner: Spawner,
    score: u32,
    lines_cleared: u32,
    elapsed_since_fall_ms: u64,
    status: Status,
}

impl GameSession {
    /// Empty board, current and next drawn from `spawner`.
    pub fn new(mut spawner: Spawner) -> Self {
        let current = spawner.next_piece();
        let next = spawner.next_piece();
        Self {
            board: Board::new(),
            current,
            next,
            spawner,
            score: 0,
            lines_cleared: 0,
            elapsed_since_fall_ms: 0,
            status: Status::Running,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Applies one command. Blocked moves and rotations are silently dropped.
    /// No-op once the session is no longer running.
    pub fn apply_command(&mut self, cmd: Command) {
        if !self.is_running() {
            return;
        }
        match cmd {
            Command::MoveLeft => {
                self.try_shift(-1, 0);
            }
            Command::MoveRight => {
                self.try_shift(1, 0);
            }
            Command::MoveDown => {
                self.try_shift(0, 1);
            }
            Command::Rotate => self.try_rotate(),
            Command::Quit => self.status = Status::Stopped,
            Command::None => {}
        }
    }

    /// Feeds elapsed time into the fall timer and runs one gravity step per
    /// full interval accumulated. No-op once the session is no longer running.
    pub fn advance_time(&mut self, elapsed_ms: u64) {
        if !self.is_running() {
            return;
        }
        self.elapsed_since_fall_ms = self.elapsed_since_fall_ms.saturating_add(elapsed_ms);
        while self.elapsed_since_fall_ms >= FALL_INTERVAL_MS {
            self.elapsed_since_fall_ms -= FALL_INTERVAL_MS;
            self.gravity_step();
            if !self.is_running() {
                break;
            }
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let (x, y) = (self.current.x() + dx, self.current.y() + dy);
        if !self
            .current
            .is_valid_move(x, y, self.current.cells(), &self.board)
        {
            return false;
        }
        self.current.set_x(x);
        self.current.set_y(y);
        true
    }

    /// Rotation in place; no kick search.
    fn try_rotate(&mut self) {
        let rotated = self.current.rotated();
        if self
            .current
            .is_valid_move(self.current.x(), self.current.y(), &rotated, &self.board)
        {
            self.current.set_cells(rotated);
        }
    }

    fn gravity_step(&mut self) {
        if !self.try_shift(0, 1) {
            self.lock();
        }
    }

    /// Merge, clear rows, promote next, spawn a new next, check spawn.
    fn lock(&mut self) {
        self.current.merge_to_board(&mut self.board);
        let cleared = self.board.clear_full_rows();
        self.lines_cleared += cleared;
        self.score += cleared * LINE_BONUS;

        let fresh = self.spawner.next_piece();
        self.current = std::mem::replace(&mut self.next, fresh);
        if !self.current.fits(&self.board) {
            self.status = Status::GameOver;
        }
    }
}

#[cfg(test)]
impl GameSession {
    /// Session with a prepared board and current piece.
    fn with_setup(board: Board, current: Piece, seed: u64) -> Self {
        let mut session = Self::new(Spawner::seeded(seed));
        session.board = board;
        session.current = current;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{HEIGHT, WIDTH};
    use crate::shapes::ShapeKind;
    use crate::spawner::{SPAWN_X, SPAWN_Y};

    fn fresh(seed: u64) -> GameSession {
        GameSession::new(Spawner::seeded(seed))
    }

    #[test]
    fn test_new_session() {
        let s = fresh(3);
        assert_eq!(s.score(), 0);
        assert_eq!(s.status(), Status::Running);
        assert_eq!(s.board(), &Board::new());
        assert_eq!((s.current().x(), s.current().y()), (SPAWN_X, SPAWN_Y));
        assert_eq!((s.next_piece().x(), s.next_piece().y()), (SPAWN_X, SPAWN_Y));
    }

    #[test]
    fn test_one_interval_drops_one_row() {
        let mut s = fresh(11);
        assert_eq!((s.current().x(), s.current().y()), (3, 0));
        s.advance_time(500);
        assert_eq!((s.current().x(), s.current().y()), (3, 1));
        assert_eq!(s.score(), 0);
        assert!(s.is_running());
    }

    #[test]
    fn test_timer_accumulates_across_ticks() {
        let mut s = fresh(5);
        for _ in 0..9 {
            s.advance_time(50);
        }
        assert_eq!(s.current().y(), 0);
        s.advance_time(50);
        assert_eq!(s.current().y(), 1);
    }

    #[test]
    fn test_delayed_tick_catches_up() {
        let mut s = fresh(9);
        s.advance_time(1500);
        assert_eq!(s.current().y(), 3);
        s.advance_time(250);
        s.advance_time(250);
        assert_eq!(s.current().y(), 4);
    }

    #[test]
    fn test_move_left_at_wall_is_silent() {
        let piece = Piece::new(ShapeKind::T, 0, 5);
        let mut s = GameSession::with_setup(Board::new(), piece.clone(), 1);
        s.apply_command(Command::MoveLeft);
        assert_eq!(s.current(), &piece);
        assert!(s.is_running());
    }

    #[test]
    fn test_moves_translate_one_cell() {
        let mut s = fresh(2);
        s.apply_command(Command::MoveRight);
        assert_eq!(s.current().x(), 4);
        s.apply_command(Command::MoveLeft);
        s.apply_command(Command::MoveLeft);
        assert_eq!(s.current().x(), 2);
        s.apply_command(Command::MoveDown);
        assert_eq!(s.current().y(), 1);
        s.apply_command(Command::None);
        assert_eq!((s.current().x(), s.current().y()), (2, 1));
    }

    #[test]
    fn test_move_down_on_floor_does_not_lock() {
        let piece = Piece::new(ShapeKind::O, 0, HEIGHT as i32 - 2);
        let mut s = GameSession::with_setup(Board::new(), piece.clone(), 1);
        s.apply_command(Command::MoveDown);
        assert_eq!(s.current(), &piece);
        assert_eq!(s.board(), &Board::new());
    }

    #[test]
    fn test_rotation_blocked_at_wall() {
        // Vertical I sits in frame column 3, so x=-3 puts it on board column 0.
        let mut piece = Piece::new(ShapeKind::I, -3, 5);
        piece.set_cells(piece.rotated());
        let mut s = GameSession::with_setup(Board::new(), piece.clone(), 1);
        assert!(s.current().fits(s.board()));

        // Turning it would lay it along frame row 3, i.e. columns -3..=0.
        s.apply_command(Command::Rotate);
        assert_eq!(s.current(), &piece);
    }

    #[test]
    fn test_rotation_blocked_by_stack() {
        let mut board = Board::new();
        board.fill(9, 6);
        let piece = Piece::new(ShapeKind::I, 6, 5);
        let mut s = GameSession::with_setup(board, piece.clone(), 1);
        s.apply_command(Command::Rotate);
        assert_eq!(s.current(), &piece);

        let mut s = GameSession::with_setup(Board::new(), piece.clone(), 1);
        s.apply_command(Command::Rotate);
        assert_ne!(s.current().cells(), piece.cells());
    }

    #[test]
    fn test_rotation_applies_in_place() {
        let mut s = GameSession::with_setup(Board::new(), Piece::new(ShapeKind::T, 3, 5), 1);
        let expected = s.current().rotated();
        s.apply_command(Command::Rotate);
        assert_eq!(s.current().cells(), &expected);
        assert_eq!((s.current().x(), s.current().y()), (3, 5));
    }

    #[test]
    fn test_lock_promotes_next() {
        let piece = Piece::new(ShapeKind::O, 0, HEIGHT as i32 - 2);
        let mut s = GameSession::with_setup(Board::new(), piece, 4);
        let next = s.next_piece().clone();
        s.advance_time(FALL_INTERVAL_MS);
        assert_eq!(s.current(), &next);
        assert!(s.board().is_filled(0, HEIGHT - 1));
        assert!(s.board().is_filled(1, HEIGHT - 2));
        assert!(s.is_running());
    }

    #[test]
    fn test_double_clear_in_one_advance() {
        let mut board = Board::new();
        for y in [HEIGHT - 2, HEIGHT - 1] {
            for x in 2..WIDTH {
                board.fill(x, y);
            }
        }
        board.fill(5, HEIGHT - 3);
        let piece = Piece::new(ShapeKind::O, 0, HEIGHT as i32 - 2);
        let mut s = GameSession::with_setup(board, piece, 8);

        s.advance_time(FALL_INTERVAL_MS);

        assert_eq!(s.score(), 20);
        assert_eq!(s.lines_cleared(), 2);
        assert!(s.board().is_filled(5, HEIGHT - 1));
        let filled = s.board().rows().iter().flatten().filter(|&&c| c).count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut board = Board::new();
        for y in 0..2 {
            for x in 3..7 {
                board.fill(x, y);
            }
        }
        let piece = Piece::new(ShapeKind::O, 0, HEIGHT as i32 - 2);
        let mut s = GameSession::with_setup(board, piece, 6);

        s.advance_time(FALL_INTERVAL_MS);
        assert_eq!(s.status(), Status::GameOver);

        let score = s.score();
        let snapshot = s.board().clone();
        let current = s.current().clone();
        s.apply_command(Command::MoveDown);
        s.advance_time(10 * FALL_INTERVAL_MS);
        assert_eq!(s.score(), score);
        assert_eq!(s.board(), &snapshot);
        assert_eq!(s.current(), &current);
        assert_eq!(s.status(), Status::GameOver);
    }

    #[test]
    fn test_quit_stops_without_scoring() {
        let mut s = fresh(12);
        s.apply_command(Command::Quit);
        assert_eq!(s.status(), Status::Stopped);
        assert_eq!(s.score(), 0);

        let y = s.current().y();
        s.advance_time(5 * FALL_INTERVAL_MS);
        s.apply_command(Command::MoveDown);
        assert_eq!(s.current().y(), y);
        assert_eq!(s.status(), Status::Stopped);
    }

    #[test]
    fn test_piece_settles_on_stack() {
        let mut board = Board::new();
        for x in 0..WIDTH {
            if x != 4 {
                board.fill(x, HEIGHT - 1);
            }
        }
        let mut s = GameSession::with_setup(board, Piece::new(ShapeKind::O, 0, 0), 3);
        // Falls HEIGHT-3 rows to rest on the bottom row, then locks on the next step.
        s.advance_time(FALL_INTERVAL_MS * (HEIGHT as u64 - 3));
        assert_eq!(s.current().y(), HEIGHT as i32 - 3);
        s.advance_time(FALL_INTERVAL_MS);
        assert!(s.board().is_filled(0, HEIGHT - 2));
        assert!(s.board().is_filled(1, HEIGHT - 3));
        assert_eq!(s.score(), 0);
    }
}
