//! Layout and drawing: playfield, next preview, score, game over.

use crate::board::{Board, HEIGHT, WIDTH};
use crate::piece::Piece;
use crate::session::{GameSession, Status};
use crate::shapes::occupied;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const FILLED: &str = "██";
const EMPTY: &str = "  ";

const SIDEBAR_WIDTH: u16 = 18;
const NEXT_PREVIEW_ROWS: usize = 2;

/// Board fade after game over.
const GAME_OVER_FADE_MS: u32 = 600;

/// Per-run drawing options and effect state kept between frames.
#[derive(Default)]
pub struct View {
    pub show_preview: bool,
    pub animate: bool,
    game_over_effect: Option<Effect>,
    effect_process_time: Option<Instant>,
}

impl View {
    pub fn new(show_preview: bool, animate: bool) -> Self {
        Self {
            show_preview,
            animate,
            ..Self::default()
        }
    }

    /// Drop effect state when a new session starts.
    pub fn reset(&mut self) {
        self.game_over_effect = None;
        self.effect_process_time = None;
    }
}

/// Playfield outer rect (with border) and sidebar rect, centred in `area`.
fn layout(area: Rect) -> (Rect, Rect) {
    let board_w = WIDTH as u16 * CELL_WIDTH + 2;
    let board_h = HEIGHT as u16 + 2;
    let total_w = board_w + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(board_h) / 2;
    let board = Rect {
        x,
        y,
        width: board_w.min(area.width),
        height: board_h.min(area.height),
    };
    let sidebar = Rect {
        x: (x + board_w).min(area.right()),
        y,
        width: SIDEBAR_WIDTH.min(area.right().saturating_sub(x + board_w)),
        height: board_h.min(area.height),
    };
    (board, sidebar)
}

/// Draw one settled snapshot of the session.
pub fn draw(frame: &mut Frame, session: &GameSession, theme: &Theme, view: &mut View, now: Instant) {
    let area = frame.area();
    let (board_rect, sidebar_rect) = layout(area);
    draw_board(frame, session, theme, board_rect);
    draw_sidebar(frame, session, theme, view.show_preview, sidebar_rect);

    if session.status() == Status::GameOver {
        if view.animate {
            apply_game_over_effect(frame, theme, board_rect, view, now);
        }
        draw_game_over(frame, session, theme, board_rect);
    }
}

/// One `Line` per board row: locked cells in the stack colour, the falling piece on top.
fn board_lines(board: &Board, piece: Option<&Piece>, theme: &Theme) -> Vec<Line<'static>> {
    let mut colors: [[Option<Color>; WIDTH]; HEIGHT] = [[None; WIDTH]; HEIGHT];
    for (y, row) in board.rows().iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            if filled {
                colors[y][x] = Some(theme.stack);
            }
        }
    }
    if let Some(piece) = piece {
        let color = theme.piece_color(piece.color_index());
        for (bx, by) in piece.board_cells() {
            if (0..WIDTH as i32).contains(&bx) && (0..HEIGHT as i32).contains(&by) {
                colors[by as usize][bx as usize] = Some(color);
            }
        }
    }
    colors
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|c| match c {
                        Some(color) => Span::styled(FILLED, Style::default().fg(*color).bg(theme.bg)),
                        None => Span::styled(EMPTY, Style::default().bg(theme.bg)),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn draw_board(frame: &mut Frame, session: &GameSession, theme: &Theme, rect: Rect) {
    // The piece that failed to spawn overlaps the stack; show the stack alone.
    let piece = (session.status() != Status::GameOver).then(|| session.current());
    let p = Paragraph::new(board_lines(session.board(), piece, theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" blocktui ", Style::default().fg(theme.title))),
    );
    p.render(rect, frame.buffer_mut());
}

fn preview_lines(piece: &Piece, theme: &Theme) -> Vec<Line<'static>> {
    let color = theme.piece_color(piece.color_index());
    let mut rows = vec![vec![EMPTY; 4]; NEXT_PREVIEW_ROWS];
    for (i, j) in occupied(piece.cells()) {
        if let Some(row) = rows.get_mut(i) {
            row[j] = FILLED;
        }
    }
    rows.into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|s| Span::styled(s, Style::default().fg(color)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn draw_sidebar(frame: &mut Frame, session: &GameSession, theme: &Theme, show_preview: bool, rect: Rect) {
    let label = Style::default().fg(theme.main_fg);
    let mut lines = Vec::new();
    if show_preview {
        lines.push(Line::from(Span::styled(" Next", Style::default().fg(theme.title))));
        lines.push(Line::from(""));
        for mut line in preview_lines(session.next_piece(), theme) {
            line.spans.insert(0, Span::from(" "));
            lines.push(line);
        }
        lines.push(Line::from(""));
    }
    lines.extend([
        Line::from(Span::styled(format!(" Score: {}", session.score()), label)),
        Line::from(Span::styled(format!(" Lines: {}", session.lines_cleared()), label)),
        Line::from(""),
        Line::from(Span::styled(" ←/→  Move", label)),
        Line::from(Span::styled(" ↓    Drop", label)),
        Line::from(Span::styled(" ↑/␣  Rotate", label)),
        Line::from(Span::styled(" Q    Quit", label)),
    ]);
    Paragraph::new(lines).render(rect, frame.buffer_mut());
}

/// Create the fade on first game-over frame, then advance it by the frame delta.
fn apply_game_over_effect(frame: &mut Frame, theme: &Theme, board_rect: Rect, view: &mut View, now: Instant) {
    let delta = view
        .effect_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    view.effect_process_time = Some(now);

    let effect = view.game_over_effect.get_or_insert_with(|| {
        fx::fade_to(theme.stack, theme.bg, (GAME_OVER_FADE_MS, Interpolation::Linear))
            .with_area(board_rect)
    });
    frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
}

fn draw_game_over(frame: &mut Frame, session: &GameSession, theme: &Theme, board_rect: Rect) {
    let popup_w = 20u16;
    let popup_h = 7u16;
    let popup = Rect {
        x: board_rect.x + board_rect.width.saturating_sub(popup_w) / 2,
        y: board_rect.y + board_rect.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(board_rect.width),
        height: popup_h.min(board_rect.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " R Restart  Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}
