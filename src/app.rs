//! App: terminal init, fixed-tick loop, key handling.

use crate::AppConfig;
use crate::input::key_to_command;
use crate::session::{Command, GameSession, Status};
use crate::spawner::Spawner;
use crate::theme::Theme;
use crate::ui::{self, View};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    config: AppConfig,
    theme: Theme,
    session: GameSession,
    view: View,
    last_tick: Instant,
}

impl App {
    pub fn new(config: AppConfig, theme: Theme) -> Self {
        let view = View::new(config.show_preview, config.animate);
        let session = GameSession::new(Self::spawner(&config));
        Self {
            config,
            theme,
            session,
            view,
            last_tick: Instant::now(),
        }
    }

    fn spawner(config: &AppConfig) -> Spawner {
        config
            .seed
            .map_or_else(Spawner::from_entropy, Spawner::seeded)
    }

    fn reset_game(&mut self) {
        self.session = GameSession::new(Self::spawner(&self.config));
        self.view.reset();
        self.last_tick = Instant::now();
    }

    /// Runs until the player quits. Returns the last session for the final report.
    pub fn run(mut self) -> Result<GameSession> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        let restore = || -> Result<()> {
            first_error([
                execute!(std::io::stdout(), LeaveAlternateScreen).map_err(anyhow::Error::from),
                disable_raw_mode().map_err(anyhow::Error::from),
            ])
        };

        enable_raw_mode()?;
        let mut terminal = setup_or_undo(
            || {
                execute!(std::io::stdout(), EnterAlternateScreen)?;
                let mut terminal =
                    DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(std::io::stdout()))?;
                terminal.hide_cursor()?;
                Ok(terminal)
            },
            restore,
        )?;

        let result = self.run_loop(&mut terminal);

        let restored = first_error([terminal.show_cursor().map_err(anyhow::Error::from), restore()]);
        result?;
        restored?;
        Ok(self.session)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick = Duration::from_millis(self.config.tick_ms.max(1));
        self.last_tick = Instant::now();
        loop {
            let frame_start = Instant::now();
            terminal.draw(|f| ui::draw(f, &self.session, &self.theme, &mut self.view, frame_start))?;

            // At most one key press per tick; the rest wait for later ticks.
            let key = Self::poll_key(tick.saturating_sub(frame_start.elapsed()))?;

            match self.session.status() {
                Status::Running => {
                    let cmd = key.map_or(Command::None, key_to_command);
                    self.session.apply_command(cmd);
                    let elapsed = self.last_tick.elapsed();
                    let elapsed_ms = elapsed.as_millis().min(u64::MAX as u128) as u64;
                    // Keep the sub-millisecond remainder for the next tick.
                    self.last_tick += Duration::from_millis(elapsed_ms);
                    self.session.advance_time(elapsed_ms);
                }
                Status::GameOver => {
                    if let Some(key) = key {
                        if matches!(key.code, KeyCode::Char('r' | 'R')) {
                            self.reset_game();
                        } else if key_to_command(key) == Command::Quit {
                            return Ok(());
                        }
                    }
                }
                Status::Stopped => return Ok(()),
            }

            if self.session.status() == Status::Stopped {
                return Ok(());
            }

            let spent = frame_start.elapsed();
            if spent < tick {
                std::thread::sleep(tick - spent);
            }
        }
    }

    /// Wait up to `timeout` for a key press; releases and non-key events are skipped.
    fn poll_key(timeout: Duration) -> Result<Option<KeyEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(None);
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
                _ => {}
            }
            if remaining.is_zero() {
                return Ok(None);
            }
        }
    }
}

/// Runs `setup`; if it fails, runs `undo` and hands back the setup error.
fn setup_or_undo<T>(
    setup: impl FnOnce() -> Result<T>,
    undo: impl FnOnce() -> Result<()>,
) -> Result<T> {
    setup().or_else(|err| {
        undo()?;
        Err(err)
    })
}

/// First failure among teardown steps that have all already run.
fn first_error<const N: usize>(steps: [Result<()>; N]) -> Result<()> {
    steps.into_iter().collect()
}
