//! blocktui — classic falling-block puzzle game in the terminal.

mod app;
mod board;
mod input;
mod piece;
mod session;
mod shapes;
mod spawner;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use session::Status;

/// Options derived from CLI that affect presentation and pacing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tick_ms: u64,
    pub seed: Option<u64>,
    pub show_preview: bool,
    pub animate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = AppConfig {
        tick_ms: args.tick_ms.max(1),
        seed: args.seed,
        show_preview: !args.no_preview,
        animate: !args.no_animation,
    };
    let session = App::new(config, theme).run()?;
    match session.status() {
        Status::GameOver => println!("Game Over!"),
        Status::Stopped | Status::Running => println!("Quit."),
    }
    println!("Score: {}", session.score());
    Ok(())
}

/// Classic falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktui",
    version,
    about = "Classic falling-block puzzle in the terminal. Fill rows to clear them; 10 points per row.",
    long_about = "blocktui is a small falling-block puzzle game on a 10x20 board.\n\n\
        Pieces fall one row every half second. Complete a row to clear it (10 points). \
        The game ends when a new piece has no room to spawn.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move    Down or j  Drop one row\n  \
        Up, k or Space     Rotate  q / Esc    Quit\n\n\
        On the game-over screen press r to play again."
)]
pub struct Args {
    /// Milliseconds per game tick (render, input, update).
    #[arg(long, default_value = "50", value_name = "MS")]
    pub tick_ms: u64,

    /// Seed for the piece randomizer; the same seed gives the same piece sequence.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Hide the next-piece preview.
    #[arg(long)]
    pub no_preview: bool,

    /// Disable the game-over fade.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["blocktui"]).unwrap();
        assert_eq!(args.tick_ms, 50);
        assert_eq!(args.seed, None);
        assert_eq!(args.palette, Palette::Normal);
        assert!(!args.no_preview);
    }

    #[test]
    fn test_palette_aliases() {
        let args = Args::try_parse_from(["blocktui", "--palette", "contrast", "--seed", "9"]).unwrap();
        assert_eq!(args.palette, Palette::HighContrast);
        assert_eq!(args.seed, Some(9));
        let args = Args::try_parse_from(["blocktui", "--palette", "colourblind"]).unwrap();
        assert_eq!(args.palette, Palette::Colorblind);
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
