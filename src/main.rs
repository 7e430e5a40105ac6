//! blockfall: classic falling-block puzzle game in the terminal.

mod app;
mod input;
mod logging;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use blockfall::{
    ColorPolicy, EngineConfig, Game, Randomizer, RotationDirection, ScoringConfig,
    UniformRandomizer,
};
use clap::{Parser, ValueEnum};
use input::Controls;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use theme::{Palette, Theme};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), args.log_level)?;
    let config = args.engine_config().context("invalid game configuration")?;
    let theme = Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using defaults: {e}");
        Theme::default()
    });
    let randomizer: Box<dyn Randomizer> = match args.seed {
        Some(seed) => Box::new(UniformRandomizer::seeded(seed)),
        None => Box::new(UniformRandomizer::from_entropy()),
    };
    let game = Game::new(config, randomizer, app::Redraw::default())?;
    let mut app = App::new(game, theme, args.controls);
    app.run()?;
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Classic falling-block puzzle in the terminal. Complete rows to clear them; four at once scores big.",
    long_about = "Blockfall is a terminal take on the classic falling-block puzzle.\n\n\
        Steer the falling tetromino, complete horizontal rows to clear them. Ten cleared lines \
        raise the level and the pieces fall faster. The game ends when a new piece has no room.\n\n\
        CONTROLS:\n  Left/Right  Move    Up        Rotate     Down       Soft drop\n  Enter/Space Hard drop   P          Pause      R          Restart   Q / Esc  Quit\n\n\
        Vim keys h/l/k/j work too. --controls minimal leaves only move and soft drop."
)]
pub struct Args {
    /// Playfield height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub rows: usize,

    /// Playfield width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub columns: usize,

    /// Fall interval at level 1, in ms.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub base_interval_ms: u64,

    /// Fastest fall interval, in ms.
    #[arg(long, default_value = "100", value_name = "MS")]
    pub min_interval_ms: u64,

    /// How much faster pieces fall per level, in ms.
    #[arg(long, default_value = "50", value_name = "MS")]
    pub interval_step_ms: u64,

    /// Cleared lines needed for the next level.
    #[arg(long, default_value = "10", value_name = "N")]
    pub lines_per_level: u32,

    /// Points per cleared line.
    #[arg(long, default_value = "10", value_name = "N")]
    pub points_per_line: u32,

    /// Extra multiplier for a four-line clear.
    #[arg(long, default_value = "10", value_name = "N")]
    pub tetris_multiplier: u32,

    /// Colour of new pieces: random, or fixed per shape.
    #[arg(long, default_value = "random")]
    pub color_policy: ColorPolicyArg,

    /// Rotation direction of the rotate key.
    #[arg(long, default_value = "clockwise")]
    pub rotation: RotationArg,

    /// Key set: full, or minimal (move and soft drop only).
    #[arg(long, default_value = "full")]
    pub controls: Controls,

    /// Seed for the piece generator (repeatable games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write engine logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity when --log-file is set.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: LevelFilter,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig, blockfall::ConfigError> {
        EngineConfig {
            rows: self.rows,
            columns: self.columns,
            base_interval: Duration::from_millis(self.base_interval_ms),
            min_interval: Duration::from_millis(self.min_interval_ms),
            interval_step: Duration::from_millis(self.interval_step_ms),
            lines_per_level: self.lines_per_level,
            scoring: ScoringConfig {
                points_per_line: self.points_per_line,
                tetris_multiplier: self.tetris_multiplier,
            },
            color_policy: self.color_policy.into(),
            rotation: self.rotation.into(),
        }
        .validated()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorPolicyArg {
    #[default]
    Random,
    #[value(alias = "shape")]
    PerShape,
}

impl From<ColorPolicyArg> for ColorPolicy {
    fn from(arg: ColorPolicyArg) -> Self {
        match arg {
            ColorPolicyArg::Random => Self::Random,
            ColorPolicyArg::PerShape => Self::PerShape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RotationArg {
    #[default]
    #[value(alias = "cw")]
    Clockwise,
    #[value(alias = "ccw")]
    CounterClockwise,
}

impl From<RotationArg> for RotationDirection {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Clockwise => Self::Clockwise,
            RotationArg::CounterClockwise => Self::CounterClockwise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let args = Args::parse_from(["blockfall"]);
        assert_eq!(args.engine_config().unwrap(), EngineConfig::default());
        assert_eq!(args.controls, Controls::Full);
    }

    #[test]
    fn test_variant_flags() {
        let args = Args::parse_from([
            "blockfall",
            "--color-policy",
            "per-shape",
            "--rotation",
            "ccw",
            "--controls",
            "minimal",
        ]);
        let cfg = args.engine_config().unwrap();
        assert_eq!(cfg.color_policy, ColorPolicy::PerShape);
        assert_eq!(cfg.rotation, RotationDirection::CounterClockwise);
        assert_eq!(args.controls, Controls::Minimal);
    }

    #[test]
    fn test_invalid_board_is_rejected() {
        let args = Args::parse_from(["blockfall", "--columns", "2"]);
        assert!(args.engine_config().is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
