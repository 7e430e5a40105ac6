//! Score and gravity curves.

use crate::config::{EngineConfig, ScoringConfig};
use std::time::Duration;

/// Lines that make a "tetris".
pub const TETRIS_LINES: u32 = 4;

/// Points for clearing `lines` rows at once. Linear in the line count, except a four-line clear
/// which is multiplied by `tetris_multiplier` (400 instead of 40 with the defaults).
pub fn line_clear_points(lines: u32, scoring: &ScoringConfig) -> u32 {
    let base = lines.saturating_mul(scoring.points_per_line);
    if lines == TETRIS_LINES {
        base.saturating_mul(scoring.tetris_multiplier)
    } else {
        base
    }
}

/// `max(min_interval, base_interval - (level - 1) * interval_step)`.
pub fn fall_interval(level: u32, config: &EngineConfig) -> Duration {
    let steps = level.saturating_sub(1);
    let reduction = config.interval_step.saturating_mul(steps);
    config
        .base_interval
        .saturating_sub(reduction)
        .max(config.min_interval)
}
