//! Engine configuration: board size, gravity curve, scoring and per-variant policies.

use std::time::Duration;
use thiserror::Error;

/// Narrowest board that still fits the horizontal I piece.
pub const MIN_COLUMNS: usize = 4;
/// Shortest board that still fits every spawn orientation.
pub const MIN_ROWS: usize = 2;

/// How a freshly spawned piece gets its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    /// Colour drawn uniformly at random, independent of the shape.
    #[default]
    Random,
    /// Each shape always carries its catalogue colour.
    PerShape,
}

/// Direction of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    /// Transpose, then reverse each row.
    #[default]
    Clockwise,
    /// Transpose, then reverse the row order.
    CounterClockwise,
}

/// Points awarded per line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub points_per_line: u32,
    /// Extra factor applied to a four-line clear (4 * 10 * 10 = 400 by default).
    pub tetris_multiplier: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_line: 10,
            tetris_multiplier: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rows: usize,
    pub columns: usize,
    /// Fall interval at level 1.
    pub base_interval: Duration,
    /// Floor of the fall interval.
    pub min_interval: Duration,
    /// Interval reduction per level.
    pub interval_step: Duration,
    pub lines_per_level: u32,
    pub scoring: ScoringConfig,
    pub color_policy: ColorPolicy,
    pub rotation: RotationDirection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 10,
            base_interval: Duration::from_millis(500),
            min_interval: Duration::from_millis(100),
            interval_step: Duration::from_millis(50),
            lines_per_level: 10,
            scoring: ScoringConfig::default(),
            color_policy: ColorPolicy::default(),
            rotation: RotationDirection::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least {MIN_COLUMNS} columns wide, got {0}")]
    TooNarrow(usize),
    #[error("board must be at least {MIN_ROWS} rows tall, got {0}")]
    TooShort(usize),
    #[error("base and minimum fall intervals must be non-zero")]
    ZeroInterval,
    #[error("minimum interval {min:?} exceeds base interval {base:?}")]
    MinAboveBase { min: Duration, base: Duration },
    #[error("lines per level must be non-zero")]
    ZeroLinesPerLevel,
    #[error("points per line must be non-zero")]
    ZeroPoints,
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_COLUMNS {
            return Err(ConfigError::TooNarrow(self.columns));
        }
        if self.rows < MIN_ROWS {
            return Err(ConfigError::TooShort(self.rows));
        }
        if self.base_interval.is_zero() || self.min_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_interval > self.base_interval {
            return Err(ConfigError::MinAboveBase {
                min: self.min_interval,
                base: self.base_interval,
            });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if self.scoring.points_per_line == 0 {
            return Err(ConfigError::ZeroPoints);
        }
        Ok(())
    }

    /// Validated copy, for builders that end in `?`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!((cfg.rows, cfg.columns), (20, 10));
        assert_eq!(cfg.color_policy, ColorPolicy::Random);
        assert_eq!(cfg.rotation, RotationDirection::Clockwise);
    }

    #[test]
    fn test_rejects_narrow_board() {
        let cfg = EngineConfig {
            columns: 3,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::TooNarrow(3)));
    }

    #[test]
    fn test_rejects_min_above_base() {
        let cfg = EngineConfig {
            min_interval: Duration::from_millis(600),
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MinAboveBase { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_lines_per_level() {
        let cfg = EngineConfig {
            lines_per_level: 0,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validated(), Err(ConfigError::ZeroLinesPerLevel));
    }
}
