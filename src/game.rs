//! Game controller: session state, gravity step, player moves, lock/clear/score/spawn.

use crate::board::Board;
use crate::config::{ColorPolicy, ConfigError, EngineConfig};
use crate::events::{GameEvent, NullSink, RenderSink};
use crate::piece::{ActivePiece, Randomizer};
use crate::scoring::{fall_interval, line_clear_points};
use std::time::Duration;

/// Column offsets tried, in order, when a rotation does not fit in place.
const WALL_KICKS: [i32; 3] = [0, -1, 1];

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

/// Result of a downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing happened (not running, or no active piece).
    Idle,
    /// The piece moved down one row.
    Fell,
    /// The piece locked; `lines` rows were cleared.
    Locked { lines: u32 },
}

/// One play session. Owns the grid and the active piece; reports every change to `S`.
#[derive(Debug)]
pub struct Game<S: RenderSink = NullSink> {
    config: EngineConfig,
    board: Board,
    active: Option<ActivePiece>,
    randomizer: Box<dyn Randomizer>,
    sink: S,
    status: Status,
    score: u32,
    level: u32,
    lines_since_level: u32,
    lines_total: u32,
    fall_interval: Duration,
}

impl<S: RenderSink> Game<S> {
    pub fn new(
        config: EngineConfig,
        randomizer: Box<dyn Randomizer>,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.rows, config.columns),
            fall_interval: fall_interval(1, &config),
            config,
            active: None,
            randomizer,
            sink,
            status: Status::NotStarted,
            score: 0,
            level: 1,
            lines_since_level: 0,
            lines_total: 0,
        })
    }

    /// Begin a session. Same as [`Game::restart`].
    pub fn start(&mut self) {
        self.restart();
    }

    /// Empty the grid, reset score and level, and spawn the first piece.
    pub fn restart(&mut self) {
        self.board.reset();
        self.active = None;
        self.score = 0;
        self.level = 1;
        self.lines_since_level = 0;
        self.lines_total = 0;
        self.fall_interval = fall_interval(1, &self.config);
        self.status = Status::Running;
        log::info!(
            "session started on {}x{} board",
            self.config.columns,
            self.config.rows
        );
        self.sink.notify(GameEvent::GridChanged);
        self.sink.notify(GameEvent::ScoreChanged(0));
        self.sink.notify(GameEvent::LevelChanged(1));
        self.spawn_next();
    }

    /// Place a new random piece at the top. If it does not fit, the session is over and the
    /// grid is left untouched.
    pub fn spawn_next(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        let kind = self.randomizer.next_kind();
        let color = match self.config.color_policy {
            ColorPolicy::PerShape => kind.color_index(),
            ColorPolicy::Random => self.randomizer.next_color(),
        };
        let piece = ActivePiece::spawn(kind, color, self.config.columns);
        if !self.board.can_place(&piece.shape, piece.x, piece.y) {
            self.active = None;
            self.status = Status::GameOver;
            log::info!(
                "game over: {kind:?} blocked at spawn, score {} level {}",
                self.score,
                self.level
            );
            self.sink.notify(GameEvent::PieceChanged);
            self.sink.notify(GameEvent::GameOver);
            return false;
        }
        log::trace!("spawned {kind:?} at column {}", piece.x);
        self.active = Some(piece);
        self.sink.notify(GameEvent::PieceChanged);
        true
    }

    /// Gravity step: fall one row, or lock and move on to the next piece.
    /// A no-op outside `Running`, so a late timer callback after game over is harmless.
    pub fn tick(&mut self) -> Step {
        if self.status != Status::Running {
            return Step::Idle;
        }
        self.step_down()
    }

    /// Manual one-row drop; behaves exactly like a gravity tick.
    pub fn soft_drop(&mut self) -> Step {
        self.tick()
    }

    /// Drop to the floor and lock immediately.
    pub fn hard_drop(&mut self) -> Step {
        if self.status != Status::Running {
            return Step::Idle;
        }
        let Some(piece) = self.active.as_mut() else {
            return Step::Idle;
        };
        while self.board.can_place(&piece.shape, piece.x, piece.y + 1) {
            piece.y += 1;
        }
        Step::Locked {
            lines: self.lock_active(),
        }
    }

    /// Shift one column left (`dx < 0`) or right (`dx > 0`). Blocked moves return `false`.
    pub fn move_horizontal(&mut self, dx: i32) -> bool {
        if self.status != Status::Running || dx == 0 {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let x = piece.x + dx.signum();
        if !self.board.can_place(&piece.shape, x, piece.y) {
            return false;
        }
        piece.x = x;
        self.sink.notify(GameEvent::PieceChanged);
        true
    }

    /// Rotate in the configured direction, trying the wall kicks in order.
    /// Returns `false` (piece untouched) if no position fits.
    pub fn rotate_active(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let rotated = piece.shape.rotated(self.config.rotation);
        let Some(x) = WALL_KICKS
            .iter()
            .map(|kick| piece.x + kick)
            .find(|&x| self.board.can_place(&rotated, x, piece.y))
        else {
            return false;
        };
        piece.shape = rotated;
        piece.x = x;
        self.sink.notify(GameEvent::PieceChanged);
        true
    }

    fn step_down(&mut self) -> Step {
        let Some(piece) = self.active.as_mut() else {
            return Step::Idle;
        };
        if self.board.can_place(&piece.shape, piece.x, piece.y + 1) {
            piece.y += 1;
            self.sink.notify(GameEvent::PieceChanged);
            return Step::Fell;
        }
        Step::Locked {
            lines: self.lock_active(),
        }
    }

    /// Lock, clear, score, spawn. Returns lines cleared.
    fn lock_active(&mut self) -> u32 {
        let Some(piece) = self.active.take() else {
            return 0;
        };
        self.board.lock(&piece.shape, piece.x, piece.y, piece.color);
        self.sink.notify(GameEvent::GridChanged);
        self.sink.notify(GameEvent::PieceChanged);

        let lines = self.board.clear_lines();
        if lines > 0 {
            self.sink.notify(GameEvent::GridChanged);
            self.sink.notify(GameEvent::LinesCleared(lines));
            self.apply_clear(lines);
        }
        self.spawn_next();
        lines
    }

    fn apply_clear(&mut self, lines: u32) {
        let points = line_clear_points(lines, &self.config.scoring);
        self.score = self.score.saturating_add(points);
        self.sink.notify(GameEvent::ScoreChanged(self.score));
        log::debug!("cleared {lines} line(s) for {points} points");

        self.lines_total += lines;
        self.lines_since_level += lines;
        if self.lines_since_level >= self.config.lines_per_level {
            self.level += 1;
            // Overflow past the threshold is not carried into the next level.
            self.lines_since_level = 0;
            self.fall_interval = fall_interval(self.level, &self.config);
            log::info!(
                "level {} reached, fall interval {:?}",
                self.level,
                self.fall_interval
            );
            self.sink.notify(GameEvent::LevelChanged(self.level));
        }
    }

    /// Row the active piece would lock at if hard-dropped now.
    pub fn ghost_row(&self) -> Option<i32> {
        let piece = self.active.as_ref()?;
        let mut y = piece.y;
        while self.board.can_place(&piece.shape, piece.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_since_level(&self) -> u32 {
        self.lines_since_level
    }

    pub fn lines_total(&self) -> u32 {
        self.lines_total
    }

    /// Delay before the next gravity tick should be scheduled.
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
