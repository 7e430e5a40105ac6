//! Falling-block puzzle engine.
//!
//! The engine is split into a pure board model ([`board`], [`piece`]) and a controller
//! ([`game`]) that owns a session: gravity, player moves, locking, line clears, score and level.
//! The controller reports every change through a [`events::RenderSink`] and expects to be driven
//! by a [`timer::GravityTimer`] (or any scheduler that re-reads [`game::Game::fall_interval`]
//! each time it re-arms).
//!
//! ```
//! use blockfall::{EngineConfig, Game, GameEvent, SequenceRandomizer, TetrominoKind};
//!
//! let rnd = SequenceRandomizer::new([TetrominoKind::O]);
//! let mut game = Game::new(EngineConfig::default(), Box::new(rnd), Vec::<GameEvent>::new())?;
//! game.start();
//! game.hard_drop();
//! assert_eq!(game.board().occupied_count(), 4);
//! # Ok::<(), blockfall::ConfigError>(())
//! ```

pub mod board;
pub mod config;
pub mod events;
pub mod game;
pub mod piece;
pub mod scoring;
pub mod timer;

pub use board::{Board, Cell, Shape};
pub use config::{ColorPolicy, ConfigError, EngineConfig, RotationDirection, ScoringConfig};
pub use events::{GameEvent, NullSink, RenderSink};
pub use game::{Game, Status, Step};
pub use piece::{ActivePiece, Randomizer, SequenceRandomizer, TetrominoKind, UniformRandomizer};
pub use timer::GravityTimer;
