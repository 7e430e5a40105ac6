//! Tetromino catalogue, the active piece and piece sources.

use crate::board::Shape;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;

/// Number of colours in the catalogue (one per shape).
pub const COLOR_COUNT: u8 = 7;

/// Tetromino kinds in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::T, Self::Z];

    /// Spawn orientation.
    pub fn shape(self) -> Shape {
        match self {
            Self::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            Self::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            Self::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
            Self::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            Self::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            Self::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            Self::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        }
    }

    /// Catalogue colour: cyan, blue, orange, yellow, green, purple, red.
    pub fn color_index(self) -> u8 {
        match self {
            Self::I => 0,
            Self::J => 1,
            Self::L => 2,
            Self::O => 3,
            Self::S => 4,
            Self::T => 5,
            Self::Z => 6,
        }
    }
}

/// The currently falling piece. `(x, y)` is the top-left of the shape's bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: u8,
}

impl ActivePiece {
    /// Piece in spawn orientation, horizontally centred on row 0.
    pub fn spawn(kind: TetrominoKind, color: u8, columns: usize) -> Self {
        let shape = kind.shape();
        let x = (columns / 2) as i32 - (shape.width() / 2) as i32;
        Self {
            kind,
            shape,
            x,
            y: 0,
            color,
        }
    }

    /// Absolute `(col, row)` of every block.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.filled().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Source of upcoming pieces and their colours.
pub trait Randomizer: fmt::Debug {
    fn next_kind(&mut self) -> TetrominoKind;
    /// Colour for pieces whose colour is chosen independently of the shape.
    fn next_color(&mut self) -> u8;
}

/// Uniform choice over the 7 shapes and 7 colours.
#[derive(Debug, Clone)]
pub struct UniformRandomizer {
    rng: StdRng,
}

impl UniformRandomizer {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for UniformRandomizer {
    fn next_kind(&mut self) -> TetrominoKind {
        TetrominoKind::ALL[self.rng.gen_range(0..TetrominoKind::ALL.len())]
    }

    fn next_color(&mut self) -> u8 {
        self.rng.gen_range(0..COLOR_COUNT)
    }
}

/// Replays a fixed script of kinds (and colours), cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandomizer {
    kinds: VecDeque<TetrominoKind>,
    colors: VecDeque<u8>,
}

impl SequenceRandomizer {
    pub fn new(kinds: impl IntoIterator<Item = TetrominoKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            colors: VecDeque::new(),
        }
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = u8>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }
}

impl Randomizer for SequenceRandomizer {
    fn next_kind(&mut self) -> TetrominoKind {
        match self.kinds.pop_front() {
            Some(kind) => {
                self.kinds.push_back(kind);
                kind
            }
            None => TetrominoKind::O,
        }
    }

    fn next_color(&mut self) -> u8 {
        match self.colors.pop_front() {
            Some(c) => {
                self.colors.push_back(c);
                c
            }
            None => 0,
        }
    }
}
