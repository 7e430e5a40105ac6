//! Board model: grid of cells, shape matrices, collision, lock and line clear.

use crate::config::RotationDirection;
use std::collections::VecDeque;

/// Single grid cell: empty or holding the colour index of a locked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Block(u8),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Immutable boolean matrix describing which cells of a bounding box a piece covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    /// Row-major, `height * width` entries.
    cells: Vec<bool>,
}

impl Shape {
    /// Build from rows of 0/1; every row must have the same length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        debug_assert!(rows.iter().all(|r| r.len() == width), "ragged shape");
        let cells = rows
            .iter()
            .flat_map(|r| r.iter().map(|&c| c != 0))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_set(&self, dx: usize, dy: usize) -> bool {
        dx < self.width && dy < self.height && self.cells[dy * self.width + dx]
    }

    /// Offsets `(dx, dy)` of every set cell, top row first.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().filter(|(_, set)| **set).map(|(i, _)| {
            ((i % self.width) as i32, (i / self.width) as i32)
        })
    }

    /// 90° rotation in the given direction; the bounding box swaps width and height.
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let (w, h) = (self.width, self.height);
        let mut cells = Vec::with_capacity(self.cells.len());
        // New shape has h columns and w rows.
        for r in 0..w {
            for c in 0..h {
                let set = match direction {
                    RotationDirection::Clockwise => self.is_set(r, h - 1 - c),
                    RotationDirection::CounterClockwise => self.is_set(w - 1 - r, c),
                };
                cells.push(set);
            }
        }
        Self {
            width: h,
            height: w,
            cells,
        }
    }
}

/// Playfield: `rows x columns` cells. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    /// rows[y][x]
    rows: VecDeque<Vec<Cell>>,
}

impl Board {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            rows: (0..rows).map(|_| vec![Cell::Empty; columns]).collect(),
        }
    }

    /// Build from a picture: `.` is empty, a digit is a block of that colour, anything else colour 0.
    pub fn from_picture(lines: &[&str]) -> Self {
        let columns = lines.first().map_or(0, |l| l.chars().count());
        let rows = lines
            .iter()
            .map(|line| {
                line.chars()
                    .map(|ch| match ch {
                        '.' => Cell::Empty,
                        d if d.is_ascii_digit() => Cell::Block(d as u8 - b'0'),
                        _ => Cell::Block(0),
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    #[inline]
    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        matches!(self.get(col, row), Some(Cell::Block(_)))
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r.iter().all(|c| !c.is_empty()))
    }

    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .count()
    }

    /// True if every set cell of `shape` at anchor `(x, y)` is inside the side walls, above the
    /// floor and not on a locked block. Cells above the top (negative rows) only need to respect
    /// the side walls.
    pub fn can_place(&self, shape: &Shape, x: i32, y: i32) -> bool {
        let (cols, rows) = (self.columns as i32, self.rows.len() as i32);
        shape.filled().all(|(dx, dy)| {
            let (col, row) = (x + dx, y + dy);
            if col < 0 || col >= cols || row >= rows {
                return false;
            }
            row < 0 || !self.is_occupied(col, row)
        })
    }

    /// Write `color` into every cell the shape covers; cells above the top are dropped.
    pub fn lock(&mut self, shape: &Shape, x: i32, y: i32, color: u8) {
        for (dx, dy) in shape.filled() {
            let (col, row) = (x + dx, y + dy);
            if col < 0 || row < 0 {
                continue;
            }
            if let Some(cell) = self
                .rows
                .get_mut(row as usize)
                .and_then(|r| r.get_mut(col as usize))
            {
                *cell = Cell::Block(color);
            }
        }
    }

    /// Remove every full row, keep the rest in order and refill from the top.
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|r| r.iter().any(|c| c.is_empty()));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.push_front(vec![Cell::Empty; self.columns]);
        }
        cleared as u32
    }

    /// Empty every cell.
    pub fn reset(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = Cell::Empty;
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, col: usize, row: usize, cell: Cell) {
        self.rows[row][col] = cell;
    }
}
