//! Property tests for the board kernel and for random play sessions.
//!
//! Invariants covered:
//! - Clearing removes exactly the full rows, keeps the rest in order and refills from the top.
//! - Locking a placeable shape occupies every one of its cells.
//! - During random play the active piece always fits, no full row survives a lock,
//!   score only grows in steps of ten and the fall interval never drops below the floor.

use blockfall::{
    Board, Cell, EngineConfig, Game, NullSink, RotationDirection, TetrominoKind,
    UniformRandomizer,
};
use proptest::prelude::*;
use std::time::Duration;

fn picture(rows: &[Vec<bool>]) -> Vec<String> {
    rows.iter()
        .map(|r| r.iter().map(|&b| if b { '1' } else { '.' }).collect())
        .collect()
}

fn board_from(rows: &[Vec<bool>]) -> Board {
    let lines = picture(rows);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    Board::from_picture(&refs)
}

/// Grid of 4..10 columns by 2..12 rows, biased towards full rows.
fn grid() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (4usize..10, 2usize..12).prop_flat_map(|(cols, rows)| {
        let row = prop_oneof![
            1 => Just(vec![true; cols]),
            3 => prop::collection::vec(any::<bool>(), cols),
        ];
        prop::collection::vec(row, rows)
    })
}

fn kind() -> impl Strategy<Value = TetrominoKind> {
    prop::sample::select(TetrominoKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn clear_lines_removes_exactly_the_full_rows(rows in grid()) {
        let mut board = board_from(&rows);
        let height = board.rows();
        let full = rows.iter().filter(|r| r.iter().all(|&b| b)).count();
        let survivors: Vec<Vec<Cell>> = board
            .iter_rows()
            .filter(|r| r.iter().any(|c| c.is_empty()))
            .map(<[Cell]>::to_vec)
            .collect();

        let cleared = board.clear_lines() as usize;

        prop_assert_eq!(cleared, full);
        prop_assert_eq!(board.rows(), height);
        for r in 0..height {
            prop_assert!(!board.is_row_full(r));
        }
        for r in 0..cleared {
            let row = board.row(r).unwrap_or_default();
            prop_assert!(row.iter().all(|c| c.is_empty()));
        }
        let below: Vec<Vec<Cell>> = (cleared..height)
            .filter_map(|r| board.row(r).map(<[Cell]>::to_vec))
            .collect();
        prop_assert_eq!(below, survivors);
    }

    #[test]
    fn lock_occupies_every_cell_of_a_placeable_shape(
        rows in grid(),
        kind in kind(),
        turns in 0usize..4,
        x in -2i32..10,
        y in -2i32..12,
    ) {
        let mut board = board_from(&rows);
        let mut shape = kind.shape();
        for _ in 0..turns {
            shape = shape.rotated(RotationDirection::Clockwise);
        }
        if !board.can_place(&shape, x, y) {
            let (cols, height) = (board.columns() as i32, board.rows() as i32);
            let blocked = shape.filled().any(|(dx, dy)| {
                let (c, r) = (x + dx, y + dy);
                c < 0 || c >= cols || r >= height || board.is_occupied(c, r)
            });
            prop_assert!(blocked);
            return Ok(());
        }

        let before = board.occupied_count();
        board.lock(&shape, x, y, 6);
        let visible = shape.filled().filter(|&(_, dy)| y + dy >= 0).count();
        for (dx, dy) in shape.filled().filter(|&(_, dy)| y + dy >= 0) {
            prop_assert_eq!(board.get(x + dx, y + dy), Some(Cell::Block(6)));
        }
        prop_assert_eq!(board.occupied_count(), before + visible);
    }

    #[test]
    fn four_rotations_restore_the_shape(kind in kind()) {
        let shape = kind.shape();
        let mut cw = shape.clone();
        let mut ccw = shape.clone();
        for _ in 0..4 {
            cw = cw.rotated(RotationDirection::Clockwise);
            ccw = ccw.rotated(RotationDirection::CounterClockwise);
        }
        prop_assert_eq!(&cw, &shape);
        prop_assert_eq!(&ccw, &shape);
    }

    #[test]
    fn random_play_keeps_core_invariants(
        seed in any::<u64>(),
        moves in prop::collection::vec(0u8..6, 1..300),
    ) {
        let config = EngineConfig::default();
        let floor = config.min_interval;
        let mut game = Game::new(config, Box::new(UniformRandomizer::seeded(seed)), NullSink)
            .expect("default config is valid");
        game.start();

        let mut last_score = 0;
        for m in moves {
            if !game.is_running() {
                break;
            }
            match m {
                0 => { game.move_horizontal(-1); }
                1 => { game.move_horizontal(1); }
                2 => { game.rotate_active(); }
                3 => { game.soft_drop(); }
                4 => { game.hard_drop(); }
                _ => { game.tick(); }
            }

            if let Some(piece) = game.active() {
                prop_assert!(game.board().can_place(&piece.shape, piece.x, piece.y));
            }
            for r in 0..game.board().rows() {
                prop_assert!(!game.board().is_row_full(r));
            }
            prop_assert!(game.score() >= last_score);
            prop_assert_eq!(game.score() % 10, 0);
            prop_assert!(game.level() >= 1);
            prop_assert!(game.fall_interval() >= floor);
            prop_assert!(game.fall_interval() <= Duration::from_millis(500));
            last_score = game.score();
        }
    }
}
