//! Layout and drawing: playfield, sidebar, pause and game-over overlays.

use crate::input::Controls;
use crate::theme::Theme;
use blockfall::{Cell, Game, RenderSink};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the game-over fade (TachyonFX) in ms.
const GAME_OVER_FADE_MS: u32 = 900;

const BLOCK: &str = "██";
const GHOST: &str = "░░";
const EMPTY: &str = " ·";

/// Playfield size in terminal cells, border included.
fn playfield_size(columns: usize, rows: usize) -> (u16, u16) {
    (columns as u16 * CELL_WIDTH + 2, rows as u16 + 2)
}

/// Centre playfield and sidebar in `area`; returns (playfield outer, sidebar).
fn layout<S: RenderSink>(area: Rect, game: &Game<S>) -> (Rect, Rect) {
    let board = game.board();
    let (pw, ph) = playfield_size(board.columns(), board.rows());
    let total_w = pw + SIDEBAR_WIDTH;

    let center_horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area)[1];
    let active = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(center_horiz)[1];
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active);
    (parts[0], parts[1])
}

/// Inner board rect (no border), clipped to the playfield.
fn board_rect<S: RenderSink>(playfield: Rect, game: &Game<S>) -> Rect {
    let board = game.board();
    Rect {
        x: playfield.x + 1,
        y: playfield.y + 1,
        width: (board.columns() as u16 * CELL_WIDTH).min(playfield.width.saturating_sub(2)),
        height: (board.rows() as u16).min(playfield.height.saturating_sub(2)),
    }
}

/// Draw one frame. After game over, fades the stack with TachyonFX and
/// updates `game_over_effect` / `effect_process_time`.
pub fn draw<S: RenderSink>(
    frame: &mut Frame,
    game: &Game<S>,
    theme: &Theme,
    controls: Controls,
    paused: bool,
    game_over_effect: &mut Option<Effect>,
    effect_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    let (playfield, sidebar) = layout(area, game);
    draw_playfield(frame, game, theme, playfield);
    draw_sidebar(frame, game, theme, controls, sidebar);

    if game.is_game_over() {
        apply_game_over_effect(
            frame,
            game,
            theme,
            board_rect(playfield, game),
            game_over_effect,
            effect_process_time,
            now,
        );
        draw_game_over(frame, game, theme, playfield);
    } else if paused {
        draw_pause_overlay(frame, theme, playfield);
    }
}

fn draw_playfield<S: RenderSink>(frame: &mut Frame, game: &Game<S>, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.grid).bg(theme.bg))
        .title(Span::styled(" Blockfall ", Style::default().fg(theme.title)));
    block.render(area, frame.buffer_mut());
    let rect = board_rect(area, game);

    let buf = frame.buffer_mut();
    let mut put = |col: i32, row: i32, symbol: &str, style: Style| {
        if col < 0 || row < 0 {
            return;
        }
        let x = rect.x + col as u16 * CELL_WIDTH;
        let y = rect.y + row as u16;
        if x + CELL_WIDTH <= rect.x + rect.width && y < rect.y + rect.height {
            buf.set_string(x, y, symbol, style);
        }
    };

    for (row, cells) in game.board().iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (symbol, style) = match *cell {
                Cell::Block(c) => (BLOCK, Style::default().fg(theme.block_color(c)).bg(theme.bg)),
                Cell::Empty => (EMPTY, Style::default().fg(theme.grid).bg(theme.bg)),
            };
            put(col as i32, row as i32, symbol, style);
        }
    }

    let Some(piece) = game.active() else {
        return;
    };
    if let Some(ghost) = game.ghost_row().filter(|&g| g != piece.y) {
        let style = Style::default().fg(theme.inactive_fg).bg(theme.bg);
        for (dx, dy) in piece.shape.filled() {
            put(piece.x + dx, ghost + dy, GHOST, style);
        }
    }
    let style = Style::default().fg(theme.block_color(piece.color)).bg(theme.bg);
    for (col, row) in piece.cells() {
        put(col, row, BLOCK, style);
    }
}

fn draw_sidebar<S: RenderSink>(
    frame: &mut Frame,
    game: &Game<S>,
    theme: &Theme,
    controls: Controls,
    area: Rect,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.grid).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + score, level, lines, next level)
            Constraint::Length(1), // gap
            Constraint::Fill(1),   // Keys
        ])
        .split(area);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Stats ", title_style));
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let to_next = game
        .config()
        .lines_per_level
        .saturating_sub(game.lines_since_level());
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats_lines = vec![
        stat("Score: ", game.score().to_string()),
        stat("Level: ", game.level().to_string()),
        stat("Lines: ", game.lines_total().to_string()),
        stat("Next level: ", to_next.to_string()),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Keys ", title_style));
    let keys_inner = keys_block.inner(chunks[2]);
    keys_block.render(chunks[2], frame.buffer_mut());
    let mut keys: Vec<(&str, &str)> = vec![("←→ h l", "move"), ("↓ j", "soft drop")];
    if controls == Controls::Full {
        keys.push(("↑ k", "rotate"));
        keys.push(("Space", "hard drop"));
    }
    keys.extend([("P", "pause"), ("R", "restart"), ("Q", "quit")]);
    let key_lines: Vec<Line> = keys
        .into_iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<8}"), title_style),
                Span::styled(what, fg_style),
            ])
        })
        .collect();
    Paragraph::new(Text::from(key_lines)).render(keys_inner, frame.buffer_mut());
}

/// Buffer positions of every locked cell, for the game-over fade.
fn stack_buffer_positions<S: RenderSink>(rect: Rect, game: &Game<S>) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for (row, cells) in game.board().iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let x0 = rect.x + col as u16 * CELL_WIDTH;
            let y = rect.y + row as u16;
            for x in x0..(x0 + CELL_WIDTH).min(rect.x + rect.width) {
                if y < rect.y + rect.height {
                    set.insert((x, y));
                }
            }
        }
    }
    set
}

/// Create or advance the fade that greys out the stack once the session ends.
fn apply_game_over_effect<S: RenderSink>(
    frame: &mut Frame,
    game: &Game<S>,
    theme: &Theme,
    rect: Rect,
    game_over_effect: &mut Option<Effect>,
    effect_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = effect_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    *effect_process_time = Some(now);

    if game_over_effect.is_none() {
        let stack = stack_buffer_positions(rect, game);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            stack.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(
            theme.inactive_fg,
            theme.bg,
            (GAME_OVER_FADE_MS, Interpolation::Linear),
        )
        .with_filter(filter)
        .with_area(rect);
        *game_over_effect = Some(effect);
    }

    if let Some(effect) = game_over_effect {
        frame.render_effect(effect, rect, tfx_delta);
    }
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P resume  Q quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.grid).bg(theme.bg)),
        )
        .render(popup(area, 20, 6), frame.buffer_mut());
}

fn draw_game_over<S: RenderSink>(frame: &mut Frame, game: &Game<S>, theme: &Theme, area: Rect) {
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", game.score()), fg)),
        Line::from(Span::styled(format!(" Level: {} ", game.level()), fg)),
        Line::from(Span::styled(format!(" Lines: {} ", game.lines_total()), fg)),
        Line::from(""),
        Line::from(Span::styled(" R restart  Q quit ", fg)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.grid).bg(theme.bg)),
        )
        .render(popup(area, 20, 10), frame.buffer_mut());
}
