//! App: terminal init, main loop, gravity timer and key handling.

use crate::input::{Action, Controls, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use blockfall::{Game, GameEvent, GravityTimer, RenderSink};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Upper bound on how long the loop sleeps waiting for input; keeps effects animating.
const FRAME: Duration = Duration::from_millis(16);

/// Render sink for the terminal: remembers that something changed since the last frame.
#[derive(Debug, Default)]
pub struct Redraw {
    dirty: bool,
    game_over: bool,
}

impl Redraw {
    /// True once per batch of changes.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True once after the session ends.
    pub fn take_game_over(&mut self) -> bool {
        std::mem::take(&mut self.game_over)
    }
}

impl RenderSink for Redraw {
    fn notify(&mut self, event: GameEvent) {
        self.dirty = true;
        if event == GameEvent::GameOver {
            self.game_over = true;
        }
    }
}

pub struct App {
    game: Game<Redraw>,
    theme: Theme,
    controls: Controls,
    timer: GravityTimer,
    paused: bool,
    /// Pause toggles and resizes change the frame without touching the engine.
    force_redraw: bool,
    /// TachyonFX fade of the stack, created on the first game-over frame.
    game_over_effect: Option<Effect>,
    /// Last time the game-over effect was processed (for delta).
    effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(game: Game<Redraw>, theme: Theme, controls: Controls) -> Self {
        Self {
            game,
            theme,
            controls,
            timer: GravityTimer::new(),
            paused: false,
            force_redraw: true,
            game_over_effect: None,
            effect_process_time: None,
        }
    }

    fn restart(&mut self, now: Instant) {
        self.game.restart();
        self.paused = false;
        self.game_over_effect = None;
        self.effect_process_time = None;
        self.timer.schedule(now, self.game.fall_interval());
    }

    fn toggle_pause(&mut self, now: Instant) {
        if !self.game.is_running() {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            self.timer.stop();
        } else {
            self.timer.schedule(now, self.game.fall_interval());
        }
        self.force_redraw = true;
    }

    fn apply_action(&mut self, action: Action, now: Instant) -> ControlFlow<()> {
        match action {
            Action::Quit => return ControlFlow::Break(()),
            Action::Restart => self.restart(now),
            Action::Pause => self.toggle_pause(now),
            _ if self.paused => {}
            Action::MoveLeft => {
                self.game.move_horizontal(-1);
            }
            Action::MoveRight => {
                self.game.move_horizontal(1);
            }
            Action::Rotate => {
                self.game.rotate_active();
            }
            Action::SoftDrop => {
                self.game.soft_drop();
            }
            Action::HardDrop => {
                self.game.hard_drop();
            }
            Action::None => {}
        }
        self.settle();
        ControlFlow::Continue(())
    }

    /// Fire gravity if due, re-arming with the interval current at that moment.
    fn tick_gravity(&mut self, now: Instant) {
        if self.timer.poll(now) {
            self.game.tick();
            if self.game.is_running() {
                self.timer.schedule(now, self.game.fall_interval());
            }
        }
        self.settle();
    }

    /// Stop the clock once the engine reports game over.
    fn settle(&mut self) {
        if self.game.sink_mut().take_game_over() {
            self.timer.stop();
            self.paused = false;
            self.force_redraw = true;
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.restart(Instant::now());
        loop {
            let now = Instant::now();
            let dirty = self.game.sink_mut().take_dirty();
            let animating = self.game.is_game_over()
                && self.game_over_effect.as_ref().is_none_or(|e| !e.done());
            if dirty || animating || std::mem::take(&mut self.force_redraw) {
                terminal.draw(|f| {
                    crate::ui::draw(
                        f,
                        &self.game,
                        &self.theme,
                        self.controls,
                        self.paused,
                        &mut self.game_over_effect,
                        &mut self.effect_process_time,
                        now,
                    );
                })?;
            }

            let timeout = self.timer.time_until(now).map_or(FRAME, |t| t.min(FRAME));
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            let action = key_to_action(key, self.controls);
                            if self.apply_action(action, Instant::now()).is_break() {
                                return Ok(());
                            }
                        }
                        Event::Resize(..) => self.force_redraw = true,
                        _ => {}
                    }
                }
            }

            self.tick_gravity(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall::{EngineConfig, SequenceRandomizer, TetrominoKind};

    fn app() -> App {
        let rnd = SequenceRandomizer::new([TetrominoKind::O]);
        let game = Game::new(EngineConfig::default(), Box::new(rnd), Redraw::default()).unwrap();
        App::new(game, Theme::default(), Controls::Full)
    }

    #[test]
    fn test_redraw_sink_flags() {
        let mut r = Redraw::default();
        r.notify(GameEvent::PieceChanged);
        assert!(r.take_dirty());
        assert!(!r.take_dirty());
        r.notify(GameEvent::GameOver);
        assert!(r.take_game_over());
        assert!(!r.take_game_over());
    }

    #[test]
    fn test_gravity_follows_timer() {
        let mut app = app();
        let t0 = Instant::now();
        app.restart(t0);
        app.tick_gravity(t0 + Duration::from_millis(499));
        assert_eq!(app.game.active().unwrap().y, 0);
        app.tick_gravity(t0 + Duration::from_millis(500));
        assert_eq!(app.game.active().unwrap().y, 1);
        assert!(app.timer.is_armed());
    }

    #[test]
    fn test_pause_stops_gravity_and_input() {
        let mut app = app();
        let t0 = Instant::now();
        app.restart(t0);
        let _ = app.apply_action(Action::Pause, t0);
        assert!(app.paused);
        assert!(!app.timer.is_armed());
        let _ = app.apply_action(Action::MoveLeft, t0);
        assert_eq!(app.game.active().unwrap().x, 4);
        app.tick_gravity(t0 + Duration::from_secs(5));
        assert_eq!(app.game.active().unwrap().y, 0);
        let _ = app.apply_action(Action::Pause, t0);
        assert!(!app.paused);
        assert!(app.timer.is_armed());
    }

    #[test]
    fn test_game_over_stops_timer_and_restart_rearms() {
        let mut app = app();
        let t0 = Instant::now();
        app.restart(t0);
        while app.game.is_running() {
            let _ = app.apply_action(Action::HardDrop, t0);
        }
        assert!(!app.timer.is_armed());
        // Straggling tick after game over does nothing.
        app.tick_gravity(t0 + Duration::from_secs(10));
        assert!(app.game.is_game_over());

        let _ = app.apply_action(Action::Restart, t0);
        assert!(app.game.is_running());
        assert!(app.timer.is_armed());
        assert_eq!(app.game.board().occupied_count(), 0);
    }

    #[test]
    fn test_quit_breaks_loop() {
        let mut app = app();
        app.restart(Instant::now());
        assert!(app.apply_action(Action::Quit, Instant::now()).is_break());
        assert!(app.apply_action(Action::None, Instant::now()).is_continue());
    }
}
