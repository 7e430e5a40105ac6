//! Change notifications from the engine to whatever draws it.

/// What changed. Sent synchronously, after the state it describes is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Locked cells changed (lock, line clear, reset).
    GridChanged,
    /// The active piece moved, rotated, spawned or went away.
    PieceChanged,
    /// New score.
    ScoreChanged(u32),
    /// New level.
    LevelChanged(u32),
    /// Rows removed by one clear pass.
    LinesCleared(u32),
    GameOver,
}

/// Receiver of [`GameEvent`]s. The engine never assumes anything about when drawing happens.
pub trait RenderSink {
    fn notify(&mut self, event: GameEvent);
}

/// Records every event; handy for tests and replays.
impl RenderSink for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn notify(&mut self, _event: GameEvent) {}
}
