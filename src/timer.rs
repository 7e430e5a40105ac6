//! Gravity timer: one-shot deadline that the caller re-arms after each tick.

use std::time::{Duration, Instant};

/// Fires once per `schedule`. The interval is read when scheduling, so a level-up that shortens
/// the fall interval only affects the tick after the one already pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityTimer {
    deadline: Option<Instant>,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, interval: Duration) {
        self.deadline = Some(now + interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True (and disarmed) once the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending tick; `None` when stopped.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut timer = GravityTimer::new();
        timer.schedule(t0, 500 * MS);
        assert!(!timer.poll(t0 + 499 * MS));
        assert!(timer.poll(t0 + 500 * MS));
        assert!(!timer.poll(t0 + 1000 * MS));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_interval_change_applies_on_reschedule() {
        let t0 = Instant::now();
        let mut timer = GravityTimer::new();
        timer.schedule(t0, 500 * MS);
        // Level-up happens mid-wait; the pending tick keeps its deadline.
        let shorter = 100 * MS;
        assert!(!timer.poll(t0 + shorter));
        assert!(timer.poll(t0 + 500 * MS));
        timer.schedule(t0 + 500 * MS, shorter);
        assert_eq!(timer.time_until(t0 + 500 * MS), Some(shorter));
        assert!(timer.poll(t0 + 600 * MS));
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = GravityTimer::new();
        timer.schedule(t0, 10 * MS);
        timer.stop();
        assert!(!timer.poll(t0 + 1000 * MS));
        assert_eq!(timer.time_until(t0), None);
    }
}
