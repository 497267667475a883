use serde::{Deserialize, Serialize};

use crate::*;

/// Display update cadence.
pub const TICK_INTERVAL: Millis = 100;

/// Extra slack before the redundant safety stop runs.
pub const SAFETY_STOP_SLACK: Millis = 50;

/// Fixed-duration countdown over the session timeline.
///
/// Tracks milliseconds internally; the display value is whole seconds rounded
/// up. This is a pure scheduling utility with no failure mode: it only gets
/// updated, restarted, or dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    end_at: Millis,
    remaining_ms: Millis,
}

impl Countdown {
    pub fn start(now: Millis, duration: Millis) -> Self {
        Self {
            end_at: now + duration,
            remaining_ms: duration,
        }
    }

    pub fn end_at(&self) -> Millis {
        self.end_at
    }

    /// Recomputes `remaining = max(0, end_at - now)`.
    pub fn update(&mut self, now: Millis) {
        self.remaining_ms = self.end_at.saturating_sub(now);
    }

    /// Forces the countdown to its expired state.
    pub fn expire(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Whole seconds left, rounded up, for display only.
    pub fn display_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_starts_with_full_duration() {
        let countdown = Countdown::start(1000, 15_000);

        assert_eq!(countdown.end_at(), 16_000);
        assert_eq!(countdown.remaining_ms(), 15_000);
        assert_eq!(countdown.display_secs(), 15);
        assert!(!countdown.is_finished());
    }

    #[test]
    fn update_clamps_at_zero() {
        let mut countdown = Countdown::start(0, 15_000);

        countdown.update(20_000);

        assert_eq!(countdown.remaining_ms(), 0);
        assert_eq!(countdown.display_secs(), 0);
        assert!(countdown.is_finished());
    }

    #[test]
    fn display_seconds_round_up() {
        let mut countdown = Countdown::start(0, 15_000);

        countdown.update(100);
        assert_eq!(countdown.remaining_ms(), 14_900);
        assert_eq!(countdown.display_secs(), 15);

        countdown.update(14_001);
        assert_eq!(countdown.display_secs(), 1);

        countdown.update(15_000);
        assert_eq!(countdown.display_secs(), 0);
    }

    #[test]
    fn expire_forces_zero() {
        let mut countdown = Countdown::start(0, 15_000);

        countdown.expire();

        assert!(countdown.is_finished());
        assert_eq!(countdown.display_secs(), 0);
    }
}
