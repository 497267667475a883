use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed pop-up cadence.
///
/// The policy is: exactly one mole up at a time, the next pop-up after a
/// uniform random delay in `[min_popup_delay, max_popup_delay]`, and each mole
/// staying up for `visible_duration` unless a hit clears it first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadencePolicy {
    pub min_popup_delay: Millis,
    pub max_popup_delay: Millis,
    pub visible_duration: Millis,
}

impl CadencePolicy {
    pub const fn new_unchecked(
        min_popup_delay: Millis,
        max_popup_delay: Millis,
        visible_duration: Millis,
    ) -> Self {
        Self {
            min_popup_delay,
            max_popup_delay,
            visible_duration,
        }
    }

    pub fn new(min_popup_delay: Millis, max_popup_delay: Millis, visible_duration: Millis) -> Self {
        let max_popup_delay = max_popup_delay.max(min_popup_delay);
        Self::new_unchecked(min_popup_delay, max_popup_delay, visible_duration)
    }
}

impl Default for CadencePolicy {
    fn default() -> Self {
        Self::new_unchecked(500, 1500, 900)
    }
}

/// Randomized mole placement: uniform cell selection and pop-up delays.
///
/// The scheduler only answers policy questions; the session owns the task
/// queue and decides when to ask.
#[derive(Clone, Debug)]
pub struct MoleScheduler {
    cadence: CadencePolicy,
    rng: SmallRng,
}

impl MoleScheduler {
    pub fn new(cadence: CadencePolicy, seed: u64) -> Self {
        Self {
            cadence,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn cadence(&self) -> CadencePolicy {
        self.cadence
    }

    /// Delay until the next pop-up, uniform in the cadence window.
    pub fn next_popup_delay(&mut self) -> Millis {
        self.rng
            .random_range(self.cadence.min_popup_delay..=self.cadence.max_popup_delay)
    }

    /// Uniform random cell over the whole board.
    pub fn pick_cell(&mut self, cell_count: CellCount) -> CellId {
        self.rng.random_range(0..cell_count)
    }
}
