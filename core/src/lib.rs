#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use countdown::*;
pub use engine::*;
pub use error::*;
pub use scheduler::*;
pub use tasks::*;
pub use types::*;

mod board;
mod countdown;
mod engine;
mod error;
mod scheduler;
mod tasks;
mod types;

pub const DEFAULT_CELL_COUNT: CellCount = 9;
pub const DEFAULT_GAME_DURATION: Millis = 15_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub cell_count: CellCount,
    pub duration: Millis,
    pub cadence: CadencePolicy,
}

impl GameConfig {
    pub const fn new_unchecked(cell_count: CellCount, duration: Millis, cadence: CadencePolicy) -> Self {
        Self {
            cell_count,
            duration,
            cadence,
        }
    }

    pub fn new(cell_count: CellCount, duration: Millis) -> Self {
        let cell_count = cell_count.clamp(1, CellCount::MAX);
        let duration = duration.max(1);
        Self::new_unchecked(cell_count, duration, Default::default())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_CELL_COUNT, DEFAULT_GAME_DURATION, Default::default())
    }
}
