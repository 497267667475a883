use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered sequence of holes, each with a mole-up flag.
///
/// Out-of-range cell ids are rejected with [`GameError::InvalidCell`] at the
/// validated accessors; the `Index` impls assume an already-validated id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    moles: Vec<bool>,
}

impl Board {
    pub fn new(cell_count: CellCount) -> Self {
        Self {
            moles: vec![false; cell_count as usize],
        }
    }

    pub fn cell_count(&self) -> CellCount {
        self.moles.len() as CellCount
    }

    pub fn validate_cell(&self, cell: CellId) -> Result<CellId> {
        if (cell as usize) < self.moles.len() {
            Ok(cell)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    pub fn is_mole_up(&self, cell: CellId) -> Result<bool> {
        Ok(self[self.validate_cell(cell)?])
    }

    pub fn set_mole_up(&mut self, cell: CellId, up: bool) -> Result<()> {
        let cell = self.validate_cell(cell)?;
        self[cell] = up;
        Ok(())
    }

    /// How many moles are currently up.
    pub fn up_count(&self) -> CellCount {
        self.moles.iter().filter(|&&up| up).count() as CellCount
    }

    /// The lowest cell with its mole up, if any.
    pub fn first_up(&self) -> Option<CellId> {
        self.moles.iter().position(|&up| up).map(|i| i as CellId)
    }

    pub fn clear_all(&mut self) {
        self.moles.fill(false);
    }
}

impl Index<CellId> for Board {
    type Output = bool;

    fn index(&self, cell: CellId) -> &Self::Output {
        &self.moles[cell as usize]
    }
}

impl IndexMut<CellId> for Board {
    fn index_mut(&mut self, cell: CellId) -> &mut Self::Output {
        &mut self.moles[cell as usize]
    }
}
