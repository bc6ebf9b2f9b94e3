//! Blocks: grid partitions used as units of distributed work.

use serde::{Deserialize, Serialize};

use crate::error::RiskResult;
use crate::geo::{Grid, GridCell};

/// A partition of the grid assigned one identifier. Blocks are both the
/// unit of distributed computation and the unit of curve-file output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub cells: Vec<GridCell>,
}

impl Block {
    pub fn new(id: u32, cells: Vec<GridCell>) -> Self {
        Self { id, cells }
    }

    /// Partition a grid into blocks of at most `block_size` cells, in
    /// row-major order.
    pub fn split(grid: &Grid, block_size: usize) -> RiskResult<Vec<Block>> {
        let block_size = block_size.max(1);
        let cells: Vec<GridCell> = grid.cells().collect();

        Ok(cells
            .chunks(block_size)
            .enumerate()
            .map(|(id, chunk)| Block::new(id as u32, chunk.to_vec()))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
