use std::time::Instant;

use crate::grid::{Pos, Tile};
use crate::session::{GameSession, GameState};
use crate::visibility;

/// What the player can see of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Shown(Tile),
}

/// Read-only picture of a session at one instant, rebuilt every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<CellView>,
    pub player: Pos,
    pub exit: Pos,
    pub state: GameState,
    pub torches: u32,
    pub torch_active: bool,
    pub elapsed_secs: u64,
}

impl Snapshot {
    pub fn at(&self, row: usize, col: usize) -> Option<CellView> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }
}

impl GameSession {
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let grid = self.grid();
        let torch_active = self.torch_active();
        let cells = grid
            .iter()
            .map(|(pos, cell)| {
                if visibility::is_visible(&cell, pos, self.player(), torch_active) {
                    CellView::Shown(cell.tile)
                } else {
                    CellView::Hidden
                }
            })
            .collect();
        Snapshot {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
            player: self.player(),
            exit: self.exit(),
            state: self.state(),
            torches: self.torches(),
            torch_active,
            elapsed_secs: self.elapsed_at(now).as_secs(),
        }
    }
}
