//! The authoritative grid of cells and win detection.
//!
//! Pure data and algorithm; no I/O. Result checking only examines the
//! lines passing through the last move instead of rescanning the whole
//! field; `tests_props_board` asserts this is verdict-identical to an
//! exhaustive scan.

use serde::Serialize;

use crate::domain::player::PlayerHandle;
use crate::errors::domain::DomainError;

/// Verdict after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerdict {
    Ongoing,
    Win(PlayerHandle),
    Draw,
}

/// The four line directions a winning run can lie on. Each is scanned
/// outward from the last move in both orientations.
const DIRECTIONS: [(i16, i16); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Fixed-size grid of `width x height` cells, column-major like the
/// wire format: `cells()[x][y]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    cells: Vec<Vec<Option<PlayerHandle>>>,
}

impl Board {
    /// Dimensions are fixed for the lifetime of the board.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            cells: vec![vec![None; height as usize]; width as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.cells.len() as u8
    }

    pub fn height(&self) -> u8 {
        self.cells.first().map_or(0, |col| col.len() as u8)
    }

    pub fn cells(&self) -> &[Vec<Option<PlayerHandle>>] {
        &self.cells
    }

    pub fn cell(&self, x: u8, y: u8) -> Option<PlayerHandle> {
        self.cells
            .get(x as usize)
            .and_then(|col| col.get(y as usize))
            .copied()
            .flatten()
    }

    fn in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && x < self.width() as i16 && y >= 0 && y < self.height() as i16
    }

    /// Mark a cell. Cells are monotonic: once occupied they are never
    /// cleared or overwritten.
    pub fn place(&mut self, x: u8, y: u8, handle: PlayerHandle) -> Result<(), DomainError> {
        if !self.in_bounds(x as i16, y as i16) {
            return Err(DomainError::OutOfBounds { x, y });
        }
        let cell = &mut self.cells[x as usize][y as usize];
        if cell.is_some() {
            return Err(DomainError::CellOccupied { x, y });
        }
        *cell = Some(handle);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|col| col.iter().all(|cell| cell.is_some()))
    }

    /// Result check localized to the lines through `(x, y)`, which must
    /// be the cell of the move just placed.
    pub fn check_result(&self, x: u8, y: u8, qty_to_win: u8) -> MoveVerdict {
        let Some(mover) = self.cell(x, y) else {
            // Callers only check right after a successful place.
            return MoveVerdict::Ongoing;
        };

        for (dx, dy) in DIRECTIONS {
            // The placed cell itself, plus contiguous same-handle cells
            // in both orientations of the direction.
            let mut run = 1u8;
            for orientation in [1i16, -1i16] {
                let (step_x, step_y) = (dx * orientation, dy * orientation);
                let (mut cx, mut cy) = (x as i16 + step_x, y as i16 + step_y);
                while self.in_bounds(cx, cy)
                    && self.cells[cx as usize][cy as usize] == Some(mover)
                {
                    run += 1;
                    cx += step_x;
                    cy += step_y;
                }
            }
            if run >= qty_to_win {
                return MoveVerdict::Win(mover);
            }
        }

        if self.is_full() {
            MoveVerdict::Draw
        } else {
            MoveVerdict::Ongoing
        }
    }
}
