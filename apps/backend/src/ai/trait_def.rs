//! Mover trait definition.

use std::fmt;

/// Errors that can occur during move selection.
#[derive(Debug)]
pub enum AiError {
    /// No empty cell to choose from.
    NoMovesAvailable,
    /// Mover encountered an internal error.
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::NoMovesAvailable => write!(f, "no moves available"),
            AiError::Internal(msg) => write!(f, "mover internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// Trait for built-in movers.
///
/// Implementations receive the set of currently open cells and must
/// choose one of them. Legality beyond that (turn order, phase) is the
/// session's job, not the mover's.
pub trait AiMover: Send + Sync {
    /// Choose a cell to mark from `open_cells`.
    fn choose_move(&self, open_cells: &[(u8, u8)]) -> Result<(u8, u8), AiError>;
}
