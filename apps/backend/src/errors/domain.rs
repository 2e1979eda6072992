//! Domain-level error type used across the game logic and the websocket
//! layer.
//!
//! This error type is HTTP- and transport-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Central domain error type.
///
/// Move rejections (`OutOfBounds`, `CellOccupied`, `NotYourTurn`,
/// `GameNotActive`) are expected races or stale clients: they are logged
/// and dropped, never surfaced to the sender. The authoritative event
/// stream is the client's sole resynchronization mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Session creation parameters out of range or ill-typed.
    InvalidConfig(String),
    /// Join request against an unknown or expired session id.
    SessionNotFound(String),
    /// Move target outside the field.
    OutOfBounds { x: u8, y: u8 },
    /// Move target already marked.
    CellOccupied { x: u8, y: u8 },
    /// Move from the role not currently on turn.
    NotYourTurn,
    /// Move while the session is not in its active phase.
    GameNotActive,
}

impl DomainError {
    /// Whether this rejection is dropped silently from the game's
    /// perspective (logged, state untouched, no reply).
    pub fn is_move_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::OutOfBounds { .. }
                | DomainError::CellOccupied { .. }
                | DomainError::NotYourTurn
                | DomainError::GameNotActive
        )
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidConfig(d) => write!(f, "invalid config: {d}"),
            DomainError::SessionNotFound(id) => write!(f, "session not found: {id}"),
            DomainError::OutOfBounds { x, y } => write!(f, "cell ({x}, {y}) is out of bounds"),
            DomainError::CellOccupied { x, y } => write!(f, "cell ({x}, {y}) is already set"),
            DomainError::NotYourTurn => write!(f, "not your turn"),
            DomainError::GameNotActive => write!(f, "game is not active"),
        }
    }
}

impl Error for DomainError {}
