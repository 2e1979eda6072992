//! Events emitted by session mutations, consumed by the fan-out layer.

use crate::domain::player::{GameResult, PlayerHandle};

/// A state change the session wants broadcast to attached endpoints.
///
/// `setup` is not an event: it is the direct reply to the attaching
/// endpoint and never fans out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A mover role was bound. Excluded from delivery to the joiner
    /// itself, which learns its role from `setup`.
    PlayerJoined { player_handle: PlayerHandle },
    /// A mover role was vacated.
    PlayerLeft { player_handle: PlayerHandle },
    /// A legal move was committed.
    Move {
        player_handle: PlayerHandle,
        x: u8,
        y: u8,
    },
    /// The session reached its terminal phase. Always emitted after the
    /// `Move` that caused it.
    GameOver { result_of_move: GameResult },
}
