//! Attach-time snapshot delivered to a connecting endpoint.

use serde::Serialize;

use crate::domain::player::{PlayerHandle, Sign, ViewerRole};

/// Sign assignment for both mover roles, as shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignsMap {
    pub host: Sign,
    pub opponent: Sign,
}

impl SignsMap {
    pub fn from_host_char(host_char: Sign) -> Self {
        Self {
            host: host_char,
            opponent: host_char.opposite(),
        }
    }

    pub fn for_handle(&self, handle: PlayerHandle) -> Sign {
        match handle {
            PlayerHandle::Host => self.host,
            PlayerHandle::Opponent => self.opponent,
        }
    }
}

/// Full state snapshot sent in the `setup` reply. Always built under the
/// session lock, so it never reflects a partially applied move.
///
/// The side currently on turn is not a separate field: clients derive
/// it from `start_player_handle` and the parity of occupied cells in
/// `field` (even count: the start player moves; odd: the other side).
/// This holds because cells are write-once and only committed moves
/// flip the turn, both under the same lock this snapshot is built
/// under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupSnapshot {
    /// Shareable session id; only populated for joinable (two-human)
    /// sessions.
    pub connection_game_id: Option<String>,
    /// The receiving endpoint's own role.
    pub player_handle: ViewerRole,
    pub signs_map: SignsMap,
    pub start_player_handle: PlayerHandle,
    pub field_width: u8,
    pub field_height: u8,
    /// Column-major cell contents: `field[x][y]`.
    pub field: Vec<Vec<Option<PlayerHandle>>>,
}
