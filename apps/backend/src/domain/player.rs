//! Player identity types shared across the domain and the wire.
//!
//! The wire strings ("host", "opponent", ...) are closed enums here so
//! every dispatch site is exhaustively matched.

use serde::{Deserialize, Serialize};

/// One of the two mover roles. Spectators never appear in this type;
/// they cannot own cells or take turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerHandle {
    Host,
    Opponent,
}

impl PlayerHandle {
    /// The role that moves after this one.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerHandle::Host => PlayerHandle::Opponent,
            PlayerHandle::Opponent => PlayerHandle::Host,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerHandle::Host => "host",
            PlayerHandle::Opponent => "opponent",
        }
    }
}

/// The capacity in which an endpoint observes a session. Fixed at attach
/// time for the lifetime of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    Host,
    Opponent,
    Spectator,
}

impl ViewerRole {
    /// The mover handle for this viewer, if it has one.
    pub fn handle(self) -> Option<PlayerHandle> {
        match self {
            ViewerRole::Host => Some(PlayerHandle::Host),
            ViewerRole::Opponent => Some(PlayerHandle::Opponent),
            ViewerRole::Spectator => None,
        }
    }
}

impl From<PlayerHandle> for ViewerRole {
    fn from(handle: PlayerHandle) -> Self {
        match handle {
            PlayerHandle::Host => ViewerRole::Host,
            PlayerHandle::Opponent => ViewerRole::Opponent,
        }
    }
}

/// Display sign assigned to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    X,
    O,
}

impl Sign {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Sign::X => Sign::O,
            Sign::O => Sign::X,
        }
    }
}

/// Who occupies the two mover roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// Human host against a built-in mover.
    VsAi,
    /// Two humans; the session is joinable by id.
    VsHum,
    /// Two built-in movers; connecting humans spectate.
    AiVsAi,
}

/// Terminal verdict of a session. On the wire this is the
/// `result_of_move` string: the winner's handle, or `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(PlayerHandle),
    Draw,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win(handle) => handle.as_str(),
            GameResult::Draw => "draw",
        }
    }
}

impl Serialize for GameResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GameResult {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "host" => Ok(GameResult::Win(PlayerHandle::Host)),
            "opponent" => Ok(GameResult::Win(PlayerHandle::Opponent)),
            "draw" => Ok(GameResult::Draw),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["host", "opponent", "draw"],
            )),
        }
    }
}
