//! Wire messages.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": {...}}`.
//! Event names form a closed set; anything else fails deserialization
//! and is treated as a protocol violation by the session actor.

use serde::{Deserialize, Serialize};

use crate::domain::events::SessionEvent;
use crate::domain::player::{GameResult, PlayerHandle};
use crate::domain::snapshot::SetupSnapshot;

/// Client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMsg {
    Move { x: u8, y: u8 },
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMsg {
    Setup(SetupSnapshot),
    Move {
        player_handle: PlayerHandle,
        x: u8,
        y: u8,
    },
    #[serde(rename = "playerjoined")]
    PlayerJoined { player_handle: PlayerHandle },
    #[serde(rename = "playerleft")]
    PlayerLeft { player_handle: PlayerHandle },
    #[serde(rename = "gameover")]
    GameOver { result_of_move: GameResult },
}

impl From<SessionEvent> for ServerMsg {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::PlayerJoined { player_handle } => {
                ServerMsg::PlayerJoined { player_handle }
            }
            SessionEvent::PlayerLeft { player_handle } => ServerMsg::PlayerLeft { player_handle },
            SessionEvent::Move {
                player_handle,
                x,
                y,
            } => ServerMsg::Move {
                player_handle,
                x,
                y,
            },
            SessionEvent::GameOver { result_of_move } => ServerMsg::GameOver { result_of_move },
        }
    }
}
