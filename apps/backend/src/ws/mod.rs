//! Websocket transport: wire protocol, per-session rooms, endpoint
//! actors.

pub mod ai_player;
pub mod hub;
pub mod protocol;
pub mod session;
