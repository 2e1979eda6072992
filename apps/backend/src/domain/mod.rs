//! Domain layer: pure game logic, no I/O.

pub mod board;
pub mod events;
pub mod player;
pub mod rules;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use board::{Board, MoveVerdict};
pub use events::SessionEvent;
pub use player::{GameResult, GameType, PlayerHandle, Sign, ViewerRole};
pub use rules::GameConfig;
pub use session::{Attachment, EndpointId, GameSession, Phase};
pub use snapshot::{SetupSnapshot, SignsMap};
