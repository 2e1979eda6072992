//! Built-in movers for `vs_ai` and `ai_vs_ai` sessions.
//!
//! The mover occupies a host/opponent role exactly like a remote
//! endpoint; its decision logic is opaque to the session protocol.

mod random;
mod trait_def;

pub use random::RandomMover;
pub use trait_def::{AiError, AiMover};
