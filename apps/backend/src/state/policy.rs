//! Reconnection policy.
//!
//! Whether a disconnected host/opponent slot can be reclaimed by an
//! endpoint presenting the session id with a `rejoin_as` hint is a
//! deployment choice; the protocol works either way.

/// Runtime policy knobs for session rooms.
#[derive(Debug, Clone, Copy)]
pub struct ReclaimPolicy {
    /// Allow `rejoin_as` to re-bind a vacated mover slot. On by
    /// default.
    pub allow_role_reclaim: bool,
}

impl Default for ReclaimPolicy {
    fn default() -> Self {
        Self {
            allow_role_reclaim: true,
        }
    }
}

impl ReclaimPolicy {
    /// Read the policy from `GAME_ALLOW_ROLE_RECLAIM` (`0`/`false`
    /// disable it; anything else, or unset, keeps the default).
    pub fn from_env() -> Self {
        let allow_role_reclaim = match std::env::var("GAME_ALLOW_ROLE_RECLAIM") {
            Ok(raw) => !matches!(raw.trim(), "0" | "false" | "off"),
            Err(_) => true,
        };
        Self { allow_role_reclaim }
    }
}
