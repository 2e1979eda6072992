use std::ops::RangeInclusive;

use crate::domain::player::{GameType, PlayerHandle, Sign};
use crate::errors::domain::DomainError;

/// Allowed field dimensions, both axes.
pub const FIELD_SIZE: RangeInclusive<u8> = 3..=5;

/// Valid run-lengths for a field of the given dimensions.
pub fn valid_qty_to_win(width: u8, height: u8) -> RangeInclusive<u8> {
    1..=width.min(height)
}

/// Parameters a session is created with. All fields are already typed;
/// `validate` enforces the numeric ranges on top of that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub field_width: u8,
    pub field_height: u8,
    pub qty_to_win: u8,
    pub game_type: GameType,
    pub host_char: Sign,
    pub start_player_handle: PlayerHandle,
}

impl GameConfig {
    /// Authoritative creation-time validation. Client-side form limits
    /// are advisory only.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !FIELD_SIZE.contains(&self.field_width) {
            return Err(DomainError::InvalidConfig(format!(
                "field_width {} outside {:?}",
                self.field_width, FIELD_SIZE
            )));
        }
        if !FIELD_SIZE.contains(&self.field_height) {
            return Err(DomainError::InvalidConfig(format!(
                "field_height {} outside {:?}",
                self.field_height, FIELD_SIZE
            )));
        }
        let qty = valid_qty_to_win(self.field_width, self.field_height);
        if !qty.contains(&self.qty_to_win) {
            return Err(DomainError::InvalidConfig(format!(
                "qty_to_win {} outside {:?} for a {}x{} field",
                self.qty_to_win, qty, self.field_width, self.field_height
            )));
        }
        Ok(())
    }
}
