//! Random mover - picks a uniformly random open cell.
//!
//! Reference implementation of [`AiMover`]: thread-safe interior
//! mutability via `Mutex<StdRng>`, optional seeding for deterministic
//! tests, no panics.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_def::{AiError, AiMover};

pub struct RandomMover {
    /// `AiMover` methods take `&self`; the RNG needs mutable access.
    rng: Mutex<StdRng>,
}

impl RandomMover {
    /// `seed = None` uses OS entropy; `Some(seed)` is reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiMover for RandomMover {
    fn choose_move(&self, open_cells: &[(u8, u8)]) -> Result<(u8, u8), AiError> {
        if open_cells.is_empty() {
            return Err(AiError::NoMovesAvailable);
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AiError::Internal("rng mutex poisoned".to_string()))?;
        let idx = rng.random_range(0..open_cells.len());
        Ok(open_cells[idx])
    }
}
