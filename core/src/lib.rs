use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use clock::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use types::*;

mod cell;
mod clock;
mod error;
mod generator;
mod grid;
mod reveal;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub bombs: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, bombs: CellCount) -> Self {
        Self {
            width,
            height,
            bombs,
        }
    }

    /// Clamps the size to at least one cell per side and the bomb count to `[0, width * height]`.
    pub fn new(width: Coord, height: Coord, requested_bombs: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let total_cells = area(width, height);
        let bombs = requested_bombs.clamp(0, i32::from(total_cells));
        if bombs != requested_bombs {
            log::warn!(
                "Requested {} bombs on a {}x{} board, clamped to {}",
                requested_bombs,
                width,
                height,
                bombs
            );
        }
        // in range after the clamp
        Self::new_unchecked(width, height, bombs as CellCount)
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.width, self.height)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.bombs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(20, 20, 99)
    }
}

/// Result of revealing on a [`Grid`], before the session interprets it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitBomb,
}

/// Used to merge outcomes when chording
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitBomb, _) => HitBomb,
            (_, HitBomb) => HitBomb,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
