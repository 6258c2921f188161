use serde::{Deserialize, Serialize};

/// State of a single board position. The position itself is implied by where the cell
/// lives inside its [`Grid`](crate::Grid).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_bomb: bool,
    is_flagged: bool,
    is_revealed: bool,
}

/// What the presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Concealed,
    Flagged,
    /// Revealed safe cell with its bomb-neighbor count, `0..=8`.
    Revealed(u8),
    /// Unflagged bomb exposed by the end-of-game reveal.
    Bomb,
    /// Flagged bomb exposed by the end-of-game reveal; the flag wins over the bomb.
    FlaggedBomb,
}

impl Default for CellView {
    fn default() -> Self {
        Self::Concealed
    }
}

/// Result of toggling the flag on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagToggle {
    NoChange,
    Flagged,
    Unflagged,
}

impl Cell {
    pub const fn new(is_bomb: bool) -> Self {
        Self {
            is_bomb,
            is_flagged: false,
            is_revealed: false,
        }
    }

    pub const fn is_bomb(&self) -> bool {
        self.is_bomb
    }

    pub const fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    /// Maps this cell and its bomb-neighbor count to what should be drawn.
    pub const fn view(&self, bomb_neighbors: u8) -> CellView {
        match (self.is_revealed, self.is_bomb, self.is_flagged) {
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Concealed,
            (true, true, true) => CellView::FlaggedBomb,
            (true, true, false) => CellView::Bomb,
            (true, false, _) => CellView::Revealed(bomb_neighbors),
        }
    }

    pub(crate) fn set_bomb(&mut self, is_bomb: bool) {
        self.is_bomb = is_bomb;
    }

    /// Marks the cell revealed, returns whether it was concealed before.
    pub(crate) fn reveal(&mut self) -> bool {
        !core::mem::replace(&mut self.is_revealed, true)
    }

    pub(crate) fn toggle_flag(&mut self) -> FlagToggle {
        if self.is_revealed {
            return FlagToggle::NoChange;
        }

        self.is_flagged = !self.is_flagged;
        if self.is_flagged {
            FlagToggle::Flagged
        } else {
            FlagToggle::Unflagged
        }
    }
}
