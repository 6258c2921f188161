/// Single coordinate axis used for board width, height, rows, and columns.
pub type Coord = u8;

/// Count type used for bomb counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// `ndarray` index of a position.
pub const fn nd_index((row, col): Coord2) -> [usize; 2] {
    [row as usize, col as usize]
}

/// Number of cells on a `width` x `height` board, saturating.
pub const fn area(width: Coord, height: Coord) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

/// The 3x3 window around a position clipped to the board, walked row by row with the
/// center skipped. Nothing wraps around the edges.
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Coord2,
    cursor: Option<Coord2>,
    first_col: Coord,
    last: Coord2,
}

impl Neighbors {
    /// `bounds` is `(rows, cols)`, `center` must lie inside it.
    pub(crate) fn new(center: Coord2, (rows, cols): Coord2) -> Self {
        let (row, col) = center;
        let first_col = col.saturating_sub(1);
        let last = (
            row.saturating_add(1).min(rows.saturating_sub(1)),
            col.saturating_add(1).min(cols.saturating_sub(1)),
        );
        let cursor = (rows > 0 && cols > 0).then_some((row.saturating_sub(1), first_col));

        Self {
            center,
            cursor,
            first_col,
            last,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pos @ (row, col)) = self.cursor {
            self.cursor = if col < self.last.1 {
                Some((row, col + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if pos != self.center {
                return Some(pos);
            }
        }
        None
    }
}
