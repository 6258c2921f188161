use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size board of [`Cell`]s addressed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Bomb-free grid of `width` columns and `height` rows.
    pub fn new(width: Coord, height: Coord) -> Self {
        Self {
            cells: Array2::default(nd_index((height, width))),
        }
    }

    /// Builds a grid from a `(height, width)` bomb mask.
    pub fn from_bomb_mask(bomb_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = bomb_mask.dim();
        if rows == 0 || cols == 0 || rows > Coord::MAX as usize || cols > Coord::MAX as usize {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            cells: bomb_mask.map(|&is_bomb| Cell::new(is_bomb)),
        })
    }

    pub fn from_bomb_coords(width: Coord, height: Coord, bombs: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(width.max(1), height.max(1));

        for &coords in bombs {
            let coords = grid.validate_coords(coords)?;
            grid[coords].set_bomb(true);
        }

        Ok(grid)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.bounds();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// `(rows, cols)`, the exclusive upper bound of valid coordinates.
    pub fn bounds(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // shape is capped at Coord::MAX by every constructor
        (rows as Coord, cols as Coord)
    }

    pub fn width(&self) -> Coord {
        self.bounds().1
    }

    pub fn height(&self) -> Coord {
        self.bounds().0
    }

    pub fn total_cells(&self) -> CellCount {
        area(self.width(), self.height())
    }

    pub fn bomb_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_bomb()).count() as CellCount
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.bounds())
    }

    pub fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.iter_neighbors(coords).map(|pos| (pos, &self[pos]))
    }

    pub fn bomb_neighbor_count(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|(_, cell)| cell.is_bomb())
            .count() as u8
    }

    pub fn flag_neighbor_count(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|(_, cell)| cell.is_flagged())
            .count() as u8
    }

    /// Every position in row-major order together with its cell.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn view(&self, coords: Coord2) -> CellView {
        self[coords].view(self.bomb_neighbor_count(coords))
    }

    /// Render state for the whole board, `(height, width)` shaped.
    pub fn views(&self) -> Array2<CellView> {
        let mut views = Array2::default(self.cells.dim());
        for (coords, cell) in self.iter() {
            views[nd_index(coords)] = cell.view(self.bomb_neighbor_count(coords));
        }
        views
    }

    /// Exposes every cell, used when the game ends.
    pub(crate) fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reveal();
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Array2<Cell> {
        &mut self.cells
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd_index(coords)]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[nd_index(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_is_rows_by_cols() {
        let grid = Grid::new(5, 3);

        assert_eq!(grid.bounds(), (3, 5));
        assert_eq!(grid.total_cells(), 15);
        assert!(grid.validate_coords((2, 4)).is_ok());
        assert_eq!(grid.validate_coords((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(grid.validate_coords((0, 5)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn bomb_neighbor_count_excludes_self() {
        let grid = Grid::from_bomb_coords(3, 3, &[(1, 1), (0, 0)]).unwrap();

        assert_eq!(grid.bomb_neighbor_count((1, 1)), 1);
        assert_eq!(grid.bomb_neighbor_count((0, 1)), 2);
        assert_eq!(grid.bomb_neighbor_count((2, 2)), 1);
        assert_eq!(grid.bomb_count(), 2);
    }

    #[test]
    fn fully_surrounded_cell_counts_eight() {
        let ring: Vec<_> = Neighbors::new((1, 1), (3, 3)).collect();
        let grid = Grid::from_bomb_coords(3, 3, &ring).unwrap();

        assert_eq!(grid.bomb_neighbor_count((1, 1)), 8);
    }

    #[test]
    fn flag_neighbor_count_tracks_flags() {
        let mut grid = Grid::new(3, 3);
        grid[(0, 0)].toggle_flag();
        grid[(2, 2)].toggle_flag();
        grid[(1, 1)].toggle_flag();

        assert_eq!(grid.flag_neighbor_count((1, 1)), 2);
        assert_eq!(grid.flag_neighbor_count((0, 1)), 2);
        assert_eq!(grid.flagged_count(), 3);
    }

    #[test]
    fn from_bomb_coords_rejects_out_of_range() {
        assert_eq!(
            Grid::from_bomb_coords(2, 2, &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn from_bomb_mask_rejects_empty_shape() {
        let mask: Array2<bool> = Array2::default((0, 4));
        assert_eq!(Grid::from_bomb_mask(&mask), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn reveal_all_exposes_every_cell() {
        let mut grid = Grid::from_bomb_coords(2, 2, &[(0, 0)]).unwrap();
        grid[(0, 0)].toggle_flag();
        grid.reveal_all();

        assert_eq!(grid.revealed_count(), 4);
        let views = grid.views();
        assert_eq!(views[[0, 0]], CellView::FlaggedBomb);
        assert_eq!(views[[1, 1]], CellView::Revealed(1));
    }
}
