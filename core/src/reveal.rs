use core::ops::BitOr;

use crate::*;

impl Grid {
    /// Reveals a single concealed, unflagged cell without spreading.
    ///
    /// Bombs are never revealed here, reaching one is reported as [`RevealOutcome::HitBomb`]
    /// and the cell is left untouched.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self[coords];
        if cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }
        if cell.is_bomb() {
            log::debug!("Hit bomb at {:?}", coords);
            return RevealOutcome::HitBomb;
        }

        self[coords].reveal();
        log::debug!(
            "Revealed cell at {:?}, bomb count: {}",
            coords,
            self.bomb_neighbor_count(coords)
        );
        RevealOutcome::Revealed
    }

    /// Reveals `coords` and spreads from it.
    ///
    /// A zero cell spreads into every concealed, unflagged, safe neighbor. A numbered cell
    /// only spreads into such neighbors that are zeros themselves. Cells are marked revealed
    /// before their own neighbors are queued, so every cell is processed at most once.
    pub fn cascade(&mut self, coords: Coord2) -> RevealOutcome {
        let outcome = self.reveal(coords);
        if outcome != RevealOutcome::Revealed {
            return outcome;
        }

        // depth-first in neighbor order, same traversal as a recursive fill
        let mut to_visit = Vec::new();
        self.push_cascade_targets(coords, &mut to_visit);

        while let Some(visit_coords) = to_visit.pop() {
            if !self[visit_coords].reveal() {
                continue;
            }
            log::trace!(
                "Flood revealed cell at {:?}, bomb count: {}",
                visit_coords,
                self.bomb_neighbor_count(visit_coords)
            );
            self.push_cascade_targets(visit_coords, &mut to_visit);
        }

        outcome
    }

    /// Reveals around an already revealed cell once all of its bombs are accounted for by
    /// flags. Every unflagged, concealed neighbor is cascaded, including wrongly guessed
    /// bombs.
    pub fn chord(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.can_chord_at(coords) {
            return RevealOutcome::NoChange;
        }

        let targets: Vec<Coord2> = self
            .neighbors(coords)
            .filter(|(_, cell)| !cell.is_flagged() && !cell.is_revealed())
            .map(|(pos, _)| pos)
            .collect();
        log::debug!("Chord at {:?} on {} cells", coords, targets.len());

        targets
            .into_iter()
            .map(|neighbor_coords| self.cascade(neighbor_coords))
            .reduce(BitOr::bitor)
            .unwrap_or(RevealOutcome::NoChange)
    }

    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        let cell = self[coords];
        cell.is_revealed()
            && !cell.is_bomb()
            && !cell.is_flagged()
            && self.flag_neighbor_count(coords) == self.bomb_neighbor_count(coords)
    }

    fn push_cascade_targets(&self, coords: Coord2, to_visit: &mut Vec<Coord2>) {
        let open_region = self.bomb_neighbor_count(coords) == 0;
        let start = to_visit.len();

        to_visit.extend(
            self.neighbors(coords)
                .filter(|(_, cell)| !cell.is_flagged() && !cell.is_revealed() && !cell.is_bomb())
                .map(|(pos, _)| pos)
                .filter(|&pos| open_region || self.bomb_neighbor_count(pos) == 0),
        );

        // stack pops from the back, keep the first neighbor on top
        to_visit[start..].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: Coord, height: Coord, bombs: &[Coord2]) -> Grid {
        Grid::from_bomb_coords(width, height, bombs).unwrap()
    }

    #[test]
    fn cascade_from_zero_opens_region_and_border() {
        let mut grid = grid(5, 5, &[(4, 4)]);

        assert_eq!(grid.cascade((0, 0)), RevealOutcome::Revealed);
        assert_eq!(grid.revealed_count(), 24);
        assert!(!grid[(4, 4)].is_revealed());
        assert_eq!(grid.view((3, 3)), CellView::Revealed(1));
        assert_eq!(grid.view((0, 0)), CellView::Revealed(0));
    }

    #[test]
    fn cascade_stops_at_flags() {
        let mut grid = grid(5, 1, &[]);
        grid[(0, 2)].toggle_flag();

        assert_eq!(grid.cascade((0, 0)), RevealOutcome::Revealed);
        assert!(grid[(0, 0)].is_revealed());
        assert!(grid[(0, 1)].is_revealed());
        assert!(!grid[(0, 2)].is_revealed());
        assert!(!grid[(0, 3)].is_revealed());
        assert!(!grid[(0, 4)].is_revealed());
    }

    #[test]
    fn numbered_cell_does_not_open_numbered_neighbor() {
        let mut grid = grid(4, 1, &[(0, 0), (0, 3)]);

        assert_eq!(grid.cascade((0, 1)), RevealOutcome::Revealed);
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn numbered_cell_opens_zero_neighbor() {
        let mut grid = grid(4, 1, &[(0, 0)]);

        assert_eq!(grid.cascade((0, 1)), RevealOutcome::Revealed);
        assert!(grid[(0, 2)].is_revealed());
        assert!(grid[(0, 3)].is_revealed());
        assert!(!grid[(0, 0)].is_revealed());
    }

    #[test]
    fn cascade_on_bomb_reports_hit_and_reveals_nothing() {
        let mut grid = grid(3, 3, &[(1, 1)]);

        assert_eq!(grid.cascade((1, 1)), RevealOutcome::HitBomb);
        assert_eq!(grid.revealed_count(), 0);
    }

    #[test]
    fn flagged_cell_is_not_revealed() {
        let mut grid = grid(3, 3, &[]);
        grid[(1, 1)].toggle_flag();

        assert_eq!(grid.cascade((1, 1)), RevealOutcome::NoChange);
        assert_eq!(grid.revealed_count(), 0);
    }

    #[test]
    fn chord_reveals_unflagged_neighbors_when_flags_match() {
        let mut grid = grid(3, 3, &[(0, 1), (2, 1)]);

        assert_eq!(grid.cascade((1, 1)), RevealOutcome::Revealed);
        grid[(0, 1)].toggle_flag();
        grid[(2, 1)].toggle_flag();

        assert_eq!(grid.chord((1, 1)), RevealOutcome::Revealed);
        assert_eq!(grid.revealed_count(), 7);
        assert_eq!(grid.view((1, 0)), CellView::Revealed(2));
        assert_eq!(grid.view((0, 0)), CellView::Revealed(1));
    }

    #[test]
    fn chord_is_noop_when_counts_differ() {
        let mut grid = grid(3, 3, &[(0, 1), (2, 1)]);

        grid.cascade((1, 1));
        grid[(0, 1)].toggle_flag();

        assert!(!grid.can_chord_at((1, 1)));
        assert_eq!(grid.chord((1, 1)), RevealOutcome::NoChange);
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn chord_on_concealed_cell_is_noop() {
        let mut grid = grid(3, 3, &[]);
        assert_eq!(grid.chord((1, 1)), RevealOutcome::NoChange);
    }

    #[test]
    fn chord_with_misplaced_flag_hits_bomb() {
        let mut grid = grid(3, 3, &[(0, 1), (2, 1)]);

        grid.cascade((1, 1));
        grid[(0, 1)].toggle_flag();
        grid[(1, 0)].toggle_flag();

        assert_eq!(grid.chord((1, 1)), RevealOutcome::HitBomb);
    }

    #[test]
    fn large_empty_board_floods_without_recursion() {
        let mut grid = grid(Coord::MAX, Coord::MAX, &[]);

        assert_eq!(grid.cascade((127, 127)), RevealOutcome::Revealed);
        assert_eq!(grid.revealed_count(), grid.total_cells());
    }

    #[test]
    fn cascade_region_is_closed_and_safe() {
        use crate::generator::*;

        for seed in 0..16 {
            let mut grid = RandomBoardGenerator::new(seed).generate(GameConfig::new(12, 9, 15));
            let Some(start) = grid
                .iter()
                .find(|&(pos, cell)| !cell.is_bomb() && grid.bomb_neighbor_count(pos) == 0)
                .map(|(pos, _)| pos)
            else {
                continue;
            };

            assert_eq!(grid.cascade(start), RevealOutcome::Revealed);

            for (pos, cell) in grid.iter() {
                if !cell.is_revealed() {
                    continue;
                }
                assert!(!cell.is_bomb(), "revealed a bomb at {pos:?}");
                assert!(!cell.is_flagged());
                if grid.bomb_neighbor_count(pos) == 0 {
                    assert!(
                        grid.neighbors(pos).all(|(_, n)| n.is_revealed()),
                        "zero cell at {pos:?} left a concealed neighbor"
                    );
                }
            }
        }
    }
}
