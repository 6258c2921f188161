use super::*;

/// Purely random generation. Dense boards start full and get bombs removed, sparse boards
/// start empty and get bombs added, so the random picks always target the minority.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Grid {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let bombs = config.bombs.min(total_cells);
        if bombs != config.bombs {
            log::warn!(
                "Board already full, requested {} bombs but only fits {}",
                config.bombs,
                total_cells
            );
        }

        let dense = 2 * u32::from(bombs) > u32::from(total_cells);
        let (target, pending) = if dense {
            (false, total_cells - bombs)
        } else {
            (true, bombs)
        };

        let mut grid = Grid::new(config.width, config.height);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        if let Some(cells) = grid.cells_mut().as_slice_mut() {
            if dense {
                cells.fill(Cell::new(true));
            }

            let total = cells.len();
            let mut changed: CellCount = 0;
            while changed < pending {
                let cell = &mut cells[rng.random_range(0..total)];
                // repeated picks of an already flipped cell are no-ops
                if cell.is_bomb() != target {
                    cell.set_bomb(target);
                    changed += 1;
                }
            }
        }

        // double check bomb count
        let count = grid.bomb_count();
        if count != bombs {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                count,
                bombs
            );
        }
        log::debug!(
            "Generated {}x{} board with {} bombs ({})",
            config.width,
            config.height,
            count,
            if dense { "cleared down" } else { "filled up" }
        );
        grid
    }
}
