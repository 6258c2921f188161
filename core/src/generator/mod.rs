use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Grid;
}

/// Generates a grid of `width` x `height` with `bombs` clamped to `[0, width * height]`,
/// seeded from the thread-local RNG.
pub fn generate(width: Coord, height: Coord, bombs: i32) -> Grid {
    RandomBoardGenerator::new(rand::random()).generate(GameConfig::new(width, height, bombs))
}
