use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing (first reveal)
/// - Playing -> Won (including right after the first reveal when no bomb is left unflagged)
/// - Playing -> Lost
/// - any -> NotStarted (restart)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// What a move did to the session. Flag toggles never lose.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Lost,
    Won(u64),
}

impl Outcome {
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Score for a win: `floor(width * height * bombs / (elapsed + 1)) + 1`.
pub fn score(width: Coord, height: Coord, bombs: CellCount, elapsed_secs: u32) -> u64 {
    let weight = u64::from(area(width, height)) * u64::from(bombs);
    weight / (u64::from(elapsed_secs) + 1) + 1
}

/// A game from first reveal to win or loss, restartable with the same configuration.
///
/// `progress` counts unflagged bombs plus flagged safe cells, the game is won exactly when
/// it reaches zero.
#[derive(Debug)]
pub struct GameSession<C: Clock = Stopwatch> {
    config: GameConfig,
    grid: Grid,
    seeds: SmallRng,
    bomb_count: CellCount,
    remaining_flags: i32,
    progress: i32,
    state: GameState,
    score: Option<u64>,
    clock: C,
}

impl GameSession<Stopwatch> {
    /// Generates a fresh board of `width` x `height`, `bombs` clamped to the cell count.
    pub fn start(width: Coord, height: Coord, bombs: i32) -> Self {
        Self::new(GameConfig::new(width, height, bombs))
    }

    pub fn new(config: GameConfig) -> Self {
        Self::with_clock(config, Stopwatch::default())
    }
}

impl<C: Clock> GameSession<C> {
    pub fn with_clock(config: GameConfig, clock: C) -> Self {
        Self::with_seed(config, clock, rand::random())
    }

    /// Same seed, same sequence of boards across restarts.
    pub fn with_seed(config: GameConfig, clock: C, seed: u64) -> Self {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let grid = RandomBoardGenerator::new(seeds.random()).generate(config);
        Self::from_parts(config, grid, seeds, clock)
    }

    /// Plays on a prebuilt layout, restarts generate random boards of the same shape and
    /// bomb count.
    pub fn from_grid(grid: Grid, clock: C) -> Self {
        let config = GameConfig::new_unchecked(grid.width(), grid.height(), grid.bomb_count());
        Self::from_parts(config, grid, SmallRng::seed_from_u64(rand::random()), clock)
    }

    fn from_parts(config: GameConfig, grid: Grid, seeds: SmallRng, mut clock: C) -> Self {
        clock.reset();
        let bomb_count = grid.bomb_count();
        log::debug!(
            "Session ready on {}x{} board with {} bombs",
            config.width,
            config.height,
            bomb_count
        );
        Self {
            config,
            grid,
            seeds,
            bomb_count,
            remaining_flags: bomb_count.into(),
            progress: bomb_count.into(),
            state: GameState::default(),
            score: None,
            clock,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Bombs on the current board, one less than configured if the first reveal hit one.
    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    /// Flags still expected, negative when more cells are flagged than there are bombs.
    pub fn remaining_flags(&self) -> i32 {
        self.remaining_flags
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    /// Score of a won game, `None` otherwise.
    pub fn score(&self) -> Option<u64> {
        self.score
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(self.grid.view(coords))
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Reveals a concealed cell, or chords an already revealed one.
    ///
    /// The first reveal of a session is always safe: a bomb under it is removed and the
    /// bomb count drops by one.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        let outcome = if self.state.is_ready() {
            self.first_reveal(coords)
        } else if self.grid[coords].is_revealed() {
            self.grid.chord(coords)
        } else {
            self.grid.cascade(coords)
        };

        Ok(match outcome {
            RevealOutcome::HitBomb => {
                self.lose(coords);
                Outcome::Lost
            }
            RevealOutcome::NoChange | RevealOutcome::Revealed => self.check_win(),
        })
    }

    /// Flags or unflags a concealed cell. Flags placed before the first reveal count
    /// towards progress, but the game can only be won once it has started.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        let is_bomb = self.grid[coords].is_bomb();
        let delta = if is_bomb { -1 } else { 1 };
        match self.grid[coords].toggle_flag() {
            FlagToggle::NoChange => return Ok(Outcome::Continue),
            FlagToggle::Flagged => {
                self.remaining_flags -= 1;
                self.progress += delta;
            }
            FlagToggle::Unflagged => {
                self.remaining_flags += 1;
                self.progress -= delta;
            }
        }
        log::trace!(
            "Flag toggled at {:?}, progress: {}, flags left: {}",
            coords,
            self.progress,
            self.remaining_flags
        );

        Ok(self.check_win())
    }

    /// Throws the board away and generates a new one from the original configuration.
    pub fn restart(&mut self) -> &Grid {
        let grid = RandomBoardGenerator::new(self.seeds.random()).generate(self.config);
        self.bomb_count = grid.bomb_count();
        self.remaining_flags = self.bomb_count.into();
        self.progress = self.bomb_count.into();
        self.grid = grid;
        self.state = GameState::NotStarted;
        self.score = None;
        self.clock.reset();
        log::debug!("Session restarted with {} bombs", self.bomb_count);
        &self.grid
    }

    fn first_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if self.grid[coords].is_flagged() {
            return RevealOutcome::NoChange;
        }

        if self.grid[coords].is_bomb() {
            self.grid[coords].set_bomb(false);
            self.bomb_count -= 1;
            self.remaining_flags -= 1;
            self.progress -= 1;
            log::debug!("Moved first-reveal bomb away from {:?}", coords);
        }

        self.state = GameState::Playing;
        self.clock.start();
        log::debug!("Game started at {:?}", coords);
        self.grid.cascade(coords)
    }

    fn check_win(&mut self) -> Outcome {
        if self.progress != 0 || self.state.is_ready() {
            return Outcome::Continue;
        }

        self.clock.stop();
        self.grid.reveal_all();
        let elapsed_secs = self.clock.elapsed_secs();
        let score = score(
            self.config.width,
            self.config.height,
            self.bomb_count,
            elapsed_secs,
        );
        self.score = Some(score);
        self.state = GameState::Won;
        log::debug!("Game won in {}s, score: {}", elapsed_secs, score);
        Outcome::Won(score)
    }

    fn lose(&mut self, coords: Coord2) {
        self.clock.stop();
        self.grid.reveal_all();
        self.state = GameState::Lost;
        log::debug!(
            "Game lost at {:?} after {}s",
            coords,
            self.clock.elapsed_secs()
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
