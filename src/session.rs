use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::Result;
use crate::generator::{self, Maze, SIGHT_RADIUS};
use crate::grid::{Cell, Dir, Grid, Pos, Tile};
use crate::visibility::{self, TORCH_RADIUS};

/// Torches in hand at the start of every game.
pub const STARTING_TORCHES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Won,
    /// Kept for completeness; no rule currently loses the game.
    Lost,
}

/// One game in progress. Replaced wholesale by [`GameSession::initialize`].
#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    player: Pos,
    exit: Pos,
    state: GameState,
    torches: u32,
    torch_lit_at: Option<Instant>,
    started_at: Instant,
    rng: StdRng,
}

impl GameSession {
    /// Generates a first maze with `rng`, which is kept for later
    /// [`initialize`](Self::initialize) calls.
    pub fn new(
        rows: usize,
        cols: usize,
        wall_ratio: f64,
        torch_ratio: f64,
        mut rng: StdRng,
    ) -> Result<Self> {
        let maze = generator::generate(rows, cols, wall_ratio, torch_ratio, &mut rng)?;
        Ok(Self::from_maze(maze, rng))
    }

    /// Starts a game on a prepared layout.
    pub fn from_maze(maze: Maze, rng: StdRng) -> Self {
        info!(
            rows = maze.grid.rows(),
            cols = maze.grid.cols(),
            "new game"
        );
        GameSession {
            grid: maze.grid,
            player: maze.player,
            exit: maze.exit,
            state: GameState::Running,
            torches: STARTING_TORCHES,
            torch_lit_at: None,
            started_at: Instant::now(),
            rng,
        }
    }

    /// Replaces the current game with a freshly generated one. On error the
    /// current game is left as it was.
    pub fn initialize(
        &mut self,
        rows: usize,
        cols: usize,
        wall_ratio: f64,
        torch_ratio: f64,
    ) -> Result<()> {
        let maze = generator::generate(rows, cols, wall_ratio, torch_ratio, &mut self.rng)?;
        let rng = self.rng.clone();
        *self = Self::from_maze(maze, rng);
        Ok(())
    }

    pub fn move_player(&mut self, dir: Dir) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(target) = self.player.step(dir).filter(|p| self.grid.contains(*p)) else {
            debug!(?dir, "move off the grid");
            return false;
        };

        match self.grid.tile_at(target) {
            Tile::Wall => {
                debug!(?dir, ?target, "move into wall");
                return false;
            }
            Tile::Torch => self.torches += 1,
            Tile::Exit => self.state = GameState::Won,
            _ => {}
        }

        self.grid.put(self.player, Tile::Empty);
        if self.state != GameState::Won {
            self.grid.put(target, Tile::Player);
        }
        self.grid.reveal_square(target, SIGHT_RADIUS);
        self.player = target;

        if self.state == GameState::Won {
            info!(seconds = self.elapsed_secs(), "exit reached");
        }
        true
    }

    pub fn use_torch(&mut self) -> bool {
        self.use_torch_at(Instant::now())
    }

    /// Lights a torch as of `now`.
    pub fn use_torch_at(&mut self, now: Instant) -> bool {
        if self.torches == 0 || self.state != GameState::Running {
            return false;
        }
        self.torches -= 1;
        self.grid.reveal_square(self.player, TORCH_RADIUS);
        self.torch_lit_at = Some(now);
        info!(left = self.torches, "torch lit");
        true
    }

    /// Polled once per refresh. Puts the torch out if it has burned long
    /// enough and reports whether that happened on this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.torch_lit_at {
            Some(lit_at) if visibility::is_torch_expired(lit_at, now) => {
                self.torch_lit_at = None;
                debug!("torch went out");
                true
            }
            _ => false,
        }
    }

    pub fn is_torch_expired(&self, now: Instant) -> bool {
        self.torch_lit_at
            .is_some_and(|lit_at| visibility::is_torch_expired(lit_at, now))
    }

    pub fn torch_active(&self) -> bool {
        self.torch_lit_at.is_some()
    }

    pub fn torch_lit_at(&self) -> Option<Instant> {
        self.torch_lit_at
    }

    pub fn is_visible(&self, row: usize, col: usize) -> Result<bool> {
        let cell = self.grid.cell(row, col)?;
        Ok(visibility::is_visible(
            &cell,
            Pos::new(row, col),
            self.player,
            self.torch_active(),
        ))
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Cell> {
        self.grid.cell(row, col)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn torches(&self) -> u32 {
        self.torches
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }
}
