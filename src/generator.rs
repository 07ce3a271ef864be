use rand::Rng;
use tracing::debug;

use crate::error::{MazeError, Result, Stage};
use crate::grid::{Grid, Pos, Tile};

/// The exit is placed strictly further than this from the player.
pub const MIN_EXIT_DISTANCE: usize = 3;
/// Radius revealed around the player after each step.
pub const SIGHT_RADIUS: usize = 1;

/// A freshly generated layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    pub grid: Grid,
    pub player: Pos,
    pub exit: Pos,
}

/// Builds a maze of `rows` x `cols` cells.
///
/// Walls get `floor(rows * cols * wall_ratio)` placement attempts and a
/// collision simply wastes the attempt, so the final wall count may fall
/// short. Torches, on the other hand, are retried until exactly
/// `floor(rows * cols * torch_ratio)` of them are down.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    wall_ratio: f64,
    torch_ratio: f64,
    rng: &mut R,
) -> Result<Maze> {
    check_ratio("wall", wall_ratio)?;
    check_ratio("torch", torch_ratio)?;
    let mut grid = Grid::new(rows, cols)?;
    let total = rows * cols;

    let wall_attempts = (total as f64 * wall_ratio).floor() as usize;
    for _ in 0..wall_attempts {
        let pos = random_cell(&grid, rng);
        if grid.tile_at(pos) == Tile::Empty {
            grid.put(pos, Tile::Wall);
        }
    }

    let player = place(&mut grid, rng, Tile::Player, Stage::Player, |_| true)?;
    grid.reveal_square(player, 0);

    let exit = place(&mut grid, rng, Tile::Exit, Stage::Exit, |pos| {
        pos.manhattan(player) > MIN_EXIT_DISTANCE
    })?;

    let torches = (total as f64 * torch_ratio).floor() as usize;
    let free = grid.count(Tile::Empty);
    if free < torches {
        debug!(free, torches, "not enough room for torches");
        return Err(MazeError::GenerationDeadlock {
            stage: Stage::Torches,
        });
    }
    let mut placed = 0;
    while placed < torches {
        let pos = random_cell(&grid, rng);
        if grid.tile_at(pos) == Tile::Empty {
            grid.put(pos, Tile::Torch);
            placed += 1;
        }
    }

    grid.reveal_square(player, SIGHT_RADIUS);

    debug!(
        rows,
        cols,
        walls = grid.count(Tile::Wall),
        wall_attempts,
        torches,
        ?player,
        ?exit,
        "maze generated"
    );
    Ok(Maze { grid, player, exit })
}

fn check_ratio(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MazeError::InvalidRatio { name, value })
    }
}

fn random_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Pos {
    Pos::new(rng.gen_range(0..grid.rows()), rng.gen_range(0..grid.cols()))
}

/// Rejection-samples an empty cell satisfying `accept` and sets it to
/// `tile`. A full scan first makes sure such a cell exists, so the sampling
/// loop always terminates.
fn place<R, F>(grid: &mut Grid, rng: &mut R, tile: Tile, stage: Stage, accept: F) -> Result<Pos>
where
    R: Rng + ?Sized,
    F: Fn(Pos) -> bool,
{
    let eligible = |grid: &Grid, pos: Pos| grid.tile_at(pos) == Tile::Empty && accept(pos);
    if !grid.positions().any(|pos| eligible(&*grid, pos)) {
        debug!(%stage, "no eligible cell");
        return Err(MazeError::GenerationDeadlock { stage });
    }
    loop {
        let pos = random_cell(grid, rng);
        if eligible(&*grid, pos) {
            grid.put(pos, tile);
            return Ok(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn open_five_by_five_has_player_and_distant_exit() {
        let maze = generate(5, 5, 0.0, 0.0, &mut rng(7)).unwrap();
        assert_eq!(maze.grid.count(Tile::Player), 1);
        assert_eq!(maze.grid.count(Tile::Exit), 1);
        assert_eq!(maze.grid.count(Tile::Empty), 23);
        assert!(maze.player.manhattan(maze.exit) > MIN_EXIT_DISTANCE);
        assert_eq!(maze.grid.tile_at(maze.player), Tile::Player);
        assert_eq!(maze.grid.tile_at(maze.exit), Tile::Exit);
    }

    #[test]
    fn player_neighbourhood_starts_revealed() {
        let maze = generate(8, 8, 0.2, 0.1, &mut rng(3)).unwrap();
        for pos in maze.grid.positions() {
            let near = pos.row.abs_diff(maze.player.row) <= 1
                && pos.col.abs_diff(maze.player.col) <= 1;
            assert_eq!(maze.grid.cell(pos.row, pos.col).unwrap().revealed, near);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate(12, 9, 0.3, 0.1, &mut rng(42)).unwrap();
        let b = generate(12, 9, 0.3, 0.1, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn saturated_walls_terminate_deterministically() {
        for seed in 0..32 {
            let first = generate(5, 5, 1.0, 0.0, &mut rng(seed));
            let second = generate(5, 5, 1.0, 0.0, &mut rng(seed));
            assert_eq!(first, second);
            match first {
                Ok(maze) => assert!(maze.player.manhattan(maze.exit) > MIN_EXIT_DISTANCE),
                Err(MazeError::GenerationDeadlock { .. }) => {}
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn grid_too_small_for_exit_deadlocks() {
        assert_eq!(
            generate(2, 2, 0.0, 0.0, &mut rng(1)),
            Err(MazeError::GenerationDeadlock { stage: Stage::Exit })
        );
    }

    #[test]
    fn too_many_torches_deadlock() {
        assert_eq!(
            generate(5, 5, 0.0, 1.0, &mut rng(1)),
            Err(MazeError::GenerationDeadlock {
                stage: Stage::Torches
            })
        );
    }

    #[rstest]
    #[case(-0.1, 0.0, "wall")]
    #[case(1.5, 0.0, "wall")]
    #[case(0.0, f64::NAN, "torch")]
    #[case(0.2, 2.0, "torch")]
    fn ratios_outside_unit_interval_are_rejected(
        #[case] wall: f64,
        #[case] torch: f64,
        #[case] name: &str,
    ) {
        match generate(6, 6, wall, torch, &mut rng(0)) {
            Err(MazeError::InvalidRatio { name: got, .. }) => assert_eq!(got, name),
            other => panic!("expected InvalidRatio, got {other:?}"),
        }
    }

    #[test]
    fn zero_rows_are_rejected() {
        assert_eq!(
            generate(0, 6, 0.1, 0.1, &mut rng(0)),
            Err(MazeError::InvalidDimensions { rows: 0, cols: 6 })
        );
    }

    proptest! {
        #[test]
        fn generated_mazes_hold_their_invariants(
            rows in 5usize..=20,
            cols in 5usize..=20,
            wall_ratio in 0.0f64..=0.6,
            torch_ratio in 0.0f64..=0.3,
            seed in any::<u64>(),
        ) {
            let maze = generate(rows, cols, wall_ratio, torch_ratio, &mut rng(seed));
            // 0.6 walls + 0.3 torches can crowd out the exit on small grids.
            prop_assume!(maze.is_ok());
            let maze = maze.unwrap();
            let total = (rows * cols) as f64;

            prop_assert_eq!(maze.grid.count(Tile::Player), 1);
            prop_assert_eq!(maze.grid.count(Tile::Exit), 1);
            prop_assert!(maze.player.manhattan(maze.exit) > MIN_EXIT_DISTANCE);
            prop_assert!(maze.grid.count(Tile::Wall) <= (total * wall_ratio).floor() as usize);
            prop_assert_eq!(maze.grid.count(Tile::Torch), (total * torch_ratio).floor() as usize);
        }
    }
}
