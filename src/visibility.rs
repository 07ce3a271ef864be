//! Fog of war.
//!
//! A cell is drawn when it has been revealed before, while a torch is
//! burning, or when it touches the player orthogonally. Revealing is
//! permanent; the torch override is not and is switched off by
//! [`GameSession::tick`](crate::GameSession::tick) once
//! [`TORCH_DURATION`] has passed.

use std::time::{Duration, Instant};

use crate::grid::{Cell, Pos};

/// How long a lit torch lights up the whole grid.
pub const TORCH_DURATION: Duration = Duration::from_millis(3000);

/// Radius of the permanent reveal performed when a torch is lit.
pub const TORCH_RADIUS: usize = 2;

pub fn is_visible(cell: &Cell, pos: Pos, player: Pos, torch_active: bool) -> bool {
    cell.revealed || torch_active || pos.manhattan(player) <= 1
}

/// True once strictly more than [`TORCH_DURATION`] has elapsed since
/// `lit_at`. A `now` earlier than `lit_at` counts as no time elapsed.
pub fn is_torch_expired(lit_at: Instant, now: Instant) -> bool {
    now.saturating_duration_since(lit_at) > TORCH_DURATION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use rstest::rstest;

    const HIDDEN: Cell = Cell {
        tile: Tile::Wall,
        revealed: false,
    };
    const SEEN: Cell = Cell {
        tile: Tile::Wall,
        revealed: true,
    };

    #[rstest]
    #[case(Pos::new(2, 2), true)]
    #[case(Pos::new(1, 2), true)]
    #[case(Pos::new(2, 3), true)]
    #[case(Pos::new(1, 1), false)]
    #[case(Pos::new(0, 2), false)]
    #[case(Pos::new(4, 4), false)]
    fn hidden_cells_show_only_next_to_player(#[case] pos: Pos, #[case] expected: bool) {
        assert_eq!(is_visible(&HIDDEN, pos, Pos::new(2, 2), false), expected);
    }

    #[test]
    fn revealed_cells_show_anywhere() {
        assert!(is_visible(&SEEN, Pos::new(0, 0), Pos::new(9, 9), false));
    }

    #[test]
    fn torch_shows_everything() {
        assert!(is_visible(&HIDDEN, Pos::new(0, 0), Pos::new(9, 9), true));
    }

    #[rstest]
    #[case(0, false)]
    #[case(2999, false)]
    #[case(3000, false)]
    #[case(3001, true)]
    #[case(10_000, true)]
    fn torch_expires_after_three_seconds(#[case] millis: u64, #[case] expired: bool) {
        let lit_at = Instant::now();
        let now = lit_at + Duration::from_millis(millis);
        assert_eq!(is_torch_expired(lit_at, now), expired);
    }

    #[test]
    fn clock_going_backwards_does_not_expire() {
        let now = Instant::now();
        let lit_at = now + Duration::from_secs(5);
        assert!(!is_torch_expired(lit_at, now));
    }
}
