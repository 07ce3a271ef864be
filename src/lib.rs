//! Fog-of-war maze: a random grid of walls and torches with a hidden exit.
//!
//! [`GameSession`] owns one game and is driven by single commands
//! ([`GameSession::move_player`], [`GameSession::use_torch`]) plus a
//! [`GameSession::tick`] on every refresh that lets a lit torch burn out.
//! Frontends draw from [`Snapshot`]s.

pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod session;
pub mod snapshot;
pub mod visibility;

pub use config::Settings;
pub use error::{MazeError, Result, Stage};
pub use generator::{generate, Maze};
pub use grid::{Cell, Dir, Grid, Pos, Tile};
pub use session::{GameSession, GameState};
pub use snapshot::{CellView, Snapshot};
pub use visibility::{is_torch_expired, is_visible, TORCH_DURATION};
