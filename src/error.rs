use thiserror::Error;

/// Errors raised by the maze core.
///
/// Rejected player actions (walking into a wall, lighting a torch with an
/// empty inventory, acting after the game ended) are not errors; those
/// operations return `false` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    #[error("invalid grid dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("no free cell left to place the {stage}")]
    GenerationDeadlock { stage: Stage },

    #[error("{name} ratio must be within [0, 1], got {value}")]
    InvalidRatio { name: &'static str, value: f64 },
}

/// Generation step that could not find room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Player,
    Exit,
    Torches,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Player => write!(f, "player"),
            Stage::Exit => write!(f, "exit"),
            Stage::Torches => write!(f, "torches"),
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
