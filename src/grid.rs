use crate::error::{MazeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    Player,
    Exit,
    Torch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub tile: Tile,
    pub revealed: bool,
}

impl Cell {
    const HIDDEN_EMPTY: Cell = Cell {
        tile: Tile::Empty,
        revealed: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Neighbour one step towards `dir`, or `None` when that would cross row
    /// or column zero. The far edges are checked by [`Grid::contains`].
    pub fn step(self, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Pos { row, col })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// `(row, col)` offset.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Fixed-size matrix of cells, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![vec![Cell::HIDDEN_EMPTY; cols]; rows],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Cell> {
        self.check(row, col)?;
        Ok(self.cells[row][col])
    }

    pub fn set_tile(&mut self, row: usize, col: usize, tile: Tile) -> Result<()> {
        self.check(row, col)?;
        self.cells[row][col].tile = tile;
        Ok(())
    }

    pub fn set_revealed(&mut self, row: usize, col: usize, revealed: bool) -> Result<()> {
        self.check(row, col)?;
        self.cells[row][col].revealed = revealed;
        Ok(())
    }

    /// Tile at a position already known to be inside the grid.
    pub(crate) fn tile_at(&self, pos: Pos) -> Tile {
        self.cells[pos.row][pos.col].tile
    }

    pub(crate) fn put(&mut self, pos: Pos, tile: Tile) {
        self.cells[pos.row][pos.col].tile = tile;
    }

    /// Permanently reveals the square of side `2 * radius + 1` centred on
    /// `center`, clipped to the grid.
    pub fn reveal_around(&mut self, center: Pos, radius: usize) -> Result<()> {
        self.check(center.row, center.col)?;
        self.reveal_square(center, radius);
        Ok(())
    }

    /// [`reveal_around`](Self::reveal_around) for a center already known to
    /// be inside the grid.
    pub(crate) fn reveal_square(&mut self, center: Pos, radius: usize) {
        let r0 = center.row.saturating_sub(radius);
        let c0 = center.col.saturating_sub(radius);
        let r1 = center.row.saturating_add(radius).min(self.rows - 1);
        let c1 = center.col.saturating_add(radius).min(self.cols - 1);
        for row in &mut self.cells[r0..=r1] {
            for cell in &mut row[c0..=c1] {
                cell.revealed = true;
            }
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Pos { row, col }))
    }

    /// Every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Pos { row, col }, *cell))
        })
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.tile == tile)
            .count()
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}
