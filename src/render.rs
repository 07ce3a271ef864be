use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use fogmaze::{CellView, GameState, Pos, Snapshot, Tile};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Glyph {
    Fog,
    Player,
    Exit,
    Wall,
    Torch,
    Empty,
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Fog => "~",
            Glyph::Player => "P",
            Glyph::Exit => "E",
            Glyph::Wall => "W",
            Glyph::Torch => "T",
            Glyph::Empty => " ",
        }
    }

    fn color(self) -> Color {
        match self {
            Glyph::Fog => Color::DarkGrey,
            Glyph::Player => Color::Blue,
            Glyph::Exit => Color::Green,
            Glyph::Wall => Color::DarkRed,
            Glyph::Torch => Color::DarkYellow,
            Glyph::Empty => Color::Grey,
        }
    }
}

/// The player is drawn from the snapshot's position, since the exit cell
/// keeps its own tile once the player steps on it.
pub fn glyph_for(snapshot: &Snapshot, pos: Pos) -> Glyph {
    if pos == snapshot.player {
        return Glyph::Player;
    }
    match snapshot.at(pos.row, pos.col) {
        Some(CellView::Shown(Tile::Wall)) => Glyph::Wall,
        Some(CellView::Shown(Tile::Exit)) => Glyph::Exit,
        Some(CellView::Shown(Tile::Torch)) => Glyph::Torch,
        Some(CellView::Shown(Tile::Player | Tile::Empty)) => Glyph::Empty,
        Some(CellView::Hidden) | None => Glyph::Fog,
    }
}

/// Status line above the grid. `frozen_secs` overrides the snapshot's clock
/// once the game is over.
pub fn hud_line(status: &str, snapshot: &Snapshot, frozen_secs: Option<u64>) -> String {
    let secs = frozen_secs.unwrap_or(snapshot.elapsed_secs);
    let lit = if snapshot.torch_active { " (lit)" } else { "" };
    format!("{status} | Torches: {}{lit} | {secs}s", snapshot.torches)
}

/// Cuts `text` down to at most `max` display columns.
fn fit_width(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > max {
            return &text[..idx];
        }
    }
    text
}

/// Redraws only cells whose glyph changed since the previous frame.
pub struct Renderer {
    last: Vec<Glyph>,
    last_hud: String,
    rows: usize,
    cols: usize,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            rows: 0,
            cols: 0,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W, snapshot: &Snapshot, hud: &str) -> io::Result<()> {
        if snapshot.rows != self.rows || snapshot.cols != self.cols {
            self.rows = snapshot.rows;
            self.cols = snapshot.cols;
            self.last = vec![Glyph::Fog; self.rows * self.cols];
            self.needs_full = true;
        }

        let needed_h = (self.rows + 2) as u16;
        let needed_w = (self.cols * CELL_W) as u16;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(MoveTo(0, 0))?;
            out.queue(Clear(ClearType::All))?;
            out.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - (self.cols * CELL_W) as u16) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let hud = fit_width(hud, term_w as usize);
        if self.needs_full || hud != self.last_hud {
            let hud_color = match snapshot.state {
                GameState::Won => Color::Green,
                GameState::Lost => Color::Red,
                GameState::Running => Color::White,
            };
            out.queue(MoveTo((term_w - hud.width() as u16) / 2, self.origin_y - 1))?;
            out.queue(SetForegroundColor(hud_color))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud.to_string();
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let glyph = glyph_for(snapshot, Pos::new(row, col));
                let idx = row * self.cols + col;
                if self.needs_full || glyph != self.last[idx] {
                    self.last[idx] = glyph;
                    self.draw_cell(out, row, col, glyph)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    fn draw_cell<W: Write>(&self, out: &mut W, row: usize, col: usize, glyph: Glyph) -> io::Result<()> {
        let text = glyph.text();
        let x = self.origin_x + (col * CELL_W) as u16;
        let y = self.origin_y + row as u16;
        out.queue(MoveTo(x, y))?;
        out.queue(SetForegroundColor(glyph.color()))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_W {
            out.queue(Print(' '))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}
