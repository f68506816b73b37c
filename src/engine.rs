use std::fmt::{self, Write as _};

use rand::distr::Bernoulli;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{GameError, Result};

/// Outcome of a left click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealResult {
    /// Cell was already revealed; nothing changed.
    NoOp,
    /// Number of cells newly revealed, including the cascade.
    RevealedSafe(usize),
    HitMine,
}

/// What the renderer should show for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Hidden,
    Flagged,
    Revealed(u8),
    /// The mine that was clicked.
    Exploded,
    /// Any other mine, only visible once the board has exploded.
    Mine,
}

/// Immutable mine placement for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MineLayout {
    width: usize,
    height: usize,
    mines: Vec<bool>,
}

impl MineLayout {
    /// Places a mine on each cell independently with `probability`.
    /// The total is only expected to be `probability * width * height`.
    pub fn generate<R: Rng>(width: usize, height: usize, probability: f64, rng: &mut R) -> Result<Self> {
        let trial = Bernoulli::new(probability).map_err(|_| GameError::InvalidProbability(probability))?;
        let mines = (0..width * height).map(|_| rng.sample(trial)).collect();
        Ok(Self { width, height, mines })
    }

    pub fn from_positions(width: usize, height: usize, positions: &[(usize, usize)]) -> Result<Self> {
        let mut mines = vec![false; width * height];
        for &(x, y) in positions {
            if x >= width || y >= height { return Err(GameError::OutOfBounds { x, y }); }
            mines[idx(width, x, y)] = true;
        }
        Ok(Self { width, height, mines })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn mine_count(&self) -> usize {
        self.mines.iter().filter(|&&m| m).count()
    }

    pub fn is_mine(&self, x: usize, y: usize) -> Result<bool> {
        self.check(x, y)?;
        Ok(self.mines[idx(self.width, x, y)])
    }

    /// Up to 8 surrounding cells, clipped at the edges.
    pub fn neighbors(&self, x: usize, y: usize) -> Result<Vec<(usize, usize)>> {
        self.check(x, y)?;
        Ok(neighbors(self.width, self.height, x, y).collect())
    }

    pub fn adjacency_count(&self, x: usize, y: usize) -> Result<u8> {
        self.check(x, y)?;
        Ok(self.count_around(x, y))
    }

    fn count_around(&self, x: usize, y: usize) -> u8 {
        neighbors(self.width, self.height, x, y)
            .filter(|&(nx, ny)| self.mines[idx(self.width, nx, ny)])
            .count() as u8
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width && y < self.height { Ok(()) } else { Err(GameError::OutOfBounds { x, y }) }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Cell {
    is_mine: bool,
    adjacent: u8,
    revealed: bool,
    flagged: bool,
}

pub struct Board {
    layout: MineLayout,
    cells: Vec<Cell>,
    revealed_count: usize,
    exploded: Option<(usize, usize)>,
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        let (w, h) = (layout.width, layout.height);
        let mut cells = vec![Cell::default(); w * h];
        for y in 0..h {
            for x in 0..w {
                let c = &mut cells[idx(w, x, y)];
                c.is_mine = layout.mines[idx(w, x, y)];
                c.adjacent = layout.count_around(x, y);
            }
        }
        info!(width = w, height = h, mines = layout.mine_count(), "board created");
        Self { layout, cells, revealed_count: 0, exploded: None }
    }

    /// Randomly mined board, see [`MineLayout::generate`].
    pub fn random<R: Rng>(width: usize, height: usize, probability: f64, rng: &mut R) -> Result<Self> {
        Ok(Self::new(MineLayout::generate(width, height, probability, rng)?))
    }

    /// Left click.
    pub fn reveal(&mut self, x: usize, y: usize) -> Result<RevealResult> {
        self.check(x, y)?;
        if self.exploded.is_some() { return Err(GameError::AlreadyEnded); }
        let i = idx(self.width(), x, y);
        if self.cells[i].revealed { return Ok(RevealResult::NoOp); }

        if self.cells[i].is_mine {
            self.exploded = Some((x, y));
            info!(x, y, "mine triggered");
            return Ok(RevealResult::HitMine);
        }

        let opened = self.flood_reveal(x, y);
        debug!(x, y, opened, "revealed");
        Ok(RevealResult::RevealedSafe(opened))
    }

    // Mined neighbours never enter the work list, so the cascade cannot explode.
    fn flood_reveal(&mut self, x: usize, y: usize) -> usize {
        let (w, h) = (self.width(), self.height());
        let mut opened = 0;
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            let c = &mut self.cells[idx(w, cx, cy)];
            if c.revealed { continue; }
            c.flagged = false;
            c.revealed = true;
            opened += 1;
            if c.adjacent == 0 {
                for (nx, ny) in neighbors(w, h, cx, cy) {
                    let n = &self.cells[idx(w, nx, ny)];
                    if !n.revealed && !n.is_mine {
                        stack.push((nx, ny));
                    }
                }
            }
        }
        self.revealed_count += opened;
        opened
    }

    /// Right click. Returns `false` when the cell is already revealed.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> Result<bool> {
        self.check(x, y)?;
        if self.exploded.is_some() { return Err(GameError::AlreadyEnded); }
        let w = self.width();
        let c = &mut self.cells[idx(w, x, y)];
        if c.revealed { return Ok(false); }
        c.flagged = !c.flagged;
        debug!(x, y, flagged = c.flagged, "flag toggled");
        Ok(true)
    }

    /// Cleanup done when drawing a lost board: flags on mines other than the
    /// exploded one are dropped so those mines show through.
    pub fn clear_flags_on_mines(&mut self) {
        let Some(hit) = self.exploded else { return };
        let w = self.width();
        for y in 0..self.height() {
            for x in 0..w {
                let c = &mut self.cells[idx(w, x, y)];
                if c.is_mine && (x, y) != hit {
                    c.flagged = false;
                }
            }
        }
    }

    pub fn tile(&self, x: usize, y: usize) -> Result<Tile> {
        let c = self.cell(x, y)?;
        Ok(match self.exploded {
            Some(hit) if hit == (x, y) => Tile::Exploded,
            Some(_) if c.is_mine && !c.flagged => Tile::Mine,
            _ if c.revealed => Tile::Revealed(c.adjacent),
            _ if c.flagged => Tile::Flagged,
            _ => Tile::Hidden,
        })
    }

    pub fn render(&self) -> String {
        let mut s = String::new();
        s.push_str("    ");
        for x in 0..self.width() {
            let _ = write!(s, "{:>2} ", x + 1);
        }
        s.push('\n');
        s.push_str("   ");
        s.push_str(&"-".repeat(self.width() * 3 + 1));
        s.push('\n');

        for y in 0..self.height() {
            let _ = write!(s, "{:>2} | ", y + 1);
            for x in 0..self.width() {
                let ch = match self.tile(x, y) {
                    Ok(Tile::Hidden) => '.',
                    Ok(Tile::Flagged) => 'F',
                    Ok(Tile::Revealed(0)) => ' ',
                    Ok(Tile::Revealed(n)) => char::from_digit(n as u32, 10).unwrap_or('?'),
                    Ok(Tile::Exploded) => 'X',
                    Ok(Tile::Mine) => '*',
                    Err(_) => '?',
                };
                let _ = write!(s, "{}  ", ch);
            }
            s.push('\n');
        }
        s
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        self.layout.check(x, y)
    }
}

fn idx(w: usize, x: usize, y: usize) -> usize { y * w + x }

fn neighbors(w: usize, h: usize, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    let x = x as isize; let y = y as isize; let w = w as isize; let h = h as isize;
    let mut out = Vec::with_capacity(8);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 { continue; }
            let nx = x + dx; let ny = y + dy;
            if nx >= 0 && ny >= 0 && nx < w && ny < h {
                out.push((nx as usize, ny as usize));
            }
        }
    }
    out.into_iter()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Board {
    pub fn width(&self) -> usize { self.layout.width }
    pub fn height(&self) -> usize { self.layout.height }
    pub fn layout(&self) -> &MineLayout { &self.layout }
    pub fn is_exploded(&self) -> bool { self.exploded.is_some() }
    pub fn exploded(&self) -> Option<(usize, usize)> { self.exploded }
    pub fn revealed_count(&self) -> usize { self.revealed_count }
    pub fn flagged_count(&self) -> usize { self.cells.iter().filter(|c| c.flagged).count() }
    pub fn is_revealed(&self, x: usize, y: usize) -> Result<bool> { Ok(self.cell(x, y)?.revealed) }
    pub fn is_flagged(&self, x: usize, y: usize) -> Result<bool> { Ok(self.cell(x, y)?.flagged) }
    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell> {
        self.check(x, y)?;
        Ok(&self.cells[idx(self.width(), x, y)])
    }
}

impl Cell {
    pub fn is_mine(&self) -> bool { self.is_mine }
    pub fn adjacent(&self) -> u8 { self.adjacent }
    pub fn revealed(&self) -> bool { self.revealed }
    pub fn flagged(&self) -> bool { self.flagged }
}
