use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use tracing::warn;

use crate::config::tile_size;
use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

impl TryFrom<MouseButton> for Button {
    type Error = GameError;

    fn try_from(b: MouseButton) -> Result<Self, Self::Error> {
        match b {
            MouseButton::Left => Ok(Button::Left),
            MouseButton::Right => Ok(Button::Right),
            MouseButton::Middle => Err(GameError::InvalidButton),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(usize, usize),
    ToggleFlag(usize, usize),
    Quit,
}

/// Where the grid sits on screen and how big each tile is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileMetrics {
    pub origin: (u16, u16),
    pub tile_w: u16,
    pub tile_h: u16,
    pub cols: usize,
    pub rows: usize,
}

impl TileMetrics {
    /// Splits `area` into `cols x rows` tiles by integer division, keeping
    /// the grid centred. A tile is always at least 1x1.
    pub fn fit(area: Rect, cols: usize, rows: usize) -> Self {
        let tile_w = tile_size(area.width, cols).max(1);
        let tile_h = tile_size(area.height, rows).max(1);
        let grid_w = tile_w.saturating_mul(cols as u16);
        let grid_h = tile_h.saturating_mul(rows as u16);
        let x = area.x.saturating_add(area.width.saturating_sub(grid_w) / 2);
        let y = area.y.saturating_add(area.height.saturating_sub(grid_h) / 2);
        Self { origin: (x, y), tile_w, tile_h, cols, rows }
    }

    pub fn grid_area(&self) -> Rect {
        Rect {
            x: self.origin.0,
            y: self.origin.1,
            width: self.tile_w.saturating_mul(self.cols as u16),
            height: self.tile_h.saturating_mul(self.rows as u16),
        }
    }

    pub fn tile_rect(&self, x: usize, y: usize) -> Rect {
        Rect {
            x: self.origin.0.saturating_add(self.tile_w.saturating_mul(x as u16)),
            y: self.origin.1.saturating_add(self.tile_h.saturating_mul(y as u16)),
            width: self.tile_w,
            height: self.tile_h,
        }
    }

    /// Pointer position to cell, `None` when it falls outside the grid.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        if self.tile_w == 0 || self.tile_h == 0 { return None; }
        if column < self.origin.0 || row < self.origin.1 { return None; }
        let cx = ((column - self.origin.0) / self.tile_w) as usize;
        let cy = ((row - self.origin.1) / self.tile_h) as usize;
        if cx < self.cols && cy < self.rows { Some((cx, cy)) } else { None }
    }
}

/// Turns terminal events into game commands.
///
/// A click fires on release, but with the button seen on press: without SGR
/// mouse mode crossterm reports every release as `Up(Left)`.
#[derive(Debug, Default)]
pub struct Translator {
    pressed: Option<Button>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &Event, metrics: &TileMetrics) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
                _ => None,
            },
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(btn) => {
                    self.pressed = match Button::try_from(btn) {
                        Ok(b) => Some(b),
                        Err(e) => {
                            warn!(?btn, "{e}");
                            None
                        }
                    };
                    None
                }
                MouseEventKind::Up(_) => {
                    let button = self.pressed.take()?;
                    let (x, y) = metrics.cell_at(m.column, m.row)?;
                    Some(match button {
                        Button::Left => Command::Reveal(x, y),
                        Button::Right => Command::ToggleFlag(x, y),
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }
}
