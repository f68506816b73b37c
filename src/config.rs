//! Fixed game constants.

use std::time::Duration;

/// Cells per side.
pub const GRID_SIZE: usize = 10;

/// Target mine count. Only used to derive the per-cell probability, so a
/// session may end up with more or fewer mines.
pub const MINES: usize = 20;

/// Logical window size the tile size is derived from.
pub const WINDOW_SIZE: u16 = 480;

/// How long the explosion stays on screen before the game exits.
pub const EXPLOSION_PAUSE: Duration = Duration::from_millis(1000);

pub fn mine_probability() -> f64 {
    MINES as f64 / (GRID_SIZE * GRID_SIZE) as f64
}

/// Side of one square tile for a window split into `grid` tiles.
pub fn tile_size(window: u16, grid: usize) -> u16 {
    if grid == 0 { return 0; }
    (window as usize / grid) as u16
}
