use std::io;
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::config::EXPLOSION_PAUSE;
use crate::engine::{Board, Tile};
use crate::input::{Command, TileMetrics, Translator};

const EXPLOSION_FRAMES: u32 = 6;

/// Glyphs and styles, built once and handed to every draw.
pub struct Assets {
    pub hidden: (char, Style),
    pub flag: (char, Style),
    pub mine: (char, Style),
    pub explosion: [(char, Style); 2],
    numbers: [Style; 9],
}

impl Assets {
    pub fn load() -> Self {
        let revealed = Style::default().bg(Color::White);
        let numbers = [
            revealed,
            revealed.fg(Color::Blue),
            revealed.fg(Color::Green),
            revealed.fg(Color::Red),
            revealed.fg(Color::Magenta),
            revealed.fg(Color::Yellow),
            revealed.fg(Color::Cyan),
            revealed.fg(Color::Black),
            revealed.fg(Color::DarkGray),
        ];
        Self {
            hidden: (' ', Style::default().bg(Color::Gray)),
            flag: ('F', Style::default().bg(Color::Gray).fg(Color::Red).add_modifier(Modifier::BOLD)),
            mine: ('*', Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD)),
            explosion: [
                ('#', Style::default().bg(Color::Red).fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ('*', Style::default().bg(Color::Yellow).fg(Color::Red).add_modifier(Modifier::BOLD)),
            ],
            numbers,
        }
    }

    /// `frame` selects the explosion animation step.
    pub fn glyph(&self, tile: Tile, frame: usize) -> (char, Style) {
        match tile {
            Tile::Hidden => self.hidden,
            Tile::Flagged => self.flag,
            Tile::Mine => self.mine,
            Tile::Exploded => self.explosion[frame % self.explosion.len()],
            Tile::Revealed(0) => (' ', self.numbers[0]),
            Tile::Revealed(n) => {
                let n = n.min(8);
                (char::from_digit(n as u32, 10).unwrap_or('?'), self.numbers[n as usize])
            }
        }
    }
}

pub fn run_tui(mut board: Board) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let _guard = TermGuard;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let assets = Assets::load();

    let mut metrics = TileMetrics::default();
    let mut translator = Translator::new();
    loop {
        terminal.draw(|f| { metrics = draw(f, &board, &assets, 0); })?;

        let ev = event::read().context("reading terminal event")?;
        let Some(cmd) = translator.translate(&ev, &metrics) else { continue };
        debug!(?cmd, "command");
        let outcome = match cmd {
            Command::Quit => {
                info!("quit requested");
                break;
            }
            Command::Reveal(x, y) => board.reveal(x, y).map(|_| ()),
            Command::ToggleFlag(x, y) => board.toggle_flag(x, y).map(|_| ()),
        };
        if let Err(e) = outcome {
            warn!(?cmd, "{e}");
        }

        if board.is_exploded() {
            board.clear_flags_on_mines();
            let step = EXPLOSION_PAUSE / EXPLOSION_FRAMES;
            for frame in 0..EXPLOSION_FRAMES as usize {
                terminal.draw(|f| { draw(f, &board, &assets, frame); })?;
                thread::sleep(step);
            }
            break;
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

/// Draws one frame and returns where the tiles ended up, for click mapping.
pub fn draw(f: &mut ratatui::Frame, board: &Board, assets: &Assets, frame: usize) -> TileMetrics {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let status = if board.is_exploded() {
        "Boom!"
    } else {
        "Left click: reveal • Right click: flag • q: quit"
    };
    let header = Paragraph::new(status)
        .style(Style::default().fg(if board.is_exploded() { Color::Red } else { Color::Cyan }))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Minesweeper"));
    f.render_widget(header, root[0]);

    // Tiles are fitted inside the border space, then the border hugs the grid.
    let inner = Block::default().borders(Borders::ALL).inner(root[1]);
    let metrics = TileMetrics::fit(inner, board.width(), board.height());
    let grid = metrics.grid_area().intersection(inner);
    let frame_rect = Rect {
        x: grid.x.saturating_sub(1),
        y: grid.y.saturating_sub(1),
        width: grid.width.saturating_add(2),
        height: grid.height.saturating_add(2),
    }
    .intersection(root[1]);
    f.render_widget(Block::default().borders(Borders::ALL), frame_rect);
    for y in 0..board.height() {
        for x in 0..board.width() {
            let Ok(tile) = board.tile(x, y) else { continue };
            let (ch, style) = assets.glyph(tile, frame);
            let rect = metrics.tile_rect(x, y).intersection(grid);
            if rect.area() == 0 { continue; }
            let mut lines = vec![Line::from(""); (rect.height as usize).saturating_sub(1) / 2];
            lines.push(Line::from(ch.to_string()));
            // Alternate shading so neighbouring tiles stay distinguishable.
            let style = if (x + y) % 2 == 0 { style } else { style.add_modifier(Modifier::DIM) };
            f.render_widget(Paragraph::new(lines).style(style).alignment(Alignment::Center), rect);
        }
    }

    let footer = Paragraph::new(format!(
        "Size: {}x{}  Flags: {}  Revealed: {}",
        board.width(),
        board.height(),
        board.flagged_count(),
        board.revealed_count()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);
    metrics
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
