use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use boomgrid::config::{self, GRID_SIZE};
use boomgrid::engine::{Board, RevealResult};
use boomgrid::tui;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "boomgrid", about = "10x10 mouse-driven terminal Minesweeper", version)]
struct Args {
    /// Line-based mode without the full-screen UI
    #[arg(long)]
    plain: bool,
    /// Seed (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(args: &Args) -> Result<()> {
    // The terminal belongs to the game, so logs only go to a file.
    let Some(path) = &args.log_file else { return Ok(()) };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  r x y   - reveal cell at column x, row y (1-based)");
    println!("  f x y   - toggle flag at x, y (1-based)");
    println!("  q       - quit");
    println!("  h/help  - show this help");
}

fn parse_xy(parts: &[&str]) -> Option<(usize, usize)> {
    if parts.len() < 3 { println!("Usage: {} x y", parts[0]); return None; }
    let x = match parts[1].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid x"); return None; } };
    let y = match parts[2].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid y"); return None; } };
    if x == 0 || y == 0 { println!("Use 1-based coordinates"); return None; }
    Some((x - 1, y - 1))
}

fn run_plain(mut board: Board) -> Result<()> {
    println!("Minesweeper {0}x{0}. Coordinates are 1-based. Type 'h' for help.", GRID_SIZE);
    print_help();

    let mut input = String::new();
    loop {
        println!("\n{}", board);
        if board.is_exploded() {
            board.clear_flags_on_mines();
            println!("Boom! You hit a mine. Game over.\n");
            println!("Final board:\n{}", board);
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input).context("reading command")? == 0 { break; }
        let line = input.trim();
        if line.is_empty() { continue; }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0].to_lowercase().as_str() {
            "q" | "quit" | "exit" => break,
            "h" | "help" => print_help(),
            "r" | "reveal" => {
                let Some((x, y)) = parse_xy(&parts) else { continue };
                match board.reveal(x, y) {
                    Ok(RevealResult::NoOp) => println!("Already revealed"),
                    Ok(_) => {}
                    Err(e) => println!("{e}"),
                }
            }
            "f" | "flag" => {
                let Some((x, y)) = parse_xy(&parts) else { continue };
                match board.toggle_flag(x, y) {
                    Ok(false) => println!("Cannot flag a revealed cell"),
                    Ok(true) => {}
                    Err(e) => println!("{e}"),
                }
            }
            other => println!("Unknown command '{}'. Type 'h' for help.", other),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut rng = if args.seed == 0 { StdRng::from_os_rng() } else { StdRng::seed_from_u64(args.seed) };
    let board = Board::random(GRID_SIZE, GRID_SIZE, config::mine_probability(), &mut rng)?;
    info!(seed = args.seed, plain = args.plain, "session started");

    if args.plain { run_plain(board) } else { tui::run_tui(board) }
}
