//! Interactive pair game in the terminal.
//!
//! Run with: cargo run --example terminal_game
//!
//! Arrows move, Enter or Space turns a face, Home/End jump, `r` restarts a
//! finished game, `q` quits.

use std::io;

use crossterm::{cursor, execute, terminal};
use matchgrid::{CellRenderer, Game, GamePrefs, GameRuntime, Labels, PairDescriptor, Result};
use serde_json::json;

fn main() -> Result<()> {
    let descriptors: Vec<PairDescriptor> = serde_json::from_value(json!([
        { "face": "sun", "match": "soleil" },
        { "face": "moon", "match": "lune" },
        { "face": "star", "match": "etoile" },
        { "face": "rain", "match": "pluie", "feedback": "Every pair found so far!" },
        { "face": "wind", "match": "vent" },
        { "face": "snow", "match": "neige" },
    ]))
    .expect("descriptors");

    let game = Game::configured(&descriptors, GamePrefs::default(), Labels::default());
    let (cols, _rows) = terminal::size()?;
    let mut runtime = GameRuntime::new(game, CellRenderer::with_default(), cols);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide
    )?;

    let outcome = runtime.run(&mut stdout);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    outcome
}
