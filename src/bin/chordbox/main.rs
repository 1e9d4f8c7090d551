//! chordbox - terminal chord controller
//!
//! The computer keyboard stands in for the keypad, the synth plays through the
//! default output device.
//!
//! Run with: cargo run --bin chordbox

mod app;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    app::init_logging()?;
    app::run()
}
