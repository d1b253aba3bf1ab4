//! steelpan - play the voice engine from the terminal keyboard
//!
//! Run with: cargo run --release
//! Set STEELPAN_LOG=<file> (and RUST_LOG) to capture engine diagnostics.

mod ui;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use steelpan::{io::CpalDriver, Engine, EngineConfig};
use tracing_subscriber::EnvFilter;

use ui::UiApp;

/// Oscilloscope tap size in samples
const SCOPE_CAPACITY: usize = 8192;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_tracing()?;

    let config = EngineConfig::default().with_scope(SCOPE_CAPACITY);
    let mut engine = Engine::new(CpalDriver::new(), config);
    let info = engine
        .start()
        .wrap_err("failed to open the audio output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(engine, info).run(&mut terminal);
    ratatui::restore();
    result
}

/// The TUI owns stdout/stderr, so diagnostics only go to a file when asked.
fn init_tracing() -> EyreResult<()> {
    let Some(path) = std::env::var_os("STEELPAN_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.to_string_lossy()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("steelpan=debug")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
