//! Route `tracing` output to the browser console

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

/// Install the console subscriber.
///
/// Calling it again is harmless; the first subscriber stays in place.
pub fn init_logging(level: Level) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let installed = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        debug!(%level, "Console logging enabled");
    }
}
