//! Logger setup for the simulation binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialises `env_logger` for the `skitter` crate.
///
/// `verbose` raises the default level from info to debug, which includes
/// every state transition. `RUST_LOG` still overrides both. Engine crates
/// are held at warn unless `RUST_LOG` says otherwise.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(format!("{level},bevy=warn,wgpu=warn"));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("logger already installed; keeping it");
    }
}
