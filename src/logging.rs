//! Logger setup.
//!
//! Every step of the run is reported through the `log` facade. Output goes to
//! stdout at `info` unless `RUST_LOG` says otherwise, e.g.
//!
//! ```bash
//! RUST_LOG=debug consultant-poc
//! RUST_LOG=consultant_store::mysql=trace consultant-poc
//! ```

use env_logger::{Builder, Env, Target};
use log::SetLoggerError;

/// Install the global logger. Fails if one is already installed.
pub fn init_logging() -> Result<(), SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_target(false)
        .try_init()
}
