//! Diagnostics via `tracing`.
//!
//! Logs go to stderr, or to `--log-file` when given. While the viewer owns
//! the terminal, stderr would scribble over the frame, so without a log
//! file nothing is installed at all.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stderr,
    Off,
}

pub fn destination(log_file: Option<&Path>, interactive: bool) -> Destination {
    match log_file {
        Some(path) => Destination::File(path.to_path_buf()),
        None if interactive => Destination::Off,
        None => Destination::Stderr,
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(log_file: Option<&Path>, interactive: bool) -> io::Result<()> {
    let (file_layer, stderr_layer) = match destination(log_file, interactive) {
        Destination::Off => return Ok(()),
        Destination::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            (Some(layer), None)
        }
        Destination::Stderr => {
            let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            (None, Some(layer))
        }
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    Ok(())
}
