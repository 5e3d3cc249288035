//! Logging setup shared by the CLI and the desktop editor.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// `verbose` wins when both are set.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber once. `RUST_LOG` takes precedence.
pub fn init_logging(verbosity: Verbosity) {
    let level = verbosity.level();
    let default_filter = format!(
        "record_confirm={level},record_confirm_common={level},record_confirm_desktop={level}"
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr),
    );

    // already installed
    let _ = subscriber.try_init();
}
