//! Tracing setup for the `tawfiq` binary.
//!
//! Diagnostics go to stderr; stdout belongs to the console conversation.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global fmt subscriber.
///
/// `level` is an `EnvFilter` directive, usually a bare level such as
/// `"info"` or a per-target form like `"tawfiq=debug"`. With `prefer_level`
/// set (the CLI was given `-v`), `level` wins and `RUST_LOG` only rescues an
/// unparsable directive. Otherwise `RUST_LOG` wins when present.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let from_level = || EnvFilter::try_new(level);

    let filter = if prefer_level {
        from_level().or_else(|level_err| {
            EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!(
                    "bad log directive '{level}' ({level_err}) and no usable RUST_LOG ({env_err})"
                ))
            })
        })?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| from_level())
            .map_err(|e| AppError::Logger(format!("bad log directive '{level}': {e}")))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("subscriber already installed: {e}")))
}
