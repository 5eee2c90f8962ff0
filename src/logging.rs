//! Tracing setup for the visualizer binaries.

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Lets the filter be replaced once configuration has been read.
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Swap in `filter`. Ignored when `RUST_LOG` chose the filter or `filter` does not parse.
    pub fn set_filter(&self, filter: &str) {
        if self.from_env {
            return;
        }
        match EnvFilter::try_new(filter) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::warn!(error = %e, "failed to apply log filter");
                }
            }
            Err(e) => tracing::warn!(filter, error = %e, "invalid log filter"),
        }
    }
}

/// Install a human-readable subscriber on stderr.
///
/// `RUST_LOG` wins over `default_filter` when set. Returns `None` if a
/// subscriber was already installed.
pub fn init_logging(default_filter: &str) -> Option<LogHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (
            EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info")),
            false,
        ),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok()?;

    Some(LogHandle { handle, from_env })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        // Another test may already own the global subscriber, so only the second call is certain
        let _ = init_logging("debug");
        assert!(init_logging("debug").is_none());
    }
}
