//! Tracing setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Environment variable holding a tracing filter, e.g. `OPP_EVAL_LOG=opp_eval=trace`.
pub const LOG_ENV: &str = "OPP_EVAL_LOG";

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "opp_eval=debug"
    } else {
        "opp_eval=warn"
    }
}

/// Initialize logging to stderr.
///
/// `OPP_EVAL_LOG` overrides the level chosen by `--verbose`. Output goes
/// through the stderr buffer so nothing is printed over the TUI.
/// Calling this more than once is a no-op.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(crate::stderr_buffer::writer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "opp_eval=debug");
        assert_eq!(default_directive(false), "opp_eval=warn");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("logging initialized twice without panicking");
    }
}
