//! Opt-in `tracing` subscriber setup for hosts and test binaries.
//!
//! Solver iterations are logged at `trace`, layout passes at `debug` and
//! discarded input at `warn`. `RUST_LOG` overrides the directive passed in.

/// Directive used by [`init_default_tracing`].
pub const DEFAULT_DIRECTIVE: &str = "chart_axes=info";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, or by
/// `directive` when the variable is unset.
///
/// Returns `false` when the `telemetry` feature is off or a global
/// subscriber is already installed.
#[must_use]
pub fn init_tracing(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}

#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVE)
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn second_initialization_is_refused() {
        let first = init_tracing("chart_axes=trace");
        assert!(!init_tracing("chart_axes=trace"));
        if cfg!(not(feature = "telemetry")) {
            assert!(!first);
        }
    }
}
