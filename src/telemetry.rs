//! Telemetry helpers for applications embedding `powscale-rs`.
//!
//! Scale setters log replacements at `debug`, rejections at `warn` and tick
//! work at `trace`. Nothing is installed unless the host asks for it: either
//! call one of the init helpers below or wire a custom `tracing` subscriber.

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_TRACING_FILTER: &str = "powscale_rs=info";

/// Initializes a compact subscriber filtered by `RUST_LOG` or [`DEFAULT_TRACING_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or when the host
/// already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_TRACING_FILTER)
}

/// Like [`init_default_tracing`] with a caller-provided fallback filter.
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
