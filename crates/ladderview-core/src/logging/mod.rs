use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// Events go to stderr as JSON so stdout stays free for panel output.
/// `RUST_LOG` directives are honored on top of [`filter_directive`].
pub fn init_logging(quiet: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env().add_directive(
                filter_directive(quiet)
                    .parse()
                    .expect("Invalid log directive"),
            ),
        )
        .init();
}

/// Level for both crates: `ladderview` also matches `ladderview_core` targets.
/// Quiet mode keeps only errors.
pub fn filter_directive(quiet: bool) -> &'static str {
    if quiet {
        "ladderview=error"
    } else {
        "ladderview=info"
    }
}
