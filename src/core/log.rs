use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "yearly_growth";

/// Level for this crate's own events. Dependencies stay at `INFO` at most.
fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Installs the global subscriber on stderr so stdout only carries tables.
///
/// `RUST_LOG` takes precedence; without it nothing is printed unless
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
    let targets = Targets::new()
        .with_target(CRATE_TARGET, crate_level(verbose))
        .with_default(LevelFilter::INFO);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            format!("{CRATE_TARGET}=debug,info")
        } else {
            "off".to_string()
        })
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(targets)
        .with(env_filter)
        .init();
}
