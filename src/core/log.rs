use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "macrodash";

/// Level for events emitted by this crate. Warnings (empty or truncated
/// results, missing table) are always shown; `--verbose` adds request detail.
pub fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Fallback `EnvFilter` directive when `RUST_LOG` is unset. Dependencies stay
/// quiet unless `--verbose` is given.
fn default_directive(verbose: bool) -> String {
    let (dependencies, own) = if verbose {
        ("info", "debug")
    } else {
        ("error", "warn")
    };
    format!("{dependencies},{CRATE_TARGET}={own}")
}

/// Installs the global subscriber, writing to stderr so tables on stdout stay clean.
pub fn init_logging(verbose: bool) {
    let app_filter = Targets::new()
        .with_target(CRATE_TARGET, crate_level(verbose))
        .with_default(LevelFilter::TRACE);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let layer = fmt::layer().with_writer(std::io::stderr).without_time();
    let registry = tracing_subscriber::registry()
        .with(app_filter)
        .with(env_filter);
    let installed = if verbose {
        registry.with(layer.pretty()).try_init()
    } else {
        registry.with(layer.compact().with_target(false)).try_init()
    };
    if let Err(e) = installed {
        eprintln!("Logging already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_visible_without_verbose() {
        assert_eq!(crate_level(false), LevelFilter::WARN);
        assert_eq!(crate_level(true), LevelFilter::DEBUG);
    }

    #[test]
    fn test_default_directive_scopes_crate_level() {
        assert_eq!(default_directive(false), "error,macrodash=warn");
        assert_eq!(default_directive(true), "info,macrodash=debug");
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
    }
}
