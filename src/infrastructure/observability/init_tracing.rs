use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use super::TracingConfig;

pub const DEFAULT_FILTER: &str = "info,bill_extractor=debug,tower_http=debug";

/// Directive string the subscriber filters with: `RUST_LOG` first, then the
/// configured filter, then `DEFAULT_FILTER`.
pub fn filter_directives(config: &TracingConfig, rust_log: Option<&str>) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .or(config.filter.as_deref())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

fn fmt_layer(json_format: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json_format {
        layer.json().with_current_span(true).boxed()
    } else {
        layer.boxed()
    }
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init_tracing(config: TracingConfig, port: u16) -> Result<(), TryInitError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(&config, rust_log.as_deref());
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("invalid log filter {directives:?} ({e}), using {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    tracing_subscriber::registry()
        .with(fmt_layer(config.json_format))
        .with(env_filter)
        .try_init()?;

    tracing::info!(
        port,
        environment = %config.environment,
        json_format = config.json_format,
        filter = %directives,
        version = env!("CARGO_PKG_VERSION"),
        "Bill extraction service initialized"
    );
    Ok(())
}
