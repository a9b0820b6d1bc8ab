//! Tracing subscriber and metrics initialization.

use parley_error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Output format of the log subscriber.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    #[default]
    Compact,
    /// Newline-delimited JSON for log shippers
    Json,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set.
///
/// # Errors
///
/// Fails if the filter does not parse or a global subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ConfigError::new(format!("invalid log filter {default_filter:?}: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };
    installed.map_err(|e| ConfigError::new(format!("failed to install subscriber: {e}")))?;

    tracing::debug!(%format, "Tracing initialized");
    Ok(())
}

/// Install a global OpenTelemetry meter provider exporting to stdout.
///
/// The returned provider should be shut down on exit to flush the last interval.
#[cfg(feature = "metrics")]
pub fn init_metrics(
    service_name: &'static str,
    export_interval: std::time::Duration,
) -> opentelemetry_sdk::metrics::SdkMeterProvider {
    use opentelemetry::{KeyValue, global};
    use opentelemetry_sdk::{
        Resource,
        metrics::{PeriodicReader, SdkMeterProvider},
    };

    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name)])
        .build();
    let reader = PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default())
        .with_interval(export_interval)
        .build();
    let provider = SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build();

    global::set_meter_provider(provider.clone());
    tracing::info!(
        service_name,
        interval_secs = export_interval.as_secs(),
        "Meter provider registered globally"
    );
    provider
}
