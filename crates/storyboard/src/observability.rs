//! Log and span setup for the storyboard binary.
//!
//! Log lines go to stderr so storyboard JSON on stdout stays machine-readable.
//! With the `observability` feature, spans are also exported through
//! OpenTelemetry to stdout; pair that with `--output`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Shape of log lines on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    #[display("text")]
    Text,
    /// One JSON object per line
    #[display("json")]
    Json,
}

/// Where and how much the binary logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Name attached to exported spans
    pub service: String,
    /// Fallback filter when `RUST_LOG` is unset, e.g. "info" or "storyboard_pipeline=debug"
    pub filter: String,
    /// Line format
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LogSettings {
    /// Settings for the CLI's `--verbose` and `--json-logs` flags.
    pub fn for_cli(verbose: bool, json: bool) -> Self {
        Self {
            filter: if verbose { "debug" } else { "info" }.to_string(),
            format: if json { LogFormat::Json } else { LogFormat::Text },
            ..Default::default()
        }
    }

    /// `RUST_LOG` wins over the configured filter.
    pub fn env_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error>> {
        Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.filter))?)
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails on an unparsable filter or when a global subscriber is already set.
pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    let lines = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let lines = match settings.format {
        LogFormat::Json => lines.json().boxed(),
        LogFormat::Text => lines.boxed(),
    };

    let registry = tracing_subscriber::registry()
        .with(settings.env_filter()?)
        .with(lines);

    #[cfg(feature = "observability")]
    registry.with(span_export(&settings.service)).try_init()?;
    #[cfg(not(feature = "observability"))]
    registry.try_init()?;

    tracing::debug!(format = %settings.format, filter = %settings.filter, "Logging initialized");
    Ok(())
}

#[cfg(feature = "observability")]
fn span_export<S>(
    service: &str,
) -> tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::SdkTracer>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    use opentelemetry::{KeyValue, global, trace::TracerProvider};
    use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};

    let resource = Resource::builder()
        .with_service_name(service.to_string())
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .with_resource(resource)
        .build();
    global::set_tracer_provider(provider.clone());

    tracing_opentelemetry::layer().with_tracer(provider.tracer(service.to_string()))
}
