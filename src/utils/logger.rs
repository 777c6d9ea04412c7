use anyhow::Result;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{error, warn};
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
    fmt::{format, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

// A simple way to log without interrupting fluency
pub trait LogMe<T> {
    fn log_warn<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T>;
    fn log_error<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T>;
}

// Will log a warning in case of error
// WARN {context_msg}: {cause}
impl<T, Error: Into<anyhow::Error> + Display + Send + Sync + 'static> LogMe<T>
    for Result<T, Error>
{
    fn log_warn<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T> {
        match self {
            Err(e) => {
                let ae: anyhow::Error = e.into();
                let ae = ae.context(context_msg);
                warn!("{:#}", ae);
                Err(ae)
            }
            Ok(t) => Ok(t),
        }
    }

    fn log_error<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T> {
        match self {
            Err(e) => {
                let ae: anyhow::Error = e.into();
                let ae = ae.context(context_msg);
                error!("{:#}", ae);
                Err(ae)
            }
            Ok(t) => Ok(t),
        }
    }
}

/// Custom formatter that appends node_name in front of full logs
struct NodeNameFormatter<T> {
    node_name: String,
    base_formatter: T,
}

impl<S, N, T> FormatEvent<S, N> for NodeNameFormatter<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        write!(&mut writer, "{} ", &self.node_name,)?;
        self.base_formatter.format_event(ctx, writer, event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingMode {
    /// Default tracing, for running locally
    Full,
    /// JSON tracing, for running in a container
    Json,
    /// Full tracing + node name, when several hosts share a terminal
    NodeName,
}

impl FromStr for TracingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(TracingMode::Full),
            "json" => Ok(TracingMode::Json),
            "node" => Ok(TracingMode::NodeName),
            other => anyhow::bail!("Unknown log format {other}, expected full, json or node"),
        }
    }
}

/// Setup tracing - stderr subscriber, stdout is left to command output
/// Defaults to INFO, RUST_LOG can override it per target
pub fn setup_tracing(mode: TracingMode, node_name: String) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;

    // Can't use match inline because these are different return types
    match mode {
        TracingMode::Full => register_global_subscriber(
            filter,
            tracing_subscriber::fmt::layer().with_writer(std::io::stderr),
        ),
        TracingMode::Json => register_global_subscriber(
            filter,
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(tracing_subscriber::fmt::format().json()),
        ),
        TracingMode::NodeName => register_global_subscriber(
            filter,
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(NodeNameFormatter {
                    node_name,
                    base_formatter: tracing_subscriber::fmt::format(),
                }),
        ),
    };

    Ok(())
}

fn register_global_subscriber<T, S>(filter: EnvFilter, fmt_layer: T)
where
    S: Subscriber,
    T: tracing_subscriber::Layer<S> + Send + Sync,
    tracing_subscriber::filter::Filtered<T, tracing_subscriber::EnvFilter, S>:
        tracing_subscriber::Layer<tracing_subscriber::Registry>,
{
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
