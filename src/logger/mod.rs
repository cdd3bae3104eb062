//! Structured logging built on `tracing-subscriber`.
//!
//! Up to two outputs are installed on one registry: a console layer on stdout
//! and an optional file layer. Each renders as `full`, `compact` or `json`.
//! `RUST_LOG`, when set, replaces the configured level filter.

pub mod config;
pub(crate) mod writer;


pub use config::*;

use std::io::IsTerminal;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    build_subscriber(config)?.try_init()?;
    Ok(())
}

/// Assembles the subscriber without installing it.
pub fn build_subscriber(
    config: LoggerConfig,
) -> anyhow::Result<impl Subscriber + Send + Sync + 'static> {
    config.validate()?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.level.to_lowercase())?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    // The file layer goes first so console ANSI settings never bleed into span
    // fields written to the file (tokio-rs/tracing#1817).
    if config.file.enabled {
        let file = writer::open_log_file(&config.file)?;
        layers.push(format_layer(config.file.format, false, Mutex::new(file)));
    }

    if config.console.enabled {
        let ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(format_layer(config.console.format, ansi, std::io::stdout));
    }

    Ok(tracing_subscriber::registry().with(layers).with(filter))
}

fn format_layer<W>(format: LogFormat, ansi: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(writer);

    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
