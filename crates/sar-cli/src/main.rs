//! sar-plan - plan coverage flights for a drone search area.

use anyhow::Result;
use clap::Parser;
use sar_cli::{run, Cli, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env();

    // Initialize tracing; stdout is reserved for the JSON report
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env()
            .add_directive("sar_core=info".parse()?)
            .add_directive("sar_cli=info".parse()?),
    };
    let (text_layer, json_layer) = if config.log_json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    let output = run(&cli, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
