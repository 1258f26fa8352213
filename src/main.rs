use anyhow::Result;
use clap::Parser;
use aurum::log::init_logging;

/// Jewelry catalog API with live gold-based pricing.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Listen port, overriding the configured one
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = aurum::run(cli.config_path.as_deref(), cli.port).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Server failed");
    }
    result
}
