//! OData gateway binary.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use odata_gateway::{Args, GatewayConfig, ODataService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("odata_gateway=info")))
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        fixture = %config.fixture.display(),
        service_root = %config.service_root,
        shape = ?config.shape,
        "Starting OData gateway"
    );

    let service = ODataService::from_config(config)?;
    let response = service.respond(&args.path, &args.query);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&response.body)?;
    stdout.write_all(b"\n")?;

    if response.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
