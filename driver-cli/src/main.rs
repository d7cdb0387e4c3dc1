//! Plan driver entry point.

use anyhow::{Context, Result};
use clap::Parser;
use plan_driver::config::DriverConfig;
use plan_driver::frontend::{run_once, ServiceFrontend};
use plan_driver::observability::init_tracing;
use plan_driver::pipeline::Driver;
use plan_driver::stages::RunMode;
use tokio::net::TcpListener;
use tracing::info;

mod args;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    let config = match DriverConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Driver aborting: {e}");
            std::process::exit(e.exit_code());
        }
    };

    init_tracing(&config.telemetry)?;

    if cli.serve {
        return serve(&config).await;
    }

    let driver = Driver::from_config(&config, RunMode::OneShot);
    let code = run_once(&driver, cli.to_request()).await;
    std::process::exit(code);
}

async fn serve(config: &DriverConfig) -> Result<()> {
    let driver = Driver::from_config(config, RunMode::Service);
    let frontend = ServiceFrontend::new(driver, config.service.max_concurrent_runs);

    let listener = TcpListener::bind(&config.service.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.service.listen_addr))?;
    info!(addr = %config.service.listen_addr, "starting plan-driver service");

    frontend.serve(listener, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
