//! Main entrypoint for the operator binary.

use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

use clap::Parser;
use kiai_operator_bin::cfg::OperatorCli;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = OperatorCli::try_parse()?;
    init_tracing_subscriber(cfg.verbose)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    cfg.start(cancel).await?;

    info!("Exiting operator.");
    Ok(())
}

fn init_tracing_subscriber(verbosity_level: u8) -> anyhow::Result<(), anyhow::Error> {
    // Convert verbosity_level to a LevelFilter
    let level = match verbosity_level {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let mut filter_builder = EnvFilter::builder()
        .with_default_directive(level.into())
        .parse("")?;

    // Only show info logs for these http related crates; their debug logs
    // drown out the operator's own with connection chatter.
    filter_builder = filter_builder
        .add_directive("hyper_util=info".parse()?)
        .add_directive("reqwest=info".parse()?)
        .add_directive("alloy_rpc_client=info".parse()?)
        .add_directive("alloy_transport_http=info".parse()?);

    // Initialize the subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter_builder)
        .init();
    Ok(())
}
