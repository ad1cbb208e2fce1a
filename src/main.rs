mod abi;
mod balances;
mod config;
mod error;
mod models;
mod quote;
mod report;
mod rpc;
mod units;

use eyre::WrapErr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    // Logs go to stdout next to the report lines; RUST_LOG overrides the level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Polygon token quotes starting...");

    // Everything local is checked before the first network call
    let cfg = config::load().wrap_err("invalid configuration")?;
    let schema = abi::load_schema(&cfg.abi_path).wrap_err("invalid configuration")?;

    info!("Connecting to {}...", cfg.redacted_rpc_endpoint());
    let ledger = rpc::AlloyLedger::connect(&cfg.rpc_endpoint(), schema, cfg.chain_id)
        .await
        .wrap_err("RPC connection failed, make sure INFURA_PROJECT_ID is set correctly")?;

    let quotes = quote::QuoteClient::new(&cfg)?;
    report::run(&cfg, &ledger, &quotes).await?;

    Ok(())
}
