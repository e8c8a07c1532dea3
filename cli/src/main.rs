mod cli;
mod telemetry;

use clap::Parser;
use data_target_client::{
    keypair::load_keypair,
    rpc::{RpcConnectionConfig, SolanaRpcConnection},
    WorkflowDriver,
};
use solana_sdk::signature::Signer;
use tracing::{debug, info};

use crate::{cli::Cli, telemetry::setup_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_telemetry();
    debug!("{:?}", cli);

    let config = cli.workflow_config()?;
    let payer = load_keypair(&cli.payer_path()?)?;

    let mut rpc = SolanaRpcConnection::new_with_retry(
        RpcConnectionConfig {
            url: cli.network.to_string(),
            commitment_config: Some(cli.commitment.into()),
        },
        Some(cli.retry_config()),
    );

    let report = WorkflowDriver::new(&mut rpc, &payer, config).run().await?;
    info!(
        "Payer {} (balance {} lamports) wrote {:?} to {} in {}",
        payer.pubkey(),
        report.payer_balance,
        report.payload.data,
        report.target,
        report.signature
    );
    Ok(())
}
