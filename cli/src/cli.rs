use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use data_target_client::{
    constants::{
        DEFAULT_PROGRAM_KEYPAIR_PATH, DEFAULT_PROGRAM_SO_PATH, DEFAULT_SEED,
        SIGNATURE_BUDGET_MULTIPLIER,
    },
    layout::TargetAccount,
    rpc::{RetryConfig, SolanaRpcUrl},
    verifier::ProgramArtifacts,
    WorkflowConfig,
};
use solana_sdk::commitment_config::CommitmentConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// Provisions the seed-derived data account of a deployed data-target
/// program, writes a payload into it and reads it back.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// local, devnet, testnet, mainnet or an http(s) url
    #[arg(long, env = "DATA_TARGET_NETWORK", default_value = "local")]
    pub network: SolanaRpcUrl,

    #[arg(long, env = "DATA_TARGET_COMMITMENT", value_enum, default_value = "confirmed")]
    pub commitment: Commitment,

    /// Fee payer keypair, defaults to ~/.config/solana/id.json
    #[arg(long, env = "DATA_TARGET_PAYER")]
    pub payer: Option<PathBuf>,

    #[arg(long, env = "DATA_TARGET_PROGRAM_KEYPAIR", default_value = DEFAULT_PROGRAM_KEYPAIR_PATH)]
    pub program_keypair: PathBuf,

    #[arg(long, env = "DATA_TARGET_PROGRAM_SO", default_value = DEFAULT_PROGRAM_SO_PATH)]
    pub program_so: PathBuf,

    #[arg(long, env = "DATA_TARGET_SEED", default_value = DEFAULT_SEED)]
    pub seed: String,

    /// Four comma separated u32 values to write
    #[arg(
        long,
        env = "DATA_TARGET_DATA",
        value_delimiter = ',',
        default_value = "1,2,3,4"
    )]
    pub data: Vec<u32>,

    #[arg(long, env = "DATA_TARGET_SIGNATURE_BUDGET", default_value_t = SIGNATURE_BUDGET_MULTIPLIER)]
    pub signature_budget: u64,

    #[arg(long, env = "DATA_TARGET_MAX_RETRIES", default_value = "30")]
    pub max_retries: u32,

    #[arg(long, env = "DATA_TARGET_RETRY_DELAY_MS", default_value = "1000")]
    pub retry_delay_ms: u64,

    #[arg(long, env = "DATA_TARGET_RETRY_TIMEOUT_MS", default_value = "60000")]
    pub retry_timeout_ms: u64,
}

impl Cli {
    pub fn payer_path(&self) -> anyhow::Result<PathBuf> {
        match &self.payer {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
                .join(".config/solana/id.json")),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_millis(self.retry_timeout_ms),
        }
    }

    pub fn workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        let data: [u32; 4] = self.data.as_slice().try_into().map_err(|_| {
            anyhow::anyhow!("--data takes exactly 4 values, got {}", self.data.len())
        })?;
        Ok(WorkflowConfig {
            program: ProgramArtifacts {
                keypair_path: self.program_keypair.clone(),
                so_path: self.program_so.clone(),
            },
            seed: self.seed.clone(),
            payload: TargetAccount::new(data),
            signature_budget_multiplier: self.signature_budget,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["data-target"]).unwrap();
        assert_eq!(cli.network, SolanaRpcUrl::Localnet);
        assert_eq!(cli.data, vec![1, 2, 3, 4]);

        let config = cli.workflow_config().unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(cli.retry_config().max_retries, 30);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "data-target",
            "--network",
            "devnet",
            "--payer",
            "/tmp/payer.json",
            "--seed",
            "other",
            "--data",
            "9,8,7,6",
            "--signature-budget",
            "10",
            "--retry-delay-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.network.to_string(), "https://api.devnet.solana.com");
        assert_eq!(cli.payer_path().unwrap(), PathBuf::from("/tmp/payer.json"));
        assert_eq!(cli.retry_config().retry_delay, Duration::from_millis(250));

        let config = cli.workflow_config().unwrap();
        assert_eq!(config.seed, "other");
        assert_eq!(config.payload.data, [9, 8, 7, 6]);
        assert_eq!(config.signature_budget_multiplier, 10);
    }

    #[test]
    fn test_wrong_data_arity() {
        let cli = Cli::try_parse_from(["data-target", "--data", "1,2,3"]).unwrap();
        assert!(cli.workflow_config().is_err());

        assert!(Cli::try_parse_from(["data-target", "--data", "1,2,x,4"]).is_err());
    }
}
