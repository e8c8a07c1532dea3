use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
    time::Duration,
};

use async_trait::async_trait;
use solana_client::{client_error::ClientErrorKind, rpc_client::RpcClient};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, message::Message,
    pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::rpc_connection::{NetworkVersion, RpcConnectionConfig};
use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Testnet,
    Devnet,
    Mainnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Mainnet => "https://api.mainnet-beta.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

impl FromStr for SolanaRpcUrl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "localnet" | "localhost" => Ok(SolanaRpcUrl::Localnet),
            "devnet" => Ok(SolanaRpcUrl::Devnet),
            "testnet" => Ok(SolanaRpcUrl::Testnet),
            "mainnet" | "mainnet-beta" => Ok(SolanaRpcUrl::Mainnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(SolanaRpcUrl::Custom(url.to_string()))
            }
            other => Err(format!(
                "Unknown network `{}`, expected local, devnet, testnet, mainnet or an http(s) url",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Upper bound for one operation including its retries, and for
    /// confirmation polling.
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 30,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub retry_config: RetryConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new_with_retry(config: RpcConnectionConfig, retry_config: Option<RetryConfig>) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        let retry_config = retry_config.unwrap_or_default();
        Self {
            client,
            retry_config,
        }
    }

    async fn retry<F, Fut, T>(&self, operation: F) -> Result<T, RpcError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, RpcError>>,
    {
        let mut attempts = 0;
        let start_time = Instant::now();
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !Self::should_retry(&e) {
                        return Err(e);
                    }
                    attempts += 1;
                    if attempts >= self.retry_config.max_retries
                        || start_time.elapsed() >= self.retry_config.timeout
                    {
                        return Err(e);
                    }
                    warn!(
                        "Operation failed, retrying in {:?} (attempt {}/{}): {:?}",
                        self.retry_config.retry_delay,
                        attempts,
                        self.retry_config.max_retries,
                        e
                    );
                    tokio::task::yield_now().await;
                    sleep(self.retry_config.retry_delay).await;
                }
            }
        }
    }

    /// Only transport failures are retried. Anything the node answered with,
    /// including a failed transaction, is returned as is.
    fn should_retry(error: &RpcError) -> bool {
        match error {
            RpcError::ClientError(error) => matches!(
                error.kind(),
                ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_)
            ),
            _ => false,
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn get_version(&mut self) -> Result<NetworkVersion, RpcError> {
        self.retry(|| async {
            let version = self.client.get_version()?;
            Ok(NetworkVersion {
                solana_core: version.solana_core,
                feature_set: version.feature_set,
            })
        })
        .await
    }

    async fn get_account(&mut self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.retry(|| async {
            self.client
                .get_account_with_commitment(&address, self.client.commitment())
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_balance(&mut self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.retry(|| async { self.client.get_balance(pubkey).map_err(RpcError::from) })
            .await
    }

    async fn get_minimum_balance_for_rent_exemption(
        &mut self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.retry(|| async {
            self.client
                .get_minimum_balance_for_rent_exemption(data_len)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_fee_per_signature(&mut self) -> Result<u64, RpcError> {
        self.retry(|| async {
            let blockhash = self.client.get_latest_blockhash()?;
            // A message without instructions carries exactly one signature,
            // the fee payer's.
            let message = Message::new_with_blockhash(&[], Some(&Pubkey::new_unique()), &blockhash);
            self.client
                .get_fee_for_message(&message)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn request_airdrop(
        &mut self,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        // Sent once. A lost response can hide an airdrop that landed, and a
        // resend would be a second, freshly signed faucet transfer.
        self.client
            .request_airdrop(to, lamports)
            .map_err(RpcError::from)
    }

    async fn confirm_transaction(&mut self, signature: Signature) -> Result<bool, RpcError> {
        let start_time = Instant::now();
        loop {
            let confirmed = self
                .retry(|| async {
                    self.client
                        .confirm_transaction_with_commitment(&signature, self.client.commitment())
                        .map(|response| response.value)
                        .map_err(RpcError::from)
                })
                .await?;
            if confirmed {
                return Ok(true);
            }
            if start_time.elapsed() >= self.retry_config.timeout {
                warn!(
                    "Transaction {} not confirmed after {:?}",
                    signature, self.retry_config.timeout
                );
                return Ok(false);
            }
            debug!("Waiting for confirmation of {}", signature);
            sleep(self.retry_config.retry_delay).await;
        }
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        self.retry(|| async {
            self.client
                // Confirmed commitments land more reliably than finalized
                .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
                .map(|(blockhash, _last_valid_block_height)| blockhash)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        self.retry(|| async {
            self.client
                .send_and_confirm_transaction(&transaction)
                .map_err(RpcError::from)
        })
        .await
    }
}
