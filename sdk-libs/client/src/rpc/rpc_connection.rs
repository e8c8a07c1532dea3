use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

use crate::rpc::errors::RpcError;

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
}

/// Software version reported by the ledger node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkVersion {
    pub solana_core: String,
    pub feature_set: Option<u32>,
}

/// Everything the workflow needs from the ledger. Implementations own their
/// retry and confirmation policy; callers treat each method as one blocking
/// request.
#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;

    async fn get_version(&mut self) -> Result<NetworkVersion, RpcError>;

    async fn get_account(&mut self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    async fn get_balance(&mut self, pubkey: &Pubkey) -> Result<u64, RpcError>;

    async fn get_minimum_balance_for_rent_exemption(
        &mut self,
        data_len: usize,
    ) -> Result<u64, RpcError>;

    /// Lamports charged per transaction signature at the current blockhash.
    async fn get_fee_per_signature(&mut self) -> Result<u64, RpcError>;

    /// Requests an airdrop without waiting for it to land.
    async fn request_airdrop(&mut self, to: &Pubkey, lamports: u64)
        -> Result<Signature, RpcError>;

    /// Waits for `signature` to reach the connection's commitment level.
    /// Returns `false` if it did not confirm in time.
    async fn confirm_transaction(&mut self, signature: Signature) -> Result<bool, RpcError>;

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError>;

    /// Sends a signed transaction and returns once it is confirmed.
    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError>;

    async fn create_and_send_transaction<'a>(
        &'a mut self,
        instructions: &'a [Instruction],
        payer: &'a Pubkey,
        signers: &'a [&'a Keypair],
    ) -> Result<Signature, RpcError> {
        let blockhash = self.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction.try_sign(signers, blockhash)?;
        self.process_transaction(transaction).await
    }
}
