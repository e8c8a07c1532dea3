use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use solana_program_test::ProgramTestContext;
use solana_sdk::{
    account::Account,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    system_instruction,
    transaction::Transaction,
};

use super::{rpc_connection::NetworkVersion, RpcConnection, RpcError};

/// Connection backed by an in-process bank. Airdrops are transfers from the
/// context payer and every processed transaction is final immediately.
pub struct ProgramTestRpcConnection {
    pub context: ProgramTestContext,
}

impl ProgramTestRpcConnection {
    pub fn new(context: ProgramTestContext) -> Self {
        Self { context }
    }
}

impl Debug for ProgramTestRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgramTestRpcConnection")
    }
}

#[async_trait]
impl RpcConnection for ProgramTestRpcConnection {
    fn get_url(&self) -> String {
        "program-test".to_string()
    }

    async fn get_version(&mut self) -> Result<NetworkVersion, RpcError> {
        Ok(NetworkVersion {
            solana_core: "program-test".to_string(),
            feature_set: None,
        })
    }

    async fn get_account(&mut self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.context
            .banks_client
            .get_account(address)
            .await
            .map_err(RpcError::from)
    }

    async fn get_balance(&mut self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.context
            .banks_client
            .get_balance(*pubkey)
            .await
            .map_err(RpcError::from)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &mut self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        let rent = self.context.banks_client.get_rent().await?;
        Ok(rent.minimum_balance(data_len))
    }

    async fn get_fee_per_signature(&mut self) -> Result<u64, RpcError> {
        let blockhash = self.context.banks_client.get_latest_blockhash().await?;
        let message = Message::new_with_blockhash(&[], Some(&Pubkey::new_unique()), &blockhash);
        self.context
            .banks_client
            .get_fee_for_message(message)
            .await?
            .ok_or_else(|| RpcError::CustomError("Fee for message unavailable".to_string()))
    }

    async fn request_airdrop(
        &mut self,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        let transfer_instruction =
            system_instruction::transfer(&self.context.payer.pubkey(), to, lamports);
        let latest_blockhash = self.get_latest_blockhash().await?;
        let mut transaction =
            Transaction::new_with_payer(&[transfer_instruction], Some(&self.context.payer.pubkey()));
        transaction.try_sign(&[&self.context.payer], latest_blockhash)?;
        self.process_transaction(transaction).await
    }

    async fn confirm_transaction(&mut self, _signature: Signature) -> Result<bool, RpcError> {
        Ok(true)
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        self.context
            .get_new_latest_blockhash()
            .await
            .map_err(RpcError::from)
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| RpcError::CustomError("Transaction is not signed".to_string()))?;
        let result = self
            .context
            .banks_client
            .process_transaction_with_metadata(transaction)
            .await?;
        result.result?;
        Ok(signature)
    }
}
