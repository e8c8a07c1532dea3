use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
};
use tracing::{info, warn};

use crate::{address::derive_target_address, errors::WorkflowError, rpc::RpcConnection};

/// Makes sure the seed-derived account of `payer` exists, creating it with
/// `space` bytes owned by `owner` if it does not.
///
/// Submits at most one transaction. An existing account is returned as is,
/// and a failed creation is not retried: the previous attempt may still land,
/// and a retry would spend the rent twice.
pub async fn ensure_account<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    seed: &str,
    owner: &Pubkey,
    space: usize,
) -> Result<Pubkey, WorkflowError> {
    let payer_pubkey = payer.pubkey();
    let address = derive_target_address(&payer_pubkey, seed, owner)?;

    if let Some(account) = rpc.get_account(address).await? {
        if account.owner != *owner || account.data.len() != space {
            warn!(
                "Account {} already exists with owner {} and {} bytes, expected owner {} and {} bytes",
                address,
                account.owner,
                account.data.len(),
                owner,
                space
            );
        }
        info!("Account {} already exists", address);
        return Ok(address);
    }

    info!("Creating account {} to write to", address);
    let lamports = rpc.get_minimum_balance_for_rent_exemption(space).await?;
    let instruction = system_instruction::create_account_with_seed(
        &payer_pubkey,
        &address,
        &payer_pubkey,
        seed,
        lamports,
        space as u64,
        owner,
    );
    let signature = rpc
        .create_and_send_transaction(&[instruction], &payer_pubkey, &[payer])
        .await
        .map_err(|source| WorkflowError::AccountCreationFailed { address, source })?;
    info!("Created account {} in {}", address, signature);

    Ok(address)
}
