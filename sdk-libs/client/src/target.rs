use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use tracing::info;

use crate::{
    errors::WorkflowError,
    layout::{self, TargetAccount},
    rpc::RpcConnection,
};

/// Sends the program's write instruction for `target` and waits for it to
/// confirm.
pub async fn write_payload<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    program_id: &Pubkey,
    target: &Pubkey,
    payload: &TargetAccount,
) -> Result<Signature, WorkflowError> {
    info!("Writing {:?} to {}", payload.data, target);
    let instruction = data_target::instruction::write(program_id, target, payload)?;
    let signature = rpc
        .create_and_send_transaction(&[instruction], &payer.pubkey(), &[payer])
        .await
        .map_err(|source| WorkflowError::WriteFailed {
            address: *target,
            source,
        })?;
    Ok(signature)
}

pub async fn read_payload<R: RpcConnection>(
    rpc: &mut R,
    target: &Pubkey,
) -> Result<TargetAccount, WorkflowError> {
    let account = rpc
        .get_account(*target)
        .await?
        .ok_or(WorkflowError::AccountNotFound { address: *target })?;
    let payload = layout::decode(&account.data)?;
    info!("{} holds {:?}", target, payload.data);
    Ok(payload)
}
