use solana_sdk::pubkey::Pubkey;

use crate::errors::WorkflowError;

/// Address of the account `payer` creates for `owner` under `seed`.
/// Deterministic, so it is recomputed on every run instead of being stored.
pub fn derive_target_address(
    payer: &Pubkey,
    seed: &str,
    owner: &Pubkey,
) -> Result<Pubkey, WorkflowError> {
    Pubkey::create_with_seed(payer, seed, owner).map_err(|error| WorkflowError::SeedRejected {
        seed: seed.to_string(),
        error,
    })
}
