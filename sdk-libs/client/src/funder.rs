use solana_sdk::{native_token::lamports_to_sol, pubkey::Pubkey};
use tracing::{debug, info};

use crate::{
    errors::WorkflowError,
    rpc::{RpcConnection, RpcError},
};

/// Lamports the payer must hold before the workflow starts spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBudget {
    pub rent_exemption_minimum: u64,
    pub fee_per_signature: u64,
    pub signature_budget_multiplier: u64,
}

impl FeeBudget {
    pub async fn fetch<R: RpcConnection>(
        rpc: &mut R,
        account_size: usize,
        signature_budget_multiplier: u64,
    ) -> Result<Self, RpcError> {
        let rent_exemption_minimum = rpc
            .get_minimum_balance_for_rent_exemption(account_size)
            .await?;
        let fee_per_signature = rpc.get_fee_per_signature().await?;
        Ok(Self {
            rent_exemption_minimum,
            fee_per_signature,
            signature_budget_multiplier,
        })
    }

    pub fn total(&self) -> u64 {
        self.rent_exemption_minimum.saturating_add(
            self.fee_per_signature
                .saturating_mul(self.signature_budget_multiplier),
        )
    }
}

/// Tops `payer` up to the fee budget with a single airdrop when it holds
/// less. Returns the balance after funding.
pub async fn ensure_funded<R: RpcConnection>(
    rpc: &mut R,
    payer: &Pubkey,
    account_size: usize,
    signature_budget_multiplier: u64,
) -> Result<u64, WorkflowError> {
    let budget = FeeBudget::fetch(rpc, account_size, signature_budget_multiplier).await?;
    let fees = budget.total();
    debug!("Fee budget for {}: {:?} = {} lamports", payer, budget, fees);

    let mut balance = rpc.get_balance(payer).await?;
    if balance < fees {
        let lamports = fees - balance;
        let unconfirmed = |reason: String| WorkflowError::FundingUnconfirmed {
            payer: *payer,
            lamports,
            reason,
        };

        info!("Requesting airdrop of {} lamports to {}", lamports, payer);
        let signature = rpc
            .request_airdrop(payer, lamports)
            .await
            .map_err(|e| unconfirmed(format!("airdrop request failed: {}", e)))?;
        match rpc.confirm_transaction(signature).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(unconfirmed(format!(
                    "airdrop {} did not confirm",
                    signature
                )))
            }
            Err(e) => {
                return Err(unconfirmed(format!(
                    "confirmation of airdrop {} failed: {}",
                    signature, e
                )))
            }
        }

        balance = rpc.get_balance(payer).await?;
        if balance < fees {
            return Err(unconfirmed(format!(
                "balance {} is still below the required {}",
                balance, fees
            )));
        }
    }

    info!(
        "Using account {} containing {} SOL to pay for fees",
        payer,
        lamports_to_sol(balance)
    );
    Ok(balance)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fee_budget_total() {
        let budget = FeeBudget {
            rent_exemption_minimum: 1_002_240,
            fee_per_signature: 5_000,
            signature_budget_multiplier: 100,
        };
        assert_eq!(budget.total(), 1_502_240);
    }

    #[test]
    fn test_fee_budget_saturates() {
        let budget = FeeBudget {
            rent_exemption_minimum: u64::MAX - 1,
            fee_per_signature: u64::MAX,
            signature_budget_multiplier: 2,
        };
        assert_eq!(budget.total(), u64::MAX);
    }
}
