//! Sequencing of the provisioning workflow.
//!
//! Each call to [`WorkflowDriver::step`] performs one transition. A failed
//! step halts the driver in [`WorkflowState::Failed`]; nothing is rolled back,
//! because every step is safe to repeat on the next run.

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use tracing::{error, info};

use crate::{
    constants::{DEFAULT_PAYLOAD, DEFAULT_SEED, SIGNATURE_BUDGET_MULTIPLIER},
    errors::WorkflowError,
    funder::ensure_funded,
    layout::{self, TargetAccount},
    provisioner::ensure_account,
    rpc::RpcConnection,
    target::{read_payload, write_payload},
    verifier::{verify_program, ProgramArtifacts},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub program: ProgramArtifacts,
    pub seed: String,
    pub payload: TargetAccount,
    pub signature_budget_multiplier: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            program: ProgramArtifacts::default(),
            seed: DEFAULT_SEED.to_string(),
            payload: TargetAccount::new(DEFAULT_PAYLOAD),
            signature_budget_multiplier: SIGNATURE_BUDGET_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub program_id: Pubkey,
    pub payer: Pubkey,
    pub payer_balance: u64,
    pub target: Pubkey,
    pub signature: Signature,
    pub payload: TargetAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Verify,
    Fund,
    Provision,
    Write,
    Report,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Unstarted,
    Verified {
        program_id: Pubkey,
    },
    Funded {
        program_id: Pubkey,
        payer_balance: u64,
    },
    Provisioned {
        program_id: Pubkey,
        payer_balance: u64,
        target: Pubkey,
    },
    Written {
        program_id: Pubkey,
        payer_balance: u64,
        target: Pubkey,
        signature: Signature,
    },
    Reported(WorkflowReport),
    Done(WorkflowReport),
    Failed {
        step: WorkflowStep,
        reason: String,
    },
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done(_) | WorkflowState::Failed { .. })
    }

    /// Step that leaves this state, `None` once terminal.
    pub fn next_step(&self) -> Option<WorkflowStep> {
        match self {
            WorkflowState::Unstarted => Some(WorkflowStep::Verify),
            WorkflowState::Verified { .. } => Some(WorkflowStep::Fund),
            WorkflowState::Funded { .. } => Some(WorkflowStep::Provision),
            WorkflowState::Provisioned { .. } => Some(WorkflowStep::Write),
            WorkflowState::Written { .. } => Some(WorkflowStep::Report),
            WorkflowState::Reported(_) => Some(WorkflowStep::Finish),
            WorkflowState::Done(_) | WorkflowState::Failed { .. } => None,
        }
    }
}

pub struct WorkflowDriver<'a, R: RpcConnection> {
    rpc: &'a mut R,
    payer: &'a Keypair,
    config: WorkflowConfig,
    state: WorkflowState,
}

impl<'a, R: RpcConnection> WorkflowDriver<'a, R> {
    pub fn new(rpc: &'a mut R, payer: &'a Keypair, config: WorkflowConfig) -> Self {
        Self {
            rpc,
            payer,
            config,
            state: WorkflowState::Unstarted,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Runs every remaining step and returns the final report, or the error
    /// of the step that failed. A driver that already failed reports
    /// [`WorkflowError::Halted`].
    pub async fn run(mut self) -> Result<WorkflowReport, WorkflowError> {
        loop {
            match &self.state {
                WorkflowState::Done(report) => return Ok(report.clone()),
                WorkflowState::Failed { step, reason } => {
                    return Err(WorkflowError::Halted {
                        step: *step,
                        reason: reason.clone(),
                    })
                }
                _ => self.step().await?,
            }
        }
    }

    /// Performs the transition out of the current state. Terminal states are
    /// left untouched.
    pub async fn step(&mut self) -> Result<(), WorkflowError> {
        let step = self.state.next_step();
        match self.transition().await {
            Ok(Some(next)) => {
                self.state = next;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                if let Some(step) = step {
                    error!("Workflow failed at {:?}: {}", step, e);
                    self.state = WorkflowState::Failed {
                        step,
                        reason: e.to_string(),
                    };
                }
                Err(e)
            }
        }
    }

    /// Next state, `None` once terminal.
    async fn transition(&mut self) -> Result<Option<WorkflowState>, WorkflowError> {
        let next = match &self.state {
            WorkflowState::Unstarted => {
                // The keypair is read before the first request, so a missing
                // file fails without touching the ledger.
                let program_id = verify_program(self.rpc, &self.config.program).await?;
                let version = self.rpc.get_version().await?;
                info!(
                    "Connection to cluster established: {} {:?}",
                    self.rpc.get_url(),
                    version
                );
                WorkflowState::Verified { program_id }
            }
            WorkflowState::Verified { program_id } => {
                let program_id = *program_id;
                let payer_balance = ensure_funded(
                    self.rpc,
                    &self.payer.pubkey(),
                    layout::target_size()?,
                    self.config.signature_budget_multiplier,
                )
                .await?;
                WorkflowState::Funded {
                    program_id,
                    payer_balance,
                }
            }
            WorkflowState::Funded {
                program_id,
                payer_balance,
            } => {
                let (program_id, payer_balance) = (*program_id, *payer_balance);
                let target = ensure_account(
                    self.rpc,
                    self.payer,
                    &self.config.seed,
                    &program_id,
                    layout::target_size()?,
                )
                .await?;
                WorkflowState::Provisioned {
                    program_id,
                    payer_balance,
                    target,
                }
            }
            WorkflowState::Provisioned {
                program_id,
                payer_balance,
                target,
            } => {
                let (program_id, payer_balance, target) = (*program_id, *payer_balance, *target);
                let signature = write_payload(
                    self.rpc,
                    self.payer,
                    &program_id,
                    &target,
                    &self.config.payload,
                )
                .await?;
                WorkflowState::Written {
                    program_id,
                    payer_balance,
                    target,
                    signature,
                }
            }
            WorkflowState::Written {
                program_id,
                payer_balance,
                target,
                signature,
            } => {
                let report = WorkflowReport {
                    program_id: *program_id,
                    payer: self.payer.pubkey(),
                    payer_balance: *payer_balance,
                    target: *target,
                    signature: *signature,
                    payload: read_payload(self.rpc, target).await?,
                };
                WorkflowState::Reported(report)
            }
            WorkflowState::Reported(report) => {
                info!(
                    "{} has been written with {:?} by program {}",
                    report.target, report.payload.data, report.program_id
                );
                info!("Success");
                WorkflowState::Done(report.clone())
            }
            WorkflowState::Done(_) | WorkflowState::Failed { .. } => return Ok(None),
        };
        Ok(Some(next))
    }
}
