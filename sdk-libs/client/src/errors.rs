use std::{
    io,
    path::{Path, PathBuf},
};

use solana_sdk::pubkey::{Pubkey, PubkeyError};
use thiserror::Error;

use crate::{rpc::RpcError, workflow::WorkflowStep};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{}", keypair_unreadable_message(.path, .error, .deploy_artifact.as_deref()))]
    KeypairUnreadable {
        path: PathBuf,
        error: String,
        /// Set for program keypairs, whose absence usually means the program
        /// has not been deployed yet.
        deploy_artifact: Option<PathBuf>,
    },

    #[error("{}", program_not_deployed_message(.program_id, .artifact.as_deref()))]
    ProgramNotDeployed {
        program_id: Pubkey,
        artifact: Option<PathBuf>,
    },

    #[error("Program {program_id} is not executable")]
    ProgramNotExecutable { program_id: Pubkey },

    #[error("Funding of {payer} with {lamports} lamports was not confirmed: {reason}")]
    FundingUnconfirmed {
        payer: Pubkey,
        lamports: u64,
        reason: String,
    },

    #[error("Failed to create account {address}: {source}")]
    AccountCreationFailed {
        address: Pubkey,
        #[source]
        source: RpcError,
    },

    #[error("Failed to write to account {address}: {source}")]
    WriteFailed {
        address: Pubkey,
        #[source]
        source: RpcError,
    },

    #[error("Malformed payload: expected {expected} bytes, found {actual}")]
    MalformedPayload { expected: usize, actual: usize },

    #[error("Cannot find the target account {address}")]
    AccountNotFound { address: Pubkey },

    #[error("Seed `{seed}` rejected for address derivation: {error}")]
    SeedRejected { seed: String, error: PubkeyError },

    #[error("Serialization error: {0}")]
    Serialization(#[from] io::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Workflow halted at step {step:?}: {reason}")]
    Halted { step: WorkflowStep, reason: String },
}

fn keypair_unreadable_message(path: &Path, error: &str, deploy_artifact: Option<&Path>) -> String {
    match deploy_artifact {
        Some(artifact) => format!(
            "Failed to read program keypair at '{}' due to error: {}. Program may need to be deployed with `solana program deploy {}`",
            path.display(),
            error,
            artifact.display()
        ),
        None => format!(
            "Failed to read keypair at '{}' due to error: {}",
            path.display(),
            error
        ),
    }
}

fn program_not_deployed_message(program_id: &Pubkey, artifact: Option<&Path>) -> String {
    match artifact {
        Some(artifact) => format!(
            "Program {} needs to be deployed with `solana program deploy {}`",
            program_id,
            artifact.display()
        ),
        None => format!("Program {} needs to be built and deployed", program_id),
    }
}
