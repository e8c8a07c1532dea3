use std::path::PathBuf;

use solana_sdk::{pubkey::Pubkey, signature::Signer};
use tracing::info;

use crate::{
    constants::{DEFAULT_PROGRAM_KEYPAIR_PATH, DEFAULT_PROGRAM_SO_PATH},
    errors::WorkflowError,
    keypair::load_keypair,
    rpc::RpcConnection,
};

/// Local build outputs of the program: its keypair, which fixes the program
/// id, and the shared object that gets deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramArtifacts {
    pub keypair_path: PathBuf,
    pub so_path: PathBuf,
}

impl Default for ProgramArtifacts {
    fn default() -> Self {
        Self {
            keypair_path: PathBuf::from(DEFAULT_PROGRAM_KEYPAIR_PATH),
            so_path: PathBuf::from(DEFAULT_PROGRAM_SO_PATH),
        }
    }
}

/// Resolves the program id from its keypair file and checks that an
/// executable account exists at that id.
pub async fn verify_program<R: RpcConnection>(
    rpc: &mut R,
    artifacts: &ProgramArtifacts,
) -> Result<Pubkey, WorkflowError> {
    let program_id = load_keypair(&artifacts.keypair_path)
        .map_err(|error| match error {
            WorkflowError::KeypairUnreadable { path, error, .. } => {
                WorkflowError::KeypairUnreadable {
                    path,
                    error,
                    deploy_artifact: Some(artifacts.so_path.clone()),
                }
            }
            other => other,
        })?
        .pubkey();

    match rpc.get_account(program_id).await? {
        None => Err(WorkflowError::ProgramNotDeployed {
            program_id,
            artifact: artifacts
                .so_path
                .exists()
                .then(|| artifacts.so_path.clone()),
        }),
        Some(account) if !account.executable => {
            Err(WorkflowError::ProgramNotExecutable { program_id })
        }
        Some(_) => {
            info!("Using program {}", program_id);
            Ok(program_id)
        }
    }
}
