use std::path::Path;

use solana_sdk::signature::{read_keypair_file, Keypair};

use crate::errors::WorkflowError;

pub fn load_keypair(path: &Path) -> Result<Keypair, WorkflowError> {
    read_keypair_file(path).map_err(|error| WorkflowError::KeypairUnreadable {
        path: path.to_path_buf(),
        error: error.to_string(),
        deploy_artifact: None,
    })
}
