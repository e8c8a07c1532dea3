use std::io;

#[cfg(feature = "program-test")]
use solana_banks_client::BanksClientError;
use solana_client::client_error::ClientError;
use solana_sdk::{signer::SignerError, transaction::TransactionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "program-test")]
    #[error("BanksError: {0}")]
    BanksError(#[from] BanksClientError),

    #[error("TransactionError: {0}")]
    TransactionError(#[from] TransactionError),

    #[error("ClientError: {0}")]
    ClientError(#[from] ClientError),

    #[error("SignerError: {0}")]
    SignerError(#[from] SignerError),

    #[error("IoError: {0}")]
    IoError(#[from] io::Error),

    #[error("Error: `{0}`")]
    CustomError(String),
}
