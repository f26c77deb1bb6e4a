//! Wallet error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid seed length: expected 32, got {0}")]
    InvalidSeedLength(usize),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] salvium_rpc::RpcError),

    #[error("sync error: {0}")]
    Sync(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u64, have: u64 },

    #[error("no suitable outputs for selection")]
    NoOutputs,

    #[error("wallet is view-only, cannot {0}")]
    ViewOnly(String),

    #[error("wallet not synced")]
    NotSynced,

    #[error("{0}")]
    Other(String),
}
