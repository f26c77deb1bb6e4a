//! Salvium wallet core.
//!
//! Provides key management, output scanning, blockchain sync, balance tracking,
//! and UTXO selection. Seed-phrase decoding, wallet-file encryption, and
//! persistent storage are left to external collaborators — this crate talks
//! to storage only through the `StorageBackend` trait in `storage`.

pub mod error;
pub mod keys;
pub mod account;
pub mod scanner;
pub mod storage;
pub mod sync;
pub mod utxo;
pub mod wallet;
pub mod stake;
#[cfg(not(target_arch = "wasm32"))]
pub mod query;

pub use error::WalletError;
pub use keys::{WalletKeys, WalletType, CnKeys, CarrotKeys};
pub use account::Account;
pub use scanner::{ScanContext, FoundOutput};
pub use storage::{StorageBackend, OutputRecord, TransactionRecord, StakeRecord, SubaddressIndex};
pub use sync::{SyncEngine, SyncEvent};
pub use utxo::{SelectionStrategy, SelectionOptions};
pub use wallet::Wallet;
