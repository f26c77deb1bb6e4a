//! Wallet storage interface.
//!
//! `StorageBackend` is the narrow persistence boundary the wallet core talks
//! to — output/transaction/stake records, sync-height bookkeeping, and
//! block-hash tracking for reorg detection. A concrete backend (SQLCipher,
//! IndexedDB, a remote key-value store) is an external collaborator; this
//! crate never reaches for one directly. `MemoryStorage` below is a
//! dependency-free reference implementation used by tests and as a default
//! for callers that don't need durability across process restarts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

// ─── Data Models ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub key_image: Option<String>,
    pub public_key: Option<String>,
    pub tx_hash: String,
    #[serde(default)]
    pub output_index: i64,
    pub global_index: Option<i64>,
    pub asset_type_index: Option<i64>,
    pub block_height: Option<i64>,
    pub block_timestamp: Option<i64>,
    #[serde(default = "default_zero_str")]
    pub amount: String,
    #[serde(default = "default_sal")]
    pub asset_type: String,
    pub commitment: Option<String>,
    pub mask: Option<String>,
    #[serde(default)]
    pub subaddress_index: SubaddressIndex,
    #[serde(default)]
    pub is_carrot: bool,
    pub carrot_ephemeral_pubkey: Option<String>,
    pub carrot_shared_secret: Option<String>,
    pub carrot_enote_type: Option<i64>,
    #[serde(default)]
    pub is_spent: bool,
    pub spent_height: Option<i64>,
    pub spent_tx_hash: Option<String>,
    #[serde(default = "default_zero_str")]
    pub unlock_time: String,
    #[serde(default = "default_tx_type", deserialize_with = "deserialize_tx_type")]
    pub tx_type: i64,
    pub tx_pub_key: Option<String>,
    #[serde(default)]
    pub is_frozen: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SubaddressIndex {
    #[serde(default)]
    pub major: i64,
    #[serde(default)]
    pub minor: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub tx_hash: String,
    pub tx_pub_key: Option<String>,
    pub block_height: Option<i64>,
    pub block_timestamp: Option<i64>,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub in_pool: bool,
    #[serde(default)]
    pub is_failed: bool,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub is_incoming: bool,
    #[serde(default)]
    pub is_outgoing: bool,
    #[serde(default = "default_zero_str")]
    pub incoming_amount: String,
    #[serde(default = "default_zero_str")]
    pub outgoing_amount: String,
    #[serde(default = "default_zero_str")]
    pub fee: String,
    #[serde(default = "default_zero_str")]
    pub change_amount: String,
    pub payment_id: Option<String>,
    #[serde(default = "default_zero_str")]
    pub unlock_time: String,
    #[serde(default = "default_tx_type", deserialize_with = "deserialize_tx_type")]
    pub tx_type: i64,
    #[serde(default = "default_sal")]
    pub asset_type: String,
    #[serde(default)]
    pub is_miner_tx: bool,
    #[serde(default)]
    pub is_protocol_tx: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputQuery {
    pub is_spent: Option<bool>,
    pub is_frozen: Option<bool>,
    pub asset_type: Option<String>,
    pub tx_type: Option<i64>,
    pub account_index: Option<i64>,
    pub subaddress_index: Option<i64>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxQuery {
    pub is_incoming: Option<bool>,
    pub is_outgoing: Option<bool>,
    pub is_confirmed: Option<bool>,
    pub in_pool: Option<bool>,
    pub tx_type: Option<i64>,
    pub min_height: Option<i64>,
    pub max_height: Option<i64>,
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    pub balance: String,
    pub unlocked_balance: String,
    pub locked_balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRecord {
    pub stake_tx_hash: String,
    pub stake_height: Option<i64>,
    pub stake_timestamp: Option<i64>,
    #[serde(default = "default_zero_str")]
    pub amount_staked: String,
    #[serde(default = "default_zero_str")]
    pub fee: String,
    #[serde(default = "default_sal")]
    pub asset_type: String,
    pub change_output_key: Option<String>,
    #[serde(default = "default_locked")]
    pub status: String,
    pub return_tx_hash: Option<String>,
    pub return_height: Option<i64>,
    pub return_timestamp: Option<i64>,
    #[serde(default = "default_zero_str")]
    pub return_amount: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

fn default_zero_str() -> String { "0".to_string() }
fn default_sal() -> String { "SAL".to_string() }
fn default_tx_type() -> i64 { 3 }
fn default_locked() -> String { "locked".to_string() }

/// Deserialize tx_type from either an integer or a string name.
/// Accepts: 0-7 (integers), "miner", "protocol", "transfer", "burn", "convert", "stake", "return".
fn deserialize_tx_type<'de, D>(deserializer: D) -> Result<i64, D::Error>
where D: serde::Deserializer<'de>
{
    use serde::de;

    struct TxTypeVisitor;
    impl<'de> de::Visitor<'de> for TxTypeVisitor {
        type Value = i64;
        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer or tx type name string")
        }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> { Ok(v) }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> { Ok(v as i64) }
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> { Ok(v as i64) }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            match v {
                "miner" => Ok(1),
                "protocol" => Ok(2),
                "transfer" => Ok(3),
                "burn" => Ok(4),
                "convert" => Ok(5),
                "stake" => Ok(6),
                "return" => Ok(7),
                _ => v.parse::<i64>().map_err(de::Error::custom),
            }
        }
    }
    deserializer.deserialize_any(TxTypeVisitor)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

fn is_unlocked(current_height: i64, block_height: Option<i64>, unlock_time_str: &str, tx_type: i64, now_secs: u128) -> bool {
    let bh = match block_height {
        Some(h) => h,
        None => return false,
    };

    // Coinbase (miner/protocol) requires 60 confirmations.
    if tx_type == 1 || tx_type == 2 {
        return (current_height - bh) >= 60;
    }

    let unlock_time: u128 = unlock_time_str.parse().unwrap_or(0);

    if unlock_time == 0 {
        return (current_height - bh) >= 10;
    }

    if unlock_time < 500_000_000 {
        return current_height >= unlock_time as i64;
    }

    now_secs >= unlock_time
}

// ─── StorageBackend ─────────────────────────────────────────────────────────

/// The narrow interface the wallet core uses to persist and query scan
/// results. Every method is a single logical operation with no ordering
/// requirement beyond what the caller imposes — implementations are free to
/// batch internally.
pub trait StorageBackend: Send + Sync {
    fn put_output(&self, row: &OutputRecord) -> Result<(), StorageError>;
    fn get_output(&self, key_image: &str) -> Result<Option<OutputRecord>, StorageError>;
    fn get_outputs(&self, query: &OutputQuery) -> Result<Vec<OutputRecord>, StorageError>;
    fn mark_spent(&self, key_image: &str, spending_tx: &str, spent_height: i64) -> Result<(), StorageError>;
    fn mark_unspent(&self, key_image: &str) -> Result<(), StorageError>;

    fn put_tx(&self, row: &TransactionRecord) -> Result<(), StorageError>;
    fn get_tx(&self, tx_hash: &str) -> Result<Option<TransactionRecord>, StorageError>;
    fn get_txs(&self, query: &TxQuery) -> Result<Vec<TransactionRecord>, StorageError>;

    fn get_sync_height(&self) -> Result<i64, StorageError>;
    fn set_sync_height(&self, height: i64) -> Result<(), StorageError>;

    fn put_block_hash(&self, height: i64, hash: &str) -> Result<(), StorageError>;
    fn get_block_hash(&self, height: i64) -> Result<Option<String>, StorageError>;

    /// Roll back all mutable state above `height`: drops outputs and
    /// transactions recorded above it, un-spends outputs that were marked
    /// spent above it, drops block hashes above it, and resets the sync
    /// height to `height`. Used when the sync engine detects a reorg.
    fn rollback(&self, height: i64) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;

    fn get_balance(&self, current_height: i64, asset_type: &str, account_index: i32) -> Result<BalanceResult, StorageError>;
    fn get_all_balances(&self, current_height: i64, account_index: i32) -> Result<HashMap<String, BalanceResult>, StorageError>;

    fn put_stake(&self, row: &StakeRecord) -> Result<(), StorageError>;
    fn get_stake(&self, stake_tx_hash: &str) -> Result<Option<StakeRecord>, StorageError>;
    fn get_stakes(&self, status: Option<&str>, asset_type: Option<&str>) -> Result<Vec<StakeRecord>, StorageError>;
    fn get_stake_by_output_key(&self, change_output_key: &str) -> Result<Option<StakeRecord>, StorageError>;
    fn mark_stake_returned(
        &self,
        stake_tx_hash: &str,
        return_tx_hash: &str,
        return_height: i64,
        return_timestamp: i64,
        return_amount: &str,
    ) -> Result<(), StorageError>;
}

// ─── MemoryStorage ──────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
    outputs: HashMap<String, OutputRecord>,
    // Outputs without a key image (view-only scans) are kept keyed on tx_hash:output_index.
    keyless_outputs: HashMap<String, OutputRecord>,
    txs: HashMap<String, TransactionRecord>,
    stakes: HashMap<String, StakeRecord>,
    block_hashes: HashMap<i64, String>,
    sync_height: i64,
}

/// In-memory `StorageBackend`. Not durable across process restarts — useful
/// for tests and as the default backend when no external store is wired up.
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StorageError> {
        self.state.lock().map_err(|e| StorageError::Backend(e.to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn put_output(&self, row: &OutputRecord) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        match &row.key_image {
            Some(ki) => { state.outputs.insert(ki.clone(), row.clone()); }
            None => {
                let key = format!("{}:{}", row.tx_hash, row.output_index);
                state.keyless_outputs.insert(key, row.clone());
            }
        }
        Ok(())
    }

    fn get_output(&self, key_image: &str) -> Result<Option<OutputRecord>, StorageError> {
        Ok(self.lock()?.outputs.get(key_image).cloned())
    }

    fn get_outputs(&self, query: &OutputQuery) -> Result<Vec<OutputRecord>, StorageError> {
        let state = self.lock()?;
        let matches = |o: &OutputRecord| -> bool {
            if let Some(spent) = query.is_spent { if o.is_spent != spent { return false; } }
            if let Some(frozen) = query.is_frozen { if o.is_frozen != frozen { return false; } }
            if let Some(ref at) = query.asset_type { if &o.asset_type != at { return false; } }
            if let Some(tt) = query.tx_type { if o.tx_type != tt { return false; } }
            if let Some(acct) = query.account_index { if o.subaddress_index.major != acct { return false; } }
            if let Some(sub) = query.subaddress_index { if o.subaddress_index.minor != sub { return false; } }
            if let Some(ref min) = query.min_amount {
                let min: u128 = min.parse().unwrap_or(0);
                let amt: u128 = o.amount.parse().unwrap_or(0);
                if amt < min { return false; }
            }
            if let Some(ref max) = query.max_amount {
                let max: u128 = max.parse().unwrap_or(u128::MAX);
                let amt: u128 = o.amount.parse().unwrap_or(0);
                if amt > max { return false; }
            }
            true
        };

        Ok(state.outputs.values()
            .chain(state.keyless_outputs.values())
            .filter(|o| matches(o))
            .cloned()
            .collect())
    }

    fn mark_spent(&self, key_image: &str, spending_tx: &str, spent_height: i64) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let now = now_millis();
        if let Some(o) = state.outputs.get_mut(key_image) {
            o.is_spent = true;
            o.spent_tx_hash = Some(spending_tx.to_string());
            o.spent_height = Some(spent_height);
            o.updated_at = Some(now);
        }
        Ok(())
    }

    fn mark_unspent(&self, key_image: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if let Some(o) = state.outputs.get_mut(key_image) {
            o.is_spent = false;
            o.spent_tx_hash = None;
            o.spent_height = None;
        }
        Ok(())
    }

    fn put_tx(&self, row: &TransactionRecord) -> Result<(), StorageError> {
        self.lock()?.txs.insert(row.tx_hash.clone(), row.clone());
        Ok(())
    }

    fn get_tx(&self, tx_hash: &str) -> Result<Option<TransactionRecord>, StorageError> {
        Ok(self.lock()?.txs.get(tx_hash).cloned())
    }

    fn get_txs(&self, query: &TxQuery) -> Result<Vec<TransactionRecord>, StorageError> {
        let state = self.lock()?;
        let matches = |t: &TransactionRecord| -> bool {
            if let Some(v) = query.is_incoming { if t.is_incoming != v { return false; } }
            if let Some(v) = query.is_outgoing { if t.is_outgoing != v { return false; } }
            if let Some(v) = query.is_confirmed { if t.is_confirmed != v { return false; } }
            if let Some(v) = query.in_pool { if t.in_pool != v { return false; } }
            if let Some(tt) = query.tx_type { if t.tx_type != tt { return false; } }
            if let Some(min) = query.min_height { if t.block_height.unwrap_or(0) < min { return false; } }
            if let Some(max) = query.max_height { if t.block_height.unwrap_or(i64::MAX) > max { return false; } }
            if let Some(ref h) = query.tx_hash { if &t.tx_hash != h { return false; } }
            true
        };
        Ok(state.txs.values().filter(|t| matches(t)).cloned().collect())
    }

    fn get_sync_height(&self) -> Result<i64, StorageError> {
        Ok(self.lock()?.sync_height)
    }

    fn set_sync_height(&self, height: i64) -> Result<(), StorageError> {
        self.lock()?.sync_height = height;
        Ok(())
    }

    fn put_block_hash(&self, height: i64, hash: &str) -> Result<(), StorageError> {
        self.lock()?.block_hashes.insert(height, hash.to_string());
        Ok(())
    }

    fn get_block_hash(&self, height: i64) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.block_hashes.get(&height).cloned())
    }

    fn rollback(&self, height: i64) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let now = now_millis();

        state.outputs.retain(|_, o| o.block_height.unwrap_or(0) <= height);
        state.keyless_outputs.retain(|_, o| o.block_height.unwrap_or(0) <= height);
        state.txs.retain(|_, t| t.block_height.unwrap_or(0) <= height);
        state.block_hashes.retain(|h, _| *h <= height);

        for o in state.outputs.values_mut() {
            if o.is_spent && o.spent_height.unwrap_or(0) > height {
                o.is_spent = false;
                o.spent_tx_hash = None;
                o.spent_height = None;
                o.updated_at = Some(now);
            }
        }

        for s in state.stakes.values_mut() {
            if s.stake_height.unwrap_or(0) <= height && s.return_height.unwrap_or(0) > height {
                s.status = "locked".to_string();
                s.return_tx_hash = None;
                s.return_height = None;
                s.return_timestamp = None;
                s.return_amount = default_zero_str();
                s.updated_at = Some(now);
            }
        }
        state.stakes.retain(|_, s| s.stake_height.unwrap_or(0) <= height);

        state.sync_height = height;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock()? = State::default();
        Ok(())
    }

    fn get_balance(&self, current_height: i64, asset_type: &str, account_index: i32) -> Result<BalanceResult, StorageError> {
        let state = self.lock()?;
        let now_secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as u128;

        let mut total: u128 = 0;
        let mut unlocked: u128 = 0;

        for o in state.outputs.values().chain(state.keyless_outputs.values()) {
            if o.is_spent || o.is_frozen || o.asset_type != asset_type { continue; }
            if account_index >= 0 && o.subaddress_index.major != account_index as i64 { continue; }
            let amount: u128 = o.amount.parse().unwrap_or(0);
            total += amount;
            if is_unlocked(current_height, o.block_height, &o.unlock_time, o.tx_type, now_secs) {
                unlocked += amount;
            }
        }

        Ok(BalanceResult {
            balance: total.to_string(),
            unlocked_balance: unlocked.to_string(),
            locked_balance: (total - unlocked).to_string(),
        })
    }

    fn get_all_balances(&self, current_height: i64, account_index: i32) -> Result<HashMap<String, BalanceResult>, StorageError> {
        let state = self.lock()?;
        let now_secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as u128;

        let mut totals: HashMap<String, (u128, u128)> = HashMap::new();

        for o in state.outputs.values().chain(state.keyless_outputs.values()) {
            if o.is_spent || o.is_frozen { continue; }
            if account_index >= 0 && o.subaddress_index.major != account_index as i64 { continue; }
            let amount: u128 = o.amount.parse().unwrap_or(0);
            let entry = totals.entry(o.asset_type.clone()).or_insert((0, 0));
            entry.0 += amount;
            if is_unlocked(current_height, o.block_height, &o.unlock_time, o.tx_type, now_secs) {
                entry.1 += amount;
            }
        }

        Ok(totals.into_iter()
            .map(|(asset, (total, unlocked))| (asset, BalanceResult {
                balance: total.to_string(),
                unlocked_balance: unlocked.to_string(),
                locked_balance: (total - unlocked).to_string(),
            }))
            .collect())
    }

    fn put_stake(&self, row: &StakeRecord) -> Result<(), StorageError> {
        let mut row = row.clone();
        if row.created_at.is_none() {
            row.created_at = Some(now_millis());
        }
        row.updated_at = Some(now_millis());
        self.lock()?.stakes.insert(row.stake_tx_hash.clone(), row);
        Ok(())
    }

    fn get_stake(&self, stake_tx_hash: &str) -> Result<Option<StakeRecord>, StorageError> {
        Ok(self.lock()?.stakes.get(stake_tx_hash).cloned())
    }

    fn get_stakes(&self, status: Option<&str>, asset_type: Option<&str>) -> Result<Vec<StakeRecord>, StorageError> {
        let state = self.lock()?;
        let mut results: Vec<StakeRecord> = state.stakes.values()
            .filter(|s| status.map_or(true, |st| s.status == st))
            .filter(|s| asset_type.map_or(true, |at| s.asset_type == at))
            .cloned()
            .collect();
        results.sort_by_key(|s| s.stake_height.unwrap_or(0));
        Ok(results)
    }

    fn get_stake_by_output_key(&self, change_output_key: &str) -> Result<Option<StakeRecord>, StorageError> {
        Ok(self.lock()?.stakes.values()
            .find(|s| s.change_output_key.as_deref() == Some(change_output_key))
            .cloned())
    }

    fn mark_stake_returned(
        &self,
        stake_tx_hash: &str,
        return_tx_hash: &str,
        return_height: i64,
        return_timestamp: i64,
        return_amount: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if let Some(s) = state.stakes.get_mut(stake_tx_hash) {
            s.status = "returned".to_string();
            s.return_tx_hash = Some(return_tx_hash.to_string());
            s.return_height = Some(return_height);
            s.return_timestamp = Some(return_timestamp);
            s.return_amount = return_amount.to_string();
            s.updated_at = Some(now_millis());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_output(key_image: &str, amount: u64, height: i64) -> OutputRecord {
        OutputRecord {
            key_image: Some(key_image.to_string()),
            public_key: None,
            tx_hash: "txhash".to_string(),
            output_index: 0,
            global_index: None,
            asset_type_index: None,
            block_height: Some(height),
            block_timestamp: None,
            amount: amount.to_string(),
            asset_type: "SAL".to_string(),
            commitment: None,
            mask: None,
            subaddress_index: SubaddressIndex::default(),
            is_carrot: false,
            carrot_ephemeral_pubkey: None,
            carrot_shared_secret: None,
            carrot_enote_type: None,
            is_spent: false,
            spent_height: None,
            spent_tx_hash: None,
            unlock_time: "0".to_string(),
            tx_type: 3,
            tx_pub_key: None,
            is_frozen: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_put_get_output_roundtrip() {
        let db = MemoryStorage::new();
        let row = sample_output("ki1", 1_000_000, 10);
        db.put_output(&row).unwrap();
        let fetched = db.get_output("ki1").unwrap().unwrap();
        assert_eq!(fetched.amount, "1000000");
    }

    #[test]
    fn test_mark_spent_and_unspent() {
        let db = MemoryStorage::new();
        db.put_output(&sample_output("ki1", 500, 10)).unwrap();
        db.mark_spent("ki1", "spendtx", 20).unwrap();
        assert!(db.get_output("ki1").unwrap().unwrap().is_spent);
        db.mark_unspent("ki1").unwrap();
        assert!(!db.get_output("ki1").unwrap().unwrap().is_spent);
    }

    #[test]
    fn test_balance_excludes_spent_and_frozen() {
        let db = MemoryStorage::new();
        db.put_output(&sample_output("ki1", 1000, 1)).unwrap();
        let mut frozen = sample_output("ki2", 2000, 1);
        frozen.is_frozen = true;
        db.put_output(&frozen).unwrap();
        db.mark_spent("ki1", "tx", 1).unwrap();
        db.put_output(&sample_output("ki3", 3000, 1)).unwrap();

        let balance = db.get_balance(100, "SAL", -1).unwrap();
        assert_eq!(balance.balance, "3000");
    }

    #[test]
    fn test_rollback_reverts_spends_and_sync_height() {
        let db = MemoryStorage::new();
        db.put_output(&sample_output("ki1", 1000, 10)).unwrap();
        db.mark_spent("ki1", "tx", 20).unwrap();
        db.set_sync_height(25).unwrap();
        db.put_block_hash(25, "hash25").unwrap();

        db.rollback(15).unwrap();

        assert!(!db.get_output("ki1").unwrap().unwrap().is_spent);
        assert_eq!(db.get_sync_height().unwrap(), 15);
        assert!(db.get_block_hash(25).unwrap().is_none());
    }

    #[test]
    fn test_rollback_reverts_stake_return_and_drops_later_stakes() {
        let db = MemoryStorage::new();
        db.put_stake(&StakeRecord {
            stake_tx_hash: "early_stake".to_string(),
            stake_height: Some(10),
            stake_timestamp: None,
            amount_staked: "1000".to_string(),
            fee: "0".to_string(),
            asset_type: "SAL".to_string(),
            change_output_key: Some("k1".to_string()),
            status: "locked".to_string(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".to_string(),
            created_at: None,
            updated_at: None,
        }).unwrap();
        db.mark_stake_returned("early_stake", "return_tx", 30, 999, "1000").unwrap();

        db.put_stake(&StakeRecord {
            stake_tx_hash: "late_stake".to_string(),
            stake_height: Some(40),
            stake_timestamp: None,
            amount_staked: "2000".to_string(),
            fee: "0".to_string(),
            asset_type: "SAL".to_string(),
            change_output_key: Some("k2".to_string()),
            status: "locked".to_string(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".to_string(),
            created_at: None,
            updated_at: None,
        }).unwrap();

        // Rollback to height 20: the return at 30 is undone, the stake
        // created at 40 is dropped entirely, the stake created at 10 survives.
        db.rollback(20).unwrap();

        let early = db.get_stake("early_stake").unwrap().unwrap();
        assert_eq!(early.status, "locked");
        assert!(early.return_tx_hash.is_none());
        assert!(early.return_height.is_none());

        assert!(db.get_stake("late_stake").unwrap().is_none());
    }

    #[test]
    fn test_stake_lifecycle() {
        let db = MemoryStorage::new();
        db.put_stake(&StakeRecord {
            stake_tx_hash: "stake1".to_string(),
            stake_height: Some(100),
            stake_timestamp: None,
            amount_staked: "5000000".to_string(),
            fee: "1000".to_string(),
            asset_type: "SAL".to_string(),
            change_output_key: Some("changekey".to_string()),
            status: "locked".to_string(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".to_string(),
            created_at: None,
            updated_at: None,
        }).unwrap();

        assert!(db.get_stakes(Some("locked"), None).unwrap().len() == 1);
        db.mark_stake_returned("stake1", "return1", 200, 12345, "5000000").unwrap();
        let s = db.get_stake("stake1").unwrap().unwrap();
        assert_eq!(s.status, "returned");
        assert_eq!(s.return_tx_hash.as_deref(), Some("return1"));
    }
}
