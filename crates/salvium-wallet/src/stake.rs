//! Stake lifecycle tracking.
//!
//! STAKE -> PROTOCOL-return -> reorg-rollback lifecycles are recorded through
//! [`crate::storage::StorageBackend`]'s stake methods, the same persistence
//! boundary every other scanned entity (outputs, transactions, sync height)
//! goes through. This module holds the pure JSON-extraction helper and the
//! lifecycle-matching logic that decides what to write; it owns no state of
//! its own.

use crate::storage::{StakeRecord, StorageBackend};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Transaction type value for a STAKE transaction.
pub const TX_TYPE_STAKE: u32 = 6;

/// Transaction type value for a PROTOCOL (return) transaction.
pub const TX_TYPE_PROTOCOL: u32 = 7;

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Extract the `return_pubkey` from a transaction JSON blob.
///
/// CARROT path:  `prefix.protocol_tx_data.return_pubkey`
/// Pre-CARROT:   `prefix.return_pubkey`
///
/// Returns `None` when neither path yields a string value.
pub fn extract_return_pubkey(tx_json: &serde_json::Value) -> Option<String> {
    // Try the CARROT path first (preferred).
    let prefix = tx_json.get("prefix");

    if let Some(prefix) = prefix {
        // CARROT: prefix.protocol_tx_data.return_pubkey
        if let Some(ptd) = prefix.get("protocol_tx_data") {
            if let Some(rp) = ptd.get("return_pubkey") {
                if let Some(s) = rp.as_str() {
                    if !s.is_empty() {
                        return Some(s.to_string());
                    }
                }
            }
        }

        // Pre-CARROT: prefix.return_pubkey
        if let Some(rp) = prefix.get("return_pubkey") {
            if let Some(s) = rp.as_str() {
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            }
        }
    }

    // Fallback: top-level return_pubkey (no prefix wrapper).
    if let Some(rp) = tx_json.get("return_pubkey") {
        if let Some(s) = rp.as_str() {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }

    None
}

/// Record or update stake lifecycle state from a scanned transaction.
///
/// * `tx_type == TX_TYPE_STAKE` (6) — create a new locked [`StakeRecord`]
///   via [`StorageBackend::put_stake`].
/// * `tx_type == TX_TYPE_PROTOCOL` (7) — try to match via
///   `return_origin_key` (CARROT) or `output_key` (pre-CARROT) against
///   [`StorageBackend::get_stake_by_output_key`] and call
///   [`StorageBackend::mark_stake_returned`].
///
/// `owned_output_keys` is a list of `(output_public_key, return_origin_key,
/// amount)` triples for outputs that belong to this wallet.
///
/// `is_our_stake` should be `true` when the wallet spent inputs in a STAKE
/// transaction (i.e. it was **our** stake, not someone else's).
#[allow(clippy::too_many_arguments)]
pub fn record_stake_lifecycle(
    db: &dyn StorageBackend,
    tx_json: &serde_json::Value,
    tx_hash: &str,
    block_height: u64,
    tx_type: u32,
    amount_staked: u64,
    fee: u64,
    asset_type: &str,
    is_our_stake: bool,
    owned_output_keys: &[(String, Option<String>, u64)],
) {
    match tx_type {
        TX_TYPE_STAKE => {
            if !is_our_stake {
                return;
            }

            // Determine the output key to use for matching returns later.
            let return_pubkey = extract_return_pubkey(tx_json);
            let change_output_key = return_pubkey
                .or_else(|| owned_output_keys.first().map(|(pk, _, _)| pk.clone()));

            let record = StakeRecord {
                stake_tx_hash: tx_hash.to_string(),
                stake_height: Some(block_height as i64),
                stake_timestamp: None,
                amount_staked: amount_staked.to_string(),
                fee: fee.to_string(),
                asset_type: asset_type.to_string(),
                change_output_key,
                status: "locked".to_string(),
                return_tx_hash: None,
                return_height: None,
                return_timestamp: None,
                return_amount: "0".to_string(),
                created_at: None,
                updated_at: None,
            };
            let _ = db.put_stake(&record);
        }
        TX_TYPE_PROTOCOL => {
            // Try to match each owned output to an existing locked stake.
            for (pub_key, return_origin, amount) in owned_output_keys {
                // CARROT path: returnOriginKey -> stake.change_output_key
                if let Some(origin) = return_origin {
                    if let Ok(Some(stake)) = db.get_stake_by_output_key(origin) {
                        if stake.status == "locked" {
                            let _ = db.mark_stake_returned(
                                &stake.stake_tx_hash,
                                tx_hash,
                                block_height as i64,
                                0,
                                &amount.to_string(),
                            );
                            continue;
                        }
                    }
                }

                // Pre-CARROT path: output public key == stake.change_output_key
                if let Ok(Some(stake)) = db.get_stake_by_output_key(pub_key) {
                    if stake.status == "locked" {
                        let _ = db.mark_stake_returned(
                            &stake.stake_tx_hash,
                            tx_hash,
                            block_height as i64,
                            0,
                            &amount.to_string(),
                        );
                    }
                }
            }
        }
        _ => {
            // Other transaction types are not relevant to stake tracking.
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    // -- extract_return_pubkey ----------------------------------------------

    #[test]
    fn extract_return_pubkey_carrot_format() {
        let tx = json!({
            "prefix": {
                "protocol_tx_data": {
                    "return_pubkey": "aabbccdd"
                }
            }
        });
        assert_eq!(extract_return_pubkey(&tx), Some("aabbccdd".into()));
    }

    #[test]
    fn extract_return_pubkey_pre_carrot_format() {
        let tx = json!({
            "prefix": {
                "return_pubkey": "11223344"
            }
        });
        assert_eq!(extract_return_pubkey(&tx), Some("11223344".into()));
    }

    #[test]
    fn extract_return_pubkey_prefers_protocol_tx_data() {
        let tx = json!({
            "prefix": {
                "return_pubkey": "fallback",
                "protocol_tx_data": {
                    "return_pubkey": "preferred"
                }
            }
        });
        assert_eq!(extract_return_pubkey(&tx), Some("preferred".into()));
    }

    #[test]
    fn extract_return_pubkey_missing_data_returns_none() {
        let tx = json!({ "prefix": {} });
        assert_eq!(extract_return_pubkey(&tx), None);
    }

    #[test]
    fn extract_return_pubkey_no_prefix_wrapper() {
        let tx = json!({ "return_pubkey": "direct_key" });
        assert_eq!(extract_return_pubkey(&tx), Some("direct_key".into()));
    }

    // -- record_stake_lifecycle: STAKE transaction --------------------------

    #[test]
    fn record_lifecycle_stake_transaction() {
        let db = MemoryStorage::new();
        let tx = json!({
            "prefix": {
                "return_pubkey": "return_pubkey_hex"
            }
        });

        record_stake_lifecycle(
            &db,
            &tx,
            "stake_hash_1",
            417_082,
            TX_TYPE_STAKE,
            130_130_000_000_000,
            50_000_000,
            "SAL",
            true,
            &[("change_pubkey".into(), None, 0)],
        );

        let stake = db.get_stake("stake_hash_1").unwrap().unwrap();
        assert_eq!(stake.stake_tx_hash, "stake_hash_1");
        assert_eq!(stake.stake_height, Some(417_082));
        assert_eq!(stake.amount_staked, "130130000000000");
        assert_eq!(stake.fee, "50000000");
        assert_eq!(stake.asset_type, "SAL");
        assert_eq!(stake.change_output_key.as_deref(), Some("return_pubkey_hex"));
        assert_eq!(stake.status, "locked");
    }

    #[test]
    fn record_lifecycle_stake_falls_back_to_change_output_key() {
        let db = MemoryStorage::new();
        let tx = json!({ "prefix": {} }); // No return_pubkey

        record_stake_lifecycle(
            &db,
            &tx,
            "st_fallback",
            100,
            TX_TYPE_STAKE,
            1000,
            10,
            "SAL",
            true,
            &[("fallback_pk".into(), None, 0)],
        );

        let stake = db.get_stake("st_fallback").unwrap().unwrap();
        assert_eq!(stake.change_output_key.as_deref(), Some("fallback_pk"));
    }

    #[test]
    fn record_lifecycle_stake_not_ours_is_ignored() {
        let db = MemoryStorage::new();
        let tx = json!({ "prefix": {} });

        record_stake_lifecycle(
            &db,
            &tx,
            "st_other",
            100,
            TX_TYPE_STAKE,
            1000,
            10,
            "SAL",
            false, // not our stake
            &[],
        );

        assert!(db.get_stake("st_other").unwrap().is_none());
    }

    // -- record_stake_lifecycle: PROTOCOL return matching --------------------

    #[test]
    fn record_lifecycle_protocol_carrot_return_matching() {
        let db = MemoryStorage::new();
        db.put_stake(&StakeRecord {
            stake_tx_hash: "orig_stake".into(),
            stake_height: Some(100),
            stake_timestamp: None,
            amount_staked: "50000000000".into(),
            fee: "0".into(),
            asset_type: "SAL".into(),
            change_output_key: Some("carrot_origin_key".into()),
            status: "locked".into(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".into(),
            created_at: None,
            updated_at: None,
        })
        .unwrap();

        let tx = json!({ "prefix": {} });

        // The owned output has a return_origin_key that matches.
        record_stake_lifecycle(
            &db,
            &tx,
            "prot_tx_1",
            200,
            TX_TYPE_PROTOCOL,
            0,
            0,
            "SAL",
            false,
            &[("some_different_key".into(), Some("carrot_origin_key".into()), 51_000_000_000)],
        );

        let stake = db.get_stake("orig_stake").unwrap().unwrap();
        assert_eq!(stake.status, "returned");
        assert_eq!(stake.return_tx_hash.as_deref(), Some("prot_tx_1"));
        assert_eq!(stake.return_height, Some(200));
        assert_eq!(stake.return_amount, "51000000000");
    }

    #[test]
    fn record_lifecycle_protocol_pre_carrot_return_matching() {
        let db = MemoryStorage::new();
        db.put_stake(&StakeRecord {
            stake_tx_hash: "precarrot_stake".into(),
            stake_height: Some(50),
            stake_timestamp: None,
            amount_staked: "30000000000".into(),
            fee: "0".into(),
            asset_type: "SAL".into(),
            change_output_key: Some("matching_pubkey".into()),
            status: "locked".into(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".into(),
            created_at: None,
            updated_at: None,
        })
        .unwrap();

        let tx = json!({ "prefix": {} });

        // No return_origin_key — pre-CARROT path: pub key == change_output_key.
        record_stake_lifecycle(
            &db,
            &tx,
            "prot_tx_2",
            150,
            TX_TYPE_PROTOCOL,
            0,
            0,
            "SAL",
            false,
            &[("matching_pubkey".into(), None, 31_000_000_000)],
        );

        let stake = db.get_stake("precarrot_stake").unwrap().unwrap();
        assert_eq!(stake.status, "returned");
        assert_eq!(stake.return_tx_hash.as_deref(), Some("prot_tx_2"));
        assert_eq!(stake.return_height, Some(150));
        assert_eq!(stake.return_amount, "31000000000");
    }

    #[test]
    fn record_lifecycle_protocol_nonmatching_does_not_update() {
        let db = MemoryStorage::new();
        db.put_stake(&StakeRecord {
            stake_tx_hash: "untouched_stake".into(),
            stake_height: Some(100),
            stake_timestamp: None,
            amount_staked: "10000".into(),
            fee: "0".into(),
            asset_type: "SAL".into(),
            change_output_key: Some("specific_key".into()),
            status: "locked".into(),
            return_tx_hash: None,
            return_height: None,
            return_timestamp: None,
            return_amount: "0".into(),
            created_at: None,
            updated_at: None,
        })
        .unwrap();

        let tx = json!({ "prefix": {} });

        record_stake_lifecycle(
            &db,
            &tx,
            "prot_nm",
            200,
            TX_TYPE_PROTOCOL,
            0,
            0,
            "SAL",
            false,
            &[("different_key".into(), None, 5000)],
        );

        let stake = db.get_stake("untouched_stake").unwrap().unwrap();
        assert_eq!(stake.status, "locked");
        assert!(stake.return_tx_hash.is_none());
    }

    #[test]
    fn record_lifecycle_non_stake_non_protocol_ignored() {
        let db = MemoryStorage::new();
        let tx = json!({ "prefix": {} });

        record_stake_lifecycle(
            &db,
            &tx,
            "transfer_tx",
            100,
            0, // TRANSFER
            0,
            0,
            "SAL",
            true,
            &[("pk_t".into(), None, 1000)],
        );

        assert_eq!(db.get_stakes(None, None).unwrap().len(), 0);
    }

    // -- Full lifecycle: STAKE -> PROTOCOL return -> reorg rollback ----------

    #[test]
    fn full_lifecycle_stake_return_reorg() {
        let db = MemoryStorage::new();

        // Step 1: User creates a STAKE.
        let stake_tx = json!({
            "prefix": {
                "protocol_tx_data": {
                    "return_pubkey": "aabbccddeeff"
                }
            }
        });

        record_stake_lifecycle(
            &db,
            &stake_tx,
            "lifecycle_stake",
            1000,
            TX_TYPE_STAKE,
            100_000_000_000_000,
            50_000_000,
            "SAL",
            true,
            &[("lifecycle_change_key".into(), None, 0)],
        );

        let stake = db.get_stake("lifecycle_stake").unwrap().unwrap();
        assert_eq!(stake.status, "locked");
        assert_eq!(stake.amount_staked, "100000000000000");
        assert_eq!(stake.change_output_key.as_deref(), Some("aabbccddeeff"));

        // Step 2: PROTOCOL tx returns the stake (pre-CARROT path: pub key match).
        let prot_tx = json!({ "prefix": {} });

        record_stake_lifecycle(
            &db,
            &prot_tx,
            "lifecycle_return",
            1100,
            TX_TYPE_PROTOCOL,
            0,
            0,
            "SAL",
            false,
            &[("aabbccddeeff".into(), None, 101_000_000_000_000)],
        );

        let stake = db.get_stake("lifecycle_stake").unwrap().unwrap();
        assert_eq!(stake.status, "returned");
        assert_eq!(stake.return_tx_hash.as_deref(), Some("lifecycle_return"));
        assert_eq!(stake.return_height, Some(1100));
        assert_eq!(stake.return_amount, "101000000000000");

        // Step 3: Reorg to height 1050 undoes the return.
        db.rollback(1050).unwrap();

        let stake = db.get_stake("lifecycle_stake").unwrap().unwrap();
        assert_eq!(stake.status, "locked");
        assert!(stake.return_tx_hash.is_none());
        assert!(stake.return_height.is_none());

        // Stake itself (at height 1000) survives.
        assert_eq!(stake.stake_height, Some(1000));
        assert_eq!(stake.amount_staked, "100000000000000");
    }

    // -- Reorg above stake height removes the stake entirely ----------------

    #[test]
    fn reorg_above_stake_height_removes_stake() {
        let db = MemoryStorage::new();
        let tx = json!({ "prefix": { "return_pubkey": "reorg_key" } });

        record_stake_lifecycle(
            &db,
            &tx,
            "reorg_stake",
            500,
            TX_TYPE_STAKE,
            1000,
            10,
            "SAL",
            true,
            &[("pk_r".into(), None, 0)],
        );

        assert!(db.get_stake("reorg_stake").unwrap().is_some());

        // Reorg to height 400 — stake at 500 should be removed.
        db.rollback(400).unwrap();

        assert!(db.get_stake("reorg_stake").unwrap().is_none());
        assert!(db.get_stake_by_output_key("reorg_key").unwrap().is_none());
    }
}
