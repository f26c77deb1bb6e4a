//! RCT signature batch verification.
//!
//! Provides a single WASM/FFI entry point that verifies all ring signatures
//! in a transaction, avoiding N JS↔WASM boundary crossings.
//!
//! The caller passes flat byte arrays for all inputs; this module:
//! 1. Computes the pre-MLSAG message hash (matching C++ get_pre_mlsag_hash)
//! 2. For each input, constructs the signature struct with key image from prefix
//! 3. Calls tclsag_verify / clsag_verify
//! 4. Returns on first failure (with index) or success

use std::panic;

use crate::keccak256_internal;
use crate::to32;
use crate::tclsag::{TclsagSignature, tclsag_verify};
use crate::clsag::{ClsagSignature, clsag_verify};

// ─── RCT Type Constants ─────────────────────────────────────────────────────

const RCT_TYPE_CLSAG: u8 = 5;
const _RCT_TYPE_BULLETPROOF_PLUS: u8 = 6;
const _RCT_TYPE_FULL_PROOFS: u8 = 7;
const _RCT_TYPE_SALVIUM_ZERO: u8 = 8;
const RCT_TYPE_SALVIUM_ONE: u8 = 9;

// ─── Message Hash ────────────────────────────────────────────────────────────

/// Compute the pre-MLSAG/CLSAG message hash.
///
/// Matches C++ get_pre_mlsag_hash (rctSigs.cpp:794-871):
///   H(prefix_hash || H(rct_base_serialized) || H(bp_components))
pub fn compute_rct_message(
    prefix_hash: &[u8; 32],
    rct_base: &[u8],
    bp_components: &[u8],
) -> [u8; 32] {
    let h1 = keccak256_internal(rct_base);
    let h2 = keccak256_internal(bp_components);
    let mut combined = [0u8; 96];
    combined[..32].copy_from_slice(prefix_hash);
    combined[32..64].copy_from_slice(&h1);
    combined[64..96].copy_from_slice(&h2);
    keccak256_internal(&combined)
}

// ─── Batch Verification ─────────────────────────────────────────────────────

/// Verify all RCT signatures in a transaction.
///
/// Returns `(success, failed_input_index)`.
pub fn verify_rct_signatures(
    rct_type: u8,
    message: &[u8; 32],
    input_count: usize,
    ring_size: usize,
    key_images: &[[u8; 32]],
    pseudo_outs: &[[u8; 32]],
    sigs_flat: &[u8],
    ring_pubkeys: &[[u8; 32]],   // input_count * ring_size entries
    ring_commitments: &[[u8; 32]], // input_count * ring_size entries
) -> (bool, Option<u32>) {
    if input_count == 0 || ring_size == 0 {
        return (false, Some(0));
    }
    if key_images.len() < input_count || pseudo_outs.len() < input_count {
        return (false, Some(0));
    }
    if ring_pubkeys.len() < input_count * ring_size
        || ring_commitments.len() < input_count * ring_size
    {
        return (false, Some(0));
    }

    let is_tclsag = rct_type == RCT_TYPE_SALVIUM_ONE;

    // Compute expected sig size per input
    let sig_size_per_input = if is_tclsag {
        // TCLSAG: [sx_0..sx_{n-1}][sy_0..sy_{n-1}][c1][D]
        ring_size * 64 + 64
    } else {
        // CLSAG: [s_0..s_{n-1}][c1][D]
        ring_size * 32 + 64
    };

    let expected_total = input_count * sig_size_per_input;
    if sigs_flat.len() < expected_total {
        return (false, Some(0));
    }

    for i in 0..input_count {
        let sig_offset = i * sig_size_per_input;
        let sig_data = &sigs_flat[sig_offset..sig_offset + sig_size_per_input];

        // Extract ring for this input
        let ring_start = i * ring_size;
        let ring = &ring_pubkeys[ring_start..ring_start + ring_size];
        let commitments = &ring_commitments[ring_start..ring_start + ring_size];

        let valid = if is_tclsag {
            // Parse TCLSAG sig: [sx_0..sx_{n-1}][sy_0..sy_{n-1}][c1][D]
            let mut offset = 0;
            let mut sx = Vec::with_capacity(ring_size);
            for _ in 0..ring_size {
                sx.push(to32(&sig_data[offset..offset + 32]));
                offset += 32;
            }
            let mut sy = Vec::with_capacity(ring_size);
            for _ in 0..ring_size {
                sy.push(to32(&sig_data[offset..offset + 32]));
                offset += 32;
            }
            let c1 = to32(&sig_data[offset..offset + 32]);
            offset += 32;
            let commitment_image = to32(&sig_data[offset..offset + 32]);

            let sig = TclsagSignature {
                sx,
                sy,
                c1,
                key_image: key_images[i],
                commitment_image,
            };
            tclsag_verify(message, &sig, ring, commitments, &pseudo_outs[i])
        } else {
            // Parse CLSAG sig: [s_0..s_{n-1}][c1][D]
            let mut offset = 0;
            let mut s = Vec::with_capacity(ring_size);
            for _ in 0..ring_size {
                s.push(to32(&sig_data[offset..offset + 32]));
                offset += 32;
            }
            let c1 = to32(&sig_data[offset..offset + 32]);
            offset += 32;
            let commitment_image = to32(&sig_data[offset..offset + 32]);

            let sig = ClsagSignature {
                s,
                c1,
                key_image: key_images[i],
                commitment_image,
            };
            clsag_verify(message, &sig, ring, commitments, &pseudo_outs[i])
        };

        if !valid {
            return (false, Some(i as u32));
        }
    }

    (true, None)
}

// ─── WASM Binding ───────────────────────────────────────────────────────────

/// Batch-verify all RCT signatures in a transaction.
///
/// All data is passed as flat byte arrays to minimize JS↔WASM boundary crossings.
///
/// Sig flat format (no I field — key images passed separately):
/// - TCLSAG (type 9), per input: `[sx_0..sx_{n-1} (32B)][sy_0..sy_{n-1} (32B)][c1 (32B)][D (32B)]`
///   Size per input: `ring_size * 64 + 64`
/// - CLSAG (types 5-8), per input: `[s_0..s_{n-1} (32B)][c1 (32B)][D (32B)]`
///   Size per input: `ring_size * 32 + 64`
///
/// Returns:
/// - `[0x01]` if all signatures valid
/// - `[0x00, idx_u32_le]` if signature at index `idx` is invalid
/// - `[0xFF]` if input data is malformed
pub fn verify_rct_signatures_wasm(
    rct_type: u8,
    input_count: u32,
    ring_size: u32,
    tx_prefix_hash: &[u8],       // 32 bytes
    rct_base_bytes: &[u8],       // Serialized rctSigBase (variable)
    bp_components: &[u8],        // Concatenated BP+ fields (variable)
    key_images_flat: &[u8],      // input_count * 32 bytes
    pseudo_outs_flat: &[u8],     // input_count * 32 bytes
    sigs_flat: &[u8],            // Packed sig data (format per rct_type)
    ring_pubkeys_flat: &[u8],    // input_count * ring_size * 32 bytes
    ring_commitments_flat: &[u8], // input_count * ring_size * 32 bytes
) -> Vec<u8> {
    let ic = input_count as usize;
    let rs = ring_size as usize;

    // Validate input lengths
    if tx_prefix_hash.len() < 32 {
        return vec![0xFF];
    }
    if key_images_flat.len() < ic * 32
        || pseudo_outs_flat.len() < ic * 32
        || ring_pubkeys_flat.len() < ic * rs * 32
        || ring_commitments_flat.len() < ic * rs * 32
    {
        return vec![0xFF];
    }

    // Parse prefix hash
    let prefix_hash = to32(tx_prefix_hash);

    // Compute message
    let message = compute_rct_message(&prefix_hash, rct_base_bytes, bp_components);

    // Parse flat arrays into [u8; 32] slices
    let key_images: Vec<[u8; 32]> = (0..ic)
        .map(|i| to32(&key_images_flat[i * 32..(i + 1) * 32]))
        .collect();
    let pseudo_outs: Vec<[u8; 32]> = (0..ic)
        .map(|i| to32(&pseudo_outs_flat[i * 32..(i + 1) * 32]))
        .collect();
    let total_ring = ic * rs;
    let ring_pubkeys: Vec<[u8; 32]> = (0..total_ring)
        .map(|i| to32(&ring_pubkeys_flat[i * 32..(i + 1) * 32]))
        .collect();
    let ring_commitments: Vec<[u8; 32]> = (0..total_ring)
        .map(|i| to32(&ring_commitments_flat[i * 32..(i + 1) * 32]))
        .collect();

    // Catch panics from invalid curve points (decompress failures)
    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        verify_rct_signatures(
            rct_type,
            &message,
            ic,
            rs,
            &key_images,
            &pseudo_outs,
            sigs_flat,
            &ring_pubkeys,
            &ring_commitments,
        )
    }));

    match result {
        Ok((true, _)) => vec![0x01],
        Ok((false, Some(idx))) => {
            let mut buf = vec![0x00, 0, 0, 0, 0];
            buf[1..5].copy_from_slice(&idx.to_le_bytes());
            buf
        }
        Ok((false, None)) => vec![0xFF],
        Err(_) => vec![0xFF], // Panic (invalid point, etc.)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
