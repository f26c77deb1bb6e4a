use tiny_keccak::{Hasher, Keccak};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;

pub mod elligator2;
pub mod x25519;
pub mod subaddress;
pub mod carrot_keys;
pub mod cn_scan;
pub mod carrot_scan;
pub mod clsag;
pub mod tclsag;
pub mod bulletproofs_plus;
pub mod rct_verify;
pub mod tx_constants;
pub mod tx_format;
pub mod tx_parse;
pub mod tx_serialize;

pub use x25519::edwards_to_montgomery_u;

/// Monero/CryptoNote-compatible secondary generator H = hash_to_point(G),
/// precomputed so every caller agrees on the same point.
pub(crate) const H_POINT_BYTES: [u8; 32] = [
    0x8b, 0x65, 0x59, 0x70, 0x15, 0x37, 0x99, 0xaf,
    0x2a, 0xea, 0xdc, 0x9f, 0xf1, 0xad, 0xd0, 0xea,
    0x6c, 0x72, 0x51, 0xd5, 0x41, 0x54, 0xcf, 0xa9,
    0x2c, 0x17, 0x3a, 0x0d, 0xd3, 0x9c, 0x1f, 0x94,
];

/// Keccak-256 hash (CryptoNote variant with 0x01 padding, NOT SHA3)
/// Matches Salvium C++ cn_fast_hash / keccak()
pub fn keccak256(data: &[u8]) -> Vec<u8> {
    keccak256_internal(data).to_vec()
}

pub(crate) fn keccak256_internal(data: &[u8]) -> [u8; 32] {
    let mut keccak = Keccak::v256();
    let mut output = [0u8; 32];
    keccak.update(data);
    keccak.finalize(&mut output);
    output
}

/// SHA-256, used alongside keccak256 where the wire format calls for it.
pub fn sha256(data: &[u8]) -> Vec<u8> {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).to_vec()
}

/// Blake2b with variable output length (unkeyed)
/// Matches Salvium C++ blake2b(out, outLen, data, dataLen, NULL, 0)
pub fn blake2b_hash(data: &[u8], out_len: usize) -> Vec<u8> {
    blake2b_simd::Params::new()
        .hash_length(out_len)
        .hash(data)
        .as_bytes()
        .to_vec()
}

/// Blake2b with key (keyed variant per RFC 7693)
/// Matches Salvium C++ blake2b(out, outLen, data, dataLen, key, keyLen)
/// Used by CARROT protocol for domain-separated hashing
pub fn blake2b_keyed(data: &[u8], out_len: usize, key: &[u8]) -> Vec<u8> {
    blake2b_simd::Params::new()
        .hash_length(out_len)
        .key(key)
        .hash(data)
        .as_bytes()
        .to_vec()
}

// ─── Helpers ────────────────────────────────────────────────────────────────

pub(crate) fn to32(s: &[u8]) -> [u8; 32] {
    let mut buf = [0u8; 32];
    let len = s.len().min(32);
    buf[..len].copy_from_slice(&s[..len]);
    buf
}

pub(crate) fn to64(s: &[u8]) -> [u8; 64] {
    let mut buf = [0u8; 64];
    let len = s.len().min(64);
    buf[..len].copy_from_slice(&s[..len]);
    buf
}

// ─── Scalar Operations (mod L) ─────────────────────────────────────────────

pub fn sc_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    (sa + sb).to_bytes().to_vec()
}

pub fn sc_sub(a: &[u8], b: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    (sa - sb).to_bytes().to_vec()
}

pub fn sc_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    (sa * sb).to_bytes().to_vec()
}

pub fn sc_mul_add(a: &[u8], b: &[u8], c: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    let sc = Scalar::from_bytes_mod_order(to32(c));
    (sa * sb + sc).to_bytes().to_vec()
}

pub fn sc_mul_sub(a: &[u8], b: &[u8], c: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    let sc = Scalar::from_bytes_mod_order(to32(c));
    (sc - sa * sb).to_bytes().to_vec()
}

pub fn sc_reduce32(s: &[u8]) -> Vec<u8> {
    Scalar::from_bytes_mod_order(to32(s)).to_bytes().to_vec()
}

pub fn sc_reduce64(s: &[u8]) -> Vec<u8> {
    Scalar::from_bytes_mod_order_wide(&to64(s)).to_bytes().to_vec()
}

pub fn sc_invert(a: &[u8]) -> Vec<u8> {
    Scalar::from_bytes_mod_order(to32(a)).invert().to_bytes().to_vec()
}

pub fn sc_check(s: &[u8]) -> bool {
    bool::from(Scalar::from_canonical_bytes(to32(s)).is_some())
}

pub fn sc_is_zero(s: &[u8]) -> bool {
    Scalar::from_bytes_mod_order(to32(s)) == Scalar::ZERO
}

// ─── Point Operations (compressed Edwards) ──────────────────────────────────

pub fn scalar_mult_base(s: &[u8]) -> Vec<u8> {
    let scalar = Scalar::from_bytes_mod_order(to32(s));
    (ED25519_BASEPOINT_TABLE * &scalar).compress().to_bytes().to_vec()
}

pub fn scalar_mult_point(s: &[u8], p: &[u8]) -> Vec<u8> {
    let scalar = Scalar::from_bytes_mod_order(to32(s));
    let point = CompressedEdwardsY(to32(p)).decompress().expect("invalid point");
    // s touches secret key material — constant-time variable-base mul.
    (point * scalar).compress().to_bytes().to_vec()
}

pub fn point_add_compressed(p: &[u8], q: &[u8]) -> Vec<u8> {
    let pp = CompressedEdwardsY(to32(p)).decompress().expect("invalid point p");
    let qq = CompressedEdwardsY(to32(q)).decompress().expect("invalid point q");
    (pp + qq).compress().to_bytes().to_vec()
}

pub fn point_sub_compressed(p: &[u8], q: &[u8]) -> Vec<u8> {
    let pp = CompressedEdwardsY(to32(p)).decompress().expect("invalid point p");
    let qq = CompressedEdwardsY(to32(q)).decompress().expect("invalid point q");
    (pp - qq).compress().to_bytes().to_vec()
}

pub fn point_negate(p: &[u8]) -> Vec<u8> {
    let pp = CompressedEdwardsY(to32(p)).decompress().expect("invalid point");
    (-pp).compress().to_bytes().to_vec()
}

pub fn double_scalar_mult_base(a: &[u8], p: &[u8], b: &[u8]) -> Vec<u8> {
    let sa = Scalar::from_bytes_mod_order(to32(a));
    let sb = Scalar::from_bytes_mod_order(to32(b));
    let pp = CompressedEdwardsY(to32(p)).decompress().expect("invalid point");
    // a and b touch secret key material — constant-time: a*P + b*G.
    (pp * sa + ED25519_BASEPOINT_TABLE * &sb).compress().to_bytes().to_vec()
}

// ─── Hash-to-Point & Key Derivation ─────────────────────────────────────────

/// H_p(data) = 8 * elligator2(keccak256(data)), compressed.
/// Must match CryptoNote ge_fromfe_frombytes_vartime bit-for-bit.
pub fn hash_to_point(data: &[u8]) -> Vec<u8> {
    let hash = keccak256_internal(data);
    let point = elligator2::ge_fromfe_frombytes_vartime(&hash);
    let t = point + point; // 2P
    let t = t + t;         // 4P
    (t + t).compress().to_bytes().to_vec() // 8P
}

fn encode_varint_u32(mut val: u32, buf: &mut Vec<u8>) {
    loop {
        let byte = (val & 0x7f) as u8;
        val >>= 7;
        if val == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// H_s(derivation || varint(output_index)) — the scalar used to derive a
/// one-time output's public/secret key and its shared secret.
pub(crate) fn derivation_to_scalar(derivation: &[u8; 32], output_index: u32) -> Scalar {
    let mut buf = Vec::with_capacity(40);
    buf.extend_from_slice(derivation);
    encode_varint_u32(output_index, &mut buf);
    Scalar::from_bytes_mod_order(keccak256_internal(&buf))
}

/// Bytes form of [`derivation_to_scalar`], for callers outside the crate.
pub fn derivation_to_scalar_bytes(derivation: &[u8], output_index: u32) -> Vec<u8> {
    derivation_to_scalar(&to32(derivation), output_index).to_bytes().to_vec()
}

/// Key derivation: D = 8 * (sec_key * pub_key).
pub fn generate_key_derivation(pub_key: &[u8], sec_key: &[u8]) -> Vec<u8> {
    let sk = Scalar::from_bytes_mod_order(to32(sec_key));
    let pk = CompressedEdwardsY(to32(pub_key)).decompress().expect("invalid point");
    let shared = sk * pk;
    let t = shared + shared; // 2P
    let t = t + t;           // 4P
    (t + t).compress().to_bytes().to_vec() // 8P
}

/// One-time output public key: Ko = base_pub + H_s(D || index) * G.
pub fn derive_public_key(derivation: &[u8], output_index: u32, base_pub: &[u8]) -> Vec<u8> {
    let scalar = derivation_to_scalar(&to32(derivation), output_index);
    let base = CompressedEdwardsY(to32(base_pub)).decompress().expect("invalid point");
    (base + ED25519_BASEPOINT_TABLE * &scalar).compress().to_bytes().to_vec()
}

/// One-time output secret key: ko = base_sec + H_s(D || index).
pub fn derive_secret_key(derivation: &[u8], output_index: u32, base_sec: &[u8]) -> Vec<u8> {
    let scalar = derivation_to_scalar(&to32(derivation), output_index);
    let base = Scalar::from_bytes_mod_order(to32(base_sec));
    (base + scalar).to_bytes().to_vec()
}

/// Key image: KI = sec_key * H_p(pub_key).
pub fn generate_key_image(pub_key: &[u8], sec_key: &[u8]) -> Vec<u8> {
    let sk = Scalar::from_bytes_mod_order(to32(sec_key));
    let hash = keccak256_internal(pub_key);
    let point = elligator2::ge_fromfe_frombytes_vartime(&hash);
    let t = point + point;
    let hp = t + t + t + t; // 8P
    // sk is the output secret key — constant-time variable-base mul.
    (hp * sk).compress().to_bytes().to_vec()
}

// ─── Pedersen Commitments ───────────────────────────────────────────────────

/// pedersen_commit(amount, mask) = mask*G + amount*H
pub fn pedersen_commit(amount: &[u8], mask: &[u8]) -> Vec<u8> {
    let a = Scalar::from_bytes_mod_order(to32(amount));
    let m = Scalar::from_bytes_mod_order(to32(mask));
    let h = CompressedEdwardsY(H_POINT_BYTES).decompress().expect("invalid H point");
    // mask and amount are commitment secrets — constant-time: m*G + a*H.
    (ED25519_BASEPOINT_TABLE * &m + h * a).compress().to_bytes().to_vec()
}

/// zero_commit(amount) = pedersen_commit(amount, 1)
pub fn zero_commit(amount: &[u8]) -> Vec<u8> {
    let mut one = [0u8; 32];
    one[0] = 1;
    pedersen_commit(amount, &one)
}

/// Deterministic commitment mask: scReduce32(keccak256("commitment_mask" || shared_secret))
pub fn gen_commitment_mask(shared_secret: &[u8]) -> Vec<u8> {
    cn_scan::gen_commitment_mask(&to32(shared_secret)).to_vec()
}

// ─── X25519 (CARROT) ────────────────────────────────────────────────────────

/// X25519 scalar multiplication with Salvium's non-standard clamping: only
/// bit 255 of the scalar is cleared. Bits 0-2 are left untouched and bit 254
/// is not set, which deviates from RFC 7748 but is required for interop.
pub fn x25519_scalar_mult(scalar: &[u8], u_coord: &[u8]) -> Vec<u8> {
    let mut clamped = to32(scalar);
    clamped[31] &= 0x7F;
    x25519::montgomery_ladder(&clamped, &to32(u_coord)).to_vec()
}

// ─── CARROT Input Context ───────────────────────────────────────────────────

/// Input context for a RingCT transaction: 'R' || first_key_image (33 bytes).
pub fn make_input_context_rct(first_key_image: &[u8; 32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(33);
    out.push(b'R');
    out.extend_from_slice(first_key_image);
    out
}

/// Input context for a coinbase transaction: 'C' || height_le(8) || zeros(24).
pub fn make_input_context_coinbase(block_height: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(33);
    out.push(b'C');
    out.extend_from_slice(&block_height.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out
}

// ─── Transaction Parsing / Serialization ────────────────────────────────────

/// Parse a binary block blob into its JSON representation. Returns an empty
/// string on malformed input rather than aborting the caller's scan.
pub fn parse_block_bytes(data: &[u8]) -> String {
    tx_parse::parse_block(data).unwrap_or_default()
}

/// Parse a binary transaction blob into its JSON representation. Returns an
/// empty string on malformed input rather than aborting the caller's scan.
pub fn parse_transaction_bytes(data: &[u8]) -> String {
    tx_parse::parse_transaction(data).unwrap_or_default()
}

/// Serialize a transaction's JSON representation back to wire bytes. Returns
/// an empty vec on malformed/incomplete JSON.
pub fn serialize_transaction_json(json_str: &str) -> Vec<u8> {
    tx_serialize::serialize_transaction(json_str).unwrap_or_default()
}
