//! Transaction scripts, sighash computation and ECDSA signing for Bitcoin SV.
//!
//! Signatures are handled in "tx format": DER followed by the sighash type byte,
//! which is what unlock scripts push.
//!
//! # Examples
//!
//! Sign a P2PKH input:
//! ```
//! use txcomposer::messages::{Tx, TxIn};
//! use txcomposer::transaction::{generate_signature, public_key, p2pkh::{create_lock_script, create_unlock_script}, sighash::{sighash, SigHashCache, DEFAULT_SIGHASH_TYPE}};
//! use txcomposer::util::hash160;
//!
//! let mut tx = Tx {
//!     inputs: vec![TxIn { ..Default::default() }],
//!     ..Default::default()
//! };
//! let private_key = [1; 32];
//! let public_key = public_key(&private_key).unwrap();
//!
//! let lock_script = create_lock_script(&hash160(&public_key));
//! let mut cache = SigHashCache::new();
//! let sighash_val = sighash(&tx, 0, &lock_script.0, 1000, DEFAULT_SIGHASH_TYPE, &mut cache).unwrap();
//! let signature = generate_signature(&private_key, &sighash_val, DEFAULT_SIGHASH_TYPE).unwrap();
//! tx.inputs[0].unlock_script = create_unlock_script(&signature, &public_key).unwrap();
//! ```
pub mod data_out;
pub mod p2pkh;
pub mod sighash;

use crate::util::{Error, Hash256, Result};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};

/// Generates DER-encoded ECDSA signature for sighash + type.
///
/// Normalizes S (low).
///
/// # Errors
/// `Error::BadData` for invalid private key.
#[inline]
pub fn generate_signature(private_key: &[u8; 32], sighash: &Hash256, sighash_type: u8) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(private_key).map_err(|_| Error::BadData("Invalid private key".to_string()))?;
    let message = Message::from_digest(sighash.0);
    let mut signature = secp.sign_ecdsa(&message, &secret_key);
    signature.normalize_s();
    let mut der = signature.serialize_der().to_vec();
    der.push(sighash_type);
    Ok(der)
}

/// Returns the 33-byte compressed public key of a private key.
///
/// # Errors
/// `Error::BadData` for invalid private key.
pub fn public_key(private_key: &[u8; 32]) -> Result<[u8; 33]> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(private_key).map_err(|_| Error::BadData("Invalid private key".to_string()))?;
    Ok(PublicKey::from_secret_key(&secp, &secret_key).serialize())
}

/// Converts a signature returned by an external signer into tx format.
///
/// Accepts a 64-byte compact signature or a DER signature, with or without a trailing
/// sighash byte; the byte is replaced by `sighash_type`. S is normalized low.
///
/// # Errors
/// `Error::BadData` if the bytes are neither compact nor DER.
pub fn to_tx_format(signature: &[u8], sighash_type: u8) -> Result<Vec<u8>> {
    let mut parsed = if signature.len() == 64 {
        Signature::from_compact(signature)
    } else {
        Signature::from_der(signature).or_else(|e| match signature.split_last() {
            Some((_, der)) => Signature::from_der(der),
            None => Err(e),
        })
    }
    .map_err(|_| Error::BadData(format!("Invalid signature: {}", hex::encode(signature))))?;
    parsed.normalize_s();
    let mut der = parsed.serialize_der().to_vec();
    der.push(sighash_type);
    Ok(der)
}

/// Verifies a tx-format signature against a public key and sighash digest.
///
/// # Errors
/// `Error::BadData` if the signature or public key cannot be parsed.
pub fn verify_signature(tx_format_sig: &[u8], public_key: &[u8], sighash: &Hash256) -> Result<bool> {
    let (_, der) = tx_format_sig
        .split_last()
        .ok_or_else(|| Error::BadData("Empty signature".to_string()))?;
    let secp = Secp256k1::verification_only();
    let signature = Signature::from_der(der).map_err(|_| Error::BadData("Invalid DER".to_string()))?;
    let public_key = PublicKey::from_slice(public_key).map_err(|_| Error::BadData("Invalid pubkey".to_string()))?;
    let message = Message::from_digest(sighash.0);
    Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}
