//! Pay-to-Public-Key-Hash (P2PKH) transaction scripts for Bitcoin SV.
//!
//! Standard for "sending to an address"; creates/checks lock/unlock scripts.
use crate::script::op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160, OP_PUSH};
use crate::script::{next_op, Script};
use crate::util::{Error, Hash160, Result};

/// Size of a P2PKH lock script in bytes.
pub const LOCK_SCRIPT_SIZE: usize = 25;

/// Creates P2PKH lock script (DUP HASH160 [hash] EQUALVERIFY CHECKSIG).
#[must_use]
#[inline]
pub fn create_lock_script(address: &Hash160) -> Script {
    let mut script = Script::new();
    script.append(OP_DUP);
    script.append(OP_HASH160);
    script.append(OP_PUSH + 20);
    script.append_slice(&address.0);
    script.append(OP_EQUALVERIFY);
    script.append(OP_CHECKSIG);
    script
}

/// Creates P2PKH unlock script (push sig + pubkey).
///
/// # Errors
/// `Error::BadArgument` if either push is too long to encode.
#[inline]
pub fn create_unlock_script(sig: &[u8], public_key: &[u8]) -> Result<Script> {
    let mut script = Script::new();
    script.append_data(sig)?;
    script.append_data(public_key)?;
    Ok(script)
}

/// Checks if script is P2PKH lock (len=25, ops match).
#[must_use]
#[inline]
pub fn check_lock_script(lock_script: &[u8]) -> bool {
    lock_script.len() == LOCK_SCRIPT_SIZE
        && lock_script[0] == OP_DUP
        && lock_script[1] == OP_HASH160
        && lock_script[2] == OP_PUSH + 20
        && lock_script[23] == OP_EQUALVERIFY
        && lock_script[24] == OP_CHECKSIG
}

/// Checks if script is P2PKH unlock (sig push 9-73B + pubkey 33/65B).
#[must_use]
#[inline]
pub fn check_unlock_script(unlock_script: &[u8]) -> bool {
    if unlock_script.is_empty() {
        return false;
    }
    let sig_len = unlock_script[0];
    if sig_len < OP_PUSH + 9 || sig_len > OP_PUSH + 73 {
        return false;
    }
    let i = next_op(0, unlock_script);
    if i >= unlock_script.len() {
        return false;
    }
    let pk_len = unlock_script[i];
    if pk_len != OP_PUSH + 33 && pk_len != OP_PUSH + 65 {
        return false;
    }
    next_op(i, unlock_script) == unlock_script.len() && i + 1 + pk_len as usize == unlock_script.len()
}

/// Checks if P2PKH lock matches hash160.
#[must_use]
#[inline]
pub fn check_lock_script_addr(hash160: &Hash160, lock_script: &[u8]) -> bool {
    check_lock_script(lock_script) && lock_script[3..23] == hash160.0
}

/// Extracts the tx-format signature from a P2PKH unlock.
///
/// # Errors
/// `Error::BadData` if not a P2PKH unlock script.
pub fn extract_signature(unlock_script: &[u8]) -> Result<Vec<u8>> {
    if !check_unlock_script(unlock_script) {
        return Err(Error::BadData("Not P2PKH unlock".to_string()));
    }
    let i = next_op(0, unlock_script);
    Ok(unlock_script[1..i].to_vec())
}

/// Extracts pubkey from P2PKH unlock.
///
/// # Errors
/// `Error::BadData` if not a P2PKH unlock script.
pub fn extract_pubkey(unlock_script: &[u8]) -> Result<Vec<u8>> {
    if !check_unlock_script(unlock_script) {
        return Err(Error::BadData("Not P2PKH unlock".to_string()));
    }
    let i = next_op(0, unlock_script);
    Ok(unlock_script[i + 1..].to_vec())
}

/// Extracts hash160 from P2PKH lock.
///
/// # Errors
/// `Error::BadData` if not a P2PKH lock script.
pub fn extract_pubkeyhash(lock_script: &[u8]) -> Result<Hash160> {
    if !check_lock_script(lock_script) {
        return Err(Error::BadData("Not P2PKH lock".to_string()));
    }
    let mut hash160 = Hash160([0; 20]);
    hash160.0.copy_from_slice(&lock_script[3..23]);
    Ok(hash160)
}
