//! Transaction sighash computation for signing in Bitcoin SV.
//!
//! Supports legacy (pre-2017) and BIP-143 (post-fork with forkid) algorithms.
//! The serialized preimage is exposed as well as its digest, so that signers outside
//! this process can check exactly what they commit to.
//! Cache intermediates when signing several inputs of one transaction.
use crate::messages::{Tx, TxOut};
use crate::script::{next_op, op_codes::OP_CODESEPARATOR, Script};
use crate::util::{sha256d, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, WriteBytesExt};

const FORK_ID: u32 = 0; // 24-bit BSV fork ID

/// Signs all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs (anyone spend).
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only matching output.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Anyone can add inputs.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;
/// BSV/BCH fork flag (post-2017).
pub const SIGHASH_FORKID: u8 = 0x40;
/// Sighash type used when the caller does not pick one.
pub const DEFAULT_SIGHASH_TYPE: u8 = SIGHASH_ALL | SIGHASH_FORKID;

/// Computes sighash digest for signing.
///
/// Uses BIP-143 if FORKID set, legacy otherwise.
///
/// # Errors
/// Input out-of-range.
///
/// # Examples
/// ```
/// use txcomposer::messages::{Tx, TxIn};
/// use txcomposer::transaction::sighash::{sighash, SigHashCache, DEFAULT_SIGHASH_TYPE};
/// let tx = Tx { inputs: vec![TxIn::default()], ..Default::default() };
/// let mut cache = SigHashCache::new();
/// let digest = sighash(&tx, 0, &[], 1000, DEFAULT_SIGHASH_TYPE, &mut cache).unwrap();
/// assert_eq!(digest.0.len(), 32);
/// ```
pub fn sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    let preimage = sighash_preimage(tx, n_input, script_code, satoshis, sighash_type, cache)?;
    Ok(sha256d(&preimage))
}

/// Serializes the bytes that are double-SHA256 hashed to produce the sighash.
///
/// # Errors
/// Input out-of-range, or legacy `SIGHASH_SINGLE` without a matching output.
pub fn sighash_preimage(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Vec<u8>> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    if sighash_type & SIGHASH_FORKID != 0 {
        bip143_preimage(tx, n_input, script_code, satoshis, sighash_type, cache)
    } else {
        legacy_preimage(tx, n_input, script_code, sighash_type)
    }
}

/// Double-SHA256 of every input's outpoint (reversed txid then LE index), in input order.
#[must_use]
pub fn hash_prevouts(tx: &Tx) -> Hash256 {
    let mut prevouts = Vec::with_capacity(36 * tx.inputs.len());
    for input in &tx.inputs {
        // Writes into a Vec cannot fail.
        let _ = input.prev_output.write(&mut prevouts);
    }
    sha256d(&prevouts)
}

/// Cache for sighash intermediates (prevouts/sequences/outputs).
///
/// Only valid for one unchanged transaction.
#[derive(Default, Debug)]
pub struct SigHashCache {
    hash_prevouts: Option<Hash256>,
    hash_sequence: Option<Hash256>,
    hash_outputs: Option<Hash256>,
}

impl SigHashCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// BIP-143 preimage (post-2017, forkid).
///
/// Serializes: version | hash_prevouts/sequence | outpoint | script | value | sequence | hash_outputs | locktime | type|FORK_ID<<8.
fn bip143_preimage(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Vec<u8>> {
    let mut s = Vec::with_capacity(156 + script_code.len());
    let base_type = sighash_type & 0x1f;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    // 1. nVersion
    s.write_u32::<LittleEndian>(tx.version)?;
    // 2. hashPrevouts
    if !anyone_can_pay {
        let hash = *cache.hash_prevouts.get_or_insert_with(|| hash_prevouts(tx));
        s.extend_from_slice(&hash.0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 3. hashSequence
    if !anyone_can_pay && base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        let hash = match cache.hash_sequence {
            Some(hash) => hash,
            None => {
                let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
                for input in &tx.inputs {
                    sequences.write_u32::<LittleEndian>(input.sequence)?;
                }
                let hash = sha256d(&sequences);
                cache.hash_sequence = Some(hash);
                hash
            }
        };
        s.extend_from_slice(&hash.0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 4. outpoint
    tx.inputs[n_input].prev_output.write(&mut s)?;
    // 5. scriptCode len + code
    var_int::write(script_code.len() as u64, &mut s)?;
    s.extend_from_slice(script_code);
    // 6. value
    s.write_i64::<LittleEndian>(satoshis)?;
    // 7. nSequence
    s.write_u32::<LittleEndian>(tx.inputs[n_input].sequence)?;
    // 8. hashOutputs
    if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        let hash = match cache.hash_outputs {
            Some(hash) => hash,
            None => {
                let outputs_size = tx.outputs.iter().map(|out| out.size()).sum();
                let mut outputs = Vec::with_capacity(outputs_size);
                for out in &tx.outputs {
                    out.write(&mut outputs)?;
                }
                let hash = sha256d(&outputs);
                cache.hash_outputs = Some(hash);
                hash
            }
        };
        s.extend_from_slice(&hash.0);
    } else if base_type == SIGHASH_SINGLE && n_input < tx.outputs.len() {
        let mut single_out = Vec::with_capacity(tx.outputs[n_input].size());
        tx.outputs[n_input].write(&mut single_out)?;
        s.extend_from_slice(&sha256d(&single_out).0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 9. nLockTime
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    // 10. sighash_type
    s.write_u32::<LittleEndian>((FORK_ID << 8) | (sighash_type as u32))?;
    Ok(s)
}

/// Legacy preimage (pre-2017).
/// Serializes modified tx copy: version | inputs (sub_script or empty, seq=0 for NONE/SINGLE) | outputs (truncated/empty) | locktime | type.
fn legacy_preimage(tx: &Tx, n_input: usize, script_code: &[u8], sighash_type: u8) -> Result<Vec<u8>> {
    let base_type = sighash_type & 0x1f;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    if base_type == SIGHASH_SINGLE && n_input >= tx.outputs.len() {
        return Err(Error::BadArgument("SIGHASH_SINGLE input has no matching output".to_string()));
    }
    let mut s = Vec::with_capacity(tx.size());
    // Sub-script (remove OP_CODESEPARATOR)
    let mut sub_script = Vec::with_capacity(script_code.len());
    let mut i = 0;
    while i < script_code.len() {
        let next = next_op(i, script_code);
        if script_code[i] != OP_CODESEPARATOR {
            sub_script.extend_from_slice(&script_code[i..next]);
        }
        i = next;
    }
    // Version
    s.write_u32::<LittleEndian>(tx.version)?;
    // Inputs
    let signed_inputs: Vec<usize> = if anyone_can_pay {
        vec![n_input]
    } else {
        (0..tx.inputs.len()).collect()
    };
    var_int::write(signed_inputs.len() as u64, &mut s)?;
    for input_idx in signed_inputs {
        let mut tx_in = tx.inputs[input_idx].clone();
        if input_idx == n_input {
            tx_in.unlock_script = Script(sub_script.clone());
        } else {
            tx_in.unlock_script = Script::new();
            if base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
                tx_in.sequence = 0;
            }
        }
        tx_in.write(&mut s)?;
    }
    // Outputs
    let num_outputs = match base_type {
        SIGHASH_NONE => 0,
        SIGHASH_SINGLE => n_input + 1,
        _ => tx.outputs.len(),
    };
    var_int::write(num_outputs as u64, &mut s)?;
    for i in 0..num_outputs {
        if base_type == SIGHASH_SINGLE && i < n_input {
            let empty = TxOut {
                satoshis: -1,
                lock_script: Script::new(),
            };
            empty.write(&mut s)?;
        } else {
            tx.outputs[i].write(&mut s)?;
        }
    }
    // Locktime
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    // Sighash type
    s.write_u32::<LittleEndian>(sighash_type as u32)?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::p2pkh_hash_from_address;
    use crate::messages::{OutPoint, TxIn};
    use crate::transaction::p2pkh;
    use pretty_assertions::assert_eq;

    fn bip143_tx() -> Result<Tx> {
        let hash160 = p2pkh_hash_from_address("mfmKD4cP6Na7T8D87XRSiR7shA1HNGSaec")?;
        Ok(Tx {
            version: 2,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256::decode("f671dc000ad12795e86b59b27e0c367d9b026bbd4141c227b9285867a53bb6f7")?,
                    index: 0,
                },
                unlock_script: Script(vec![]),
                sequence: 0,
            }],
            outputs: vec![
                TxOut {
                    satoshis: 100,
                    lock_script: p2pkh::create_lock_script(&hash160),
                },
                TxOut {
                    satoshis: 259899900,
                    lock_script: p2pkh::create_lock_script(&hash160),
                },
            ],
            lock_time: 0,
        })
    }

    #[test]
    fn bip143_sighash_test() -> Result<()> {
        let lock_script = hex::decode("76a91402b74813b047606b4b3fbdfb1a6e8e053fdb8dab88ac")?;
        let tx = bip143_tx()?;
        let mut cache = SigHashCache::new();
        let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;
        let digest = sighash(&tx, 0, &lock_script, 260000000, sighash_type, &mut cache)?;
        let expected = "1e2121837829018daf3aeadab76f1a542c49a3600ded7bd74323ee74ce0d840c";
        assert_eq!(digest.0.to_vec(), hex::decode(expected)?);
        assert!(cache.hash_prevouts.is_some());
        assert!(cache.hash_sequence.is_some());
        assert!(cache.hash_outputs.is_some());
        Ok(())
    }

    #[test]
    fn bip143_preimage_layout() -> Result<()> {
        let lock_script = hex::decode("76a91402b74813b047606b4b3fbdfb1a6e8e053fdb8dab88ac")?;
        let tx = bip143_tx()?;
        let mut cache = SigHashCache::new();
        let preimage = sighash_preimage(&tx, 0, &lock_script, 260000000, DEFAULT_SIGHASH_TYPE, &mut cache)?;
        // version(4) hashPrevouts(32) hashSequence(32) outpoint(36) script(1+25) value(8) seq(4) hashOutputs(32) locktime(4) type(4)
        assert_eq!(preimage.len(), 4 + 32 + 32 + 36 + 26 + 8 + 4 + 32 + 4 + 4);
        assert_eq!(&preimage[..4], &[2, 0, 0, 0]);
        assert_eq!(&preimage[4..36], &hash_prevouts(&tx).0);
        assert_eq!(&preimage[preimage.len() - 4..], &[0x41, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn anyone_can_pay_zeroes_prevouts() -> Result<()> {
        let tx = bip143_tx()?;
        let mut cache = SigHashCache::new();
        let sighash_type = SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY;
        let preimage = sighash_preimage(&tx, 0, &[], 1, sighash_type, &mut cache)?;
        assert_eq!(&preimage[4..68], &[0u8; 64][..]);
        assert!(cache.hash_prevouts.is_none());
        Ok(())
    }

    #[test]
    fn input_out_of_range() {
        let tx = Tx::default();
        let mut cache = SigHashCache::new();
        assert_eq!(
            sighash(&tx, 0, &[], 0, DEFAULT_SIGHASH_TYPE, &mut cache).unwrap_err().to_string(),
            "Bad argument: Input index out of range"
        );
    }

    #[test]
    fn legacy_sighash_test() -> Result<()> {
        let lock_script = hex::decode("76a914d951eb562f1ff26b6cbe89f04eda365ea6bd95ce88ac")?;
        let tx = Tx {
            version: 1,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256::decode("bf6c1139ea01ca054b8d00aa0a088daaeab4f3b8e111626c6be7d603a9dd8dff")?,
                    index: 0,
                },
                unlock_script: Script(vec![]),
                sequence: 0xffffffff,
            }],
            outputs: vec![TxOut {
                satoshis: 49990000,
                lock_script: Script(hex::decode("76a9147865b0b301119fc3eadc7f3406ff1339908e46d488ac")?),
            }],
            lock_time: 0,
        };
        let mut cache = SigHashCache::new();
        let digest = sighash(&tx, 0, &lock_script, 0, SIGHASH_ALL, &mut cache)?;
        let expected = "ad16084eccf26464a84c5ee2f8b96b4daff9a3154ac3c1b320346aed042abe57";
        assert_eq!(digest.0.to_vec(), hex::decode(expected)?);
        Ok(())
    }

    #[test]
    fn prevouts_hash_is_order_sensitive() {
        let a = TxIn {
            prev_output: OutPoint {
                hash: Hash256([1; 32]),
                index: 0,
            },
            ..Default::default()
        };
        let b = TxIn {
            prev_output: OutPoint {
                hash: Hash256([2; 32]),
                index: 1,
            },
            ..Default::default()
        };
        let tx1 = Tx {
            inputs: vec![a.clone(), b.clone()],
            ..Default::default()
        };
        let tx2 = Tx {
            inputs: vec![b, a],
            ..Default::default()
        };
        assert_ne!(hash_prevouts(&tx1), hash_prevouts(&tx2));
        assert_eq!(hash_prevouts(&tx1), hash_prevouts(&tx1.clone()));
    }
}
