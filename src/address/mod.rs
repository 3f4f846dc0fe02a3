//! Address handling for Bitcoin SV: P2PKH encoding/decoding in base58check format.
//!
//! Checksums use double-SHA256. Payload must be exactly 20 bytes (Hash160).

use crate::network::Network;
use crate::util::{Error, Hash160, Result, sha256d};
use base58::{FromBase58, ToBase58};

const MAINNET_P2PKH_VERSION: u8 = 0x00;
const TESTNET_P2PKH_VERSION: u8 = 0x6F;

/// Encodes a base58check address from version byte and 20-byte payload.
///
/// # Errors
/// Returns `Error::BadArgument` if payload is not exactly 20 bytes.
///
/// # Examples
/// ```
/// use txcomposer::address::encode_address;
/// let addr = encode_address(0x00, &[0u8; 20]).unwrap();
/// assert_eq!(addr, "1111111111111111111114oLvT2");
/// ```
#[inline]
pub fn encode_address(version: u8, payload: &[u8]) -> Result<String> {
    if payload.len() != 20 {
        return Err(Error::BadArgument("Payload must be 20 bytes".to_string()));
    }
    let mut v = [0u8; 25];
    v[0] = version;
    v[1..21].copy_from_slice(payload);
    let checksum = sha256d(&v[..21]);
    v[21..25].copy_from_slice(&checksum.0[..4]);
    Ok(v.to_base58())
}

/// Decodes a base58check address into version and payload.
///
/// Verifies 25-byte length and checksum; extracts version (byte 0) and payload (bytes 1-20).
///
/// # Errors
/// Returns `Error::FromBase58Error` on decode failure, `Error::BadData` on invalid length/checksum.
#[inline]
pub fn decode_address(input: &str) -> Result<(u8, Vec<u8>)> {
    let bytes = input.from_base58()?;
    if bytes.len() != 25 {
        return Err(Error::BadData("Invalid address length".to_string()));
    }
    let checksum = sha256d(&bytes[..21]);
    if checksum.0[..4] != bytes[21..] {
        return Err(Error::BadData("Invalid checksum".to_string()));
    }
    Ok((bytes[0], bytes[1..21].to_vec()))
}

/// Encodes a P2PKH address from 20-byte pubkey hash.
///
/// # Errors
/// Returns `Error::BadArgument` if the hash is not 20 bytes.
#[inline]
pub fn encode_p2pkh_address(network: Network, pubkey_hash: &[u8]) -> Result<String> {
    encode_address(network.p2pkh_version(), pubkey_hash)
}

/// Decodes a P2PKH address of any network into its public key hash.
///
/// # Errors
/// Decoding errors, or `Error::BadArgument` if the version byte is not a P2PKH version.
pub fn p2pkh_hash_from_address(address: &str) -> Result<Hash160> {
    let (version, payload) = decode_address(address)?;
    if version != MAINNET_P2PKH_VERSION && version != TESTNET_P2PKH_VERSION {
        return Err(Error::BadArgument(format!("Not a P2PKH address: {}", address)));
    }
    let mut hash = Hash160([0; 20]);
    hash.0.copy_from_slice(&payload);
    Ok(hash)
}
