//! Two-phase signing: the composer describes what must be signed, a [`Signer`] produces
//! signatures, and the composer injects them.
//!
//! Requirements and results are plain serde types so they can cross a process boundary
//! as JSON.
use crate::address::encode_p2pkh_address;
use crate::network::Network;
use crate::transaction::{generate_signature, p2pkh, public_key};
use crate::util::{hash160, sha256d, Error, Hash256, Result};
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which key should sign, as understood by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressHint {
    /// Derivation index of the key in a wallet.
    Index(u64),
    /// Base58 address of the key.
    Address(String),
}

/// One input that must be signed, captured when the requirement was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequirement {
    /// Index of the input to sign.
    pub input_index: usize,
    /// Locking script of the spent output, as hex.
    pub script_hex: String,
    /// Value of the spent output.
    pub satoshis: i64,
    /// Sighash flags to sign with.
    pub sighash_type: u8,
    /// Optional key hint passed through to the signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressHint>,
}

impl SigningRequirement {
    /// Decodes `script_hex`.
    ///
    /// # Errors
    /// `Error::FromHexError` if the script is not valid hex.
    pub fn script_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.script_hex)?)
    }
}

/// A requirement together with the data a signer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    /// What to sign.
    pub requirement: SigningRequirement,
    /// Serialized sighash preimage.
    pub preimage: Vec<u8>,
    /// Double SHA-256 of the preimage, the digest to sign.
    pub sighash: Hash256,
}

/// Signature produced for one requirement, positionally matched to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigResult {
    /// Public key as hex.
    pub public_key: String,
    /// Signature as hex: DER, DER with a sighash byte, or 64-byte compact.
    pub sig: String,
}

impl SigResult {
    /// Creates a result from raw bytes.
    #[must_use]
    pub fn new(public_key: &[u8], sig: &[u8]) -> Self {
        SigResult {
            public_key: hex::encode(public_key),
            sig: hex::encode(sig),
        }
    }

    /// Decodes and checks the public key.
    ///
    /// # Errors
    /// `Error::FromHexError` on bad hex, `Error::BadData` if it is not a valid curve point.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>> {
        let bytes = hex::decode(&self.public_key)?;
        PublicKey::from_slice(&bytes)
            .map_err(|_| Error::BadData(format!("Invalid public key: {}", self.public_key)))?;
        Ok(bytes)
    }

    /// Decodes the signature.
    ///
    /// # Errors
    /// `Error::FromHexError` on bad hex.
    pub fn sig_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.sig)?)
    }
}

/// Produces signatures for signing requests.
pub trait Signer {
    /// Signs `request.sighash` with the key the request calls for.
    ///
    /// # Errors
    /// Implementation specific.
    fn sign(&self, request: &SigningRequest) -> Result<SigResult>;
}

/// Signer holding a single private key in memory.
pub struct LocalSigner {
    private_key: [u8; 32],
    public_key: [u8; 33],
}

impl LocalSigner {
    /// Creates a signer for `private_key`.
    ///
    /// # Errors
    /// `Error::BadData` if the key is out of range.
    pub fn new(private_key: [u8; 32]) -> Result<Self> {
        let public_key = public_key(&private_key)?;
        Ok(LocalSigner {
            private_key,
            public_key,
        })
    }

    /// Compressed public key.
    #[must_use]
    pub fn public_key(&self) -> [u8; 33] {
        self.public_key
    }

    /// P2PKH address of the key on `network`.
    ///
    /// # Errors
    /// Never in practice; address encoding is fallible in general.
    pub fn address(&self, network: Network) -> Result<String> {
        encode_p2pkh_address(network, &hash160(&self.public_key).0)
    }
}

impl Signer for LocalSigner {
    fn sign(&self, request: &SigningRequest) -> Result<SigResult> {
        if sha256d(&request.preimage) != request.sighash {
            return Err(Error::BadData(format!(
                "Sighash does not match preimage of input {}",
                request.requirement.input_index
            )));
        }
        let script = request.requirement.script_bytes()?;
        if p2pkh::check_lock_script(&script) && !p2pkh::check_lock_script_addr(&hash160(&self.public_key), &script) {
            return Err(Error::BadArgument(format!(
                "Key does not unlock input {}",
                request.requirement.input_index
            )));
        }
        let sig = generate_signature(&self.private_key, &request.sighash, request.requirement.sighash_type)?;
        Ok(SigResult::new(&self.public_key, &sig))
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LocalSigner({})", hex::encode(self.public_key))
    }
}

/// Signs every request with `signer`, keeping request order.
///
/// # Errors
/// The first signer error.
pub fn sign_requests(requests: &[SigningRequest], signer: &dyn Signer) -> Result<Vec<SigResult>> {
    requests.iter().map(|request| signer.sign(request)).collect()
}
