//! Incremental transaction composition.
//!
//! A [`TxComposer`] owns a transaction under construction together with the previous
//! output of every input. It appends inputs and outputs, settles change against the
//! configured fee rate, exposes sighash preimages and injects signatures, either locally
//! or through the two-phase [`signing`] protocol.
//!
//! # Examples
//! ```
//! use txcomposer::composer::{signing::{sign_requests, LocalSigner}, ComposerConfig, TxComposer};
//! use txcomposer::messages::OutPoint;
//! use txcomposer::network::Network;
//! use txcomposer::transaction::sighash::DEFAULT_SIGHASH_TYPE;
//! use txcomposer::util::Hash256;
//!
//! let signer = LocalSigner::new([1; 32]).unwrap();
//! let address = signer.address(Network::Mainnet).unwrap();
//!
//! let mut composer = TxComposer::new(ComposerConfig::default());
//! let utxo = OutPoint { hash: Hash256([7; 32]), index: 0 };
//! composer.append_p2pkh_input(utxo, &address, 100_000).unwrap();
//! composer.append_p2pkh_output(&address, 50_000).unwrap();
//! composer.append_change_output(&address).unwrap();
//! composer.add_input_info(0, DEFAULT_SIGHASH_TYPE, None).unwrap();
//!
//! let requests = composer.signing_requests().unwrap();
//! let results = sign_requests(&requests, &signer).unwrap();
//! composer.unlock(&results).unwrap();
//! assert!(composer.verify_p2pkh_input(0).unwrap());
//! composer.check_fee_rate().unwrap();
//! ```
mod config;
pub mod fee;
pub mod placeholder;
pub mod signing;
mod snapshot;

pub use self::config::{ComposerConfig, DEFAULT_DUST_LIMIT_FACTOR, DEFAULT_FEE_RATE};
pub use self::fee::FeePolicy;
pub use self::snapshot::{ComposerSnapshot, InputSnapshot, OutputSnapshot, TxSnapshot};

use self::fee::{CHANGE_OUTPUT_SIZE, P2PKH_DUST_AMOUNT};
use self::signing::{AddressHint, SigResult, SigningRequest, SigningRequirement};
use crate::address::p2pkh_hash_from_address;
use crate::messages::{OutPoint, Tx, TxIn, TxOut, DEFAULT_SEQUENCE};
use crate::script::Script;
use crate::transaction::data_out::{create_data_script, DataPayload};
use crate::transaction::sighash::{hash_prevouts, sighash, sighash_preimage, SigHashCache};
use crate::transaction::{generate_signature, p2pkh, public_key, to_tx_format, verify_signature};
use crate::util::{hash160, sha256d, Error, Hash256, Result};
use log::{debug, trace, warn};

/// Reference to the change output of a composed transaction, usable as a future input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeUtxo {
    /// Id of the composed transaction.
    pub tx_id: Hash256,
    /// Index of the change output.
    pub output_index: u32,
    /// Value of the change output.
    pub satoshis: i64,
    /// Address the change pays to.
    pub address: String,
}

/// Transaction under construction.
#[derive(Debug, Clone)]
pub struct TxComposer {
    tx: Tx,
    // One per input, same order.
    prev_outputs: Vec<TxOut>,
    input_infos: Vec<SigningRequirement>,
    config: ComposerConfig,
    change_output_index: Option<usize>,
    change_address: String,
}

impl Default for TxComposer {
    fn default() -> Self {
        TxComposer::new(ComposerConfig::default())
    }
}

impl TxComposer {
    /// Creates an empty composer.
    #[must_use]
    pub fn new(config: ComposerConfig) -> Self {
        TxComposer {
            tx: Tx::default(),
            prev_outputs: Vec::new(),
            input_infos: Vec::new(),
            config,
            change_output_index: None,
            change_address: String::new(),
        }
    }

    /// Settings this composer was created with.
    #[must_use]
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// The transaction as composed so far.
    #[must_use]
    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    /// Serialized size of the transaction as it stands.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tx.size()
    }

    /// Serialized transaction as hex.
    #[must_use]
    pub fn raw_hex(&self) -> String {
        self.tx.to_hex()
    }

    /// Transaction id. Changes whenever the transaction does.
    #[must_use]
    pub fn tx_id(&self) -> Hash256 {
        self.tx.hash()
    }

    /// Input at `index`.
    #[must_use]
    pub fn input(&self, index: usize) -> Option<&TxIn> {
        self.tx.inputs.get(index)
    }

    /// Output at `index`.
    #[must_use]
    pub fn output(&self, index: usize) -> Option<&TxOut> {
        self.tx.outputs.get(index)
    }

    /// Previous output spent by the input at `index`.
    #[must_use]
    pub fn prev_output(&self, index: usize) -> Option<&TxOut> {
        self.prev_outputs.get(index)
    }

    /// Minimum value for an output whose locking script has `script_size` bytes.
    #[must_use]
    pub fn dust_threshold(&self, script_size: usize) -> i64 {
        self.config.fee_policy().dust_threshold(script_size)
    }

    /// Appends an input spending a P2PKH output of `address`.
    ///
    /// # Errors
    /// Address decoding errors, or `Error::BadData` for an invalid value.
    pub fn append_p2pkh_input(&mut self, prev_output: OutPoint, address: &str, satoshis: i64) -> Result<usize> {
        let hash = p2pkh_hash_from_address(address)?;
        self.append_input(prev_output, p2pkh::create_lock_script(&hash), satoshis)
    }

    /// Appends an input spending an output locked by `lock_script`.
    ///
    /// The unlocking script starts empty and the sequence is final.
    ///
    /// # Errors
    /// `Error::BadData` for a negative or oversized value.
    pub fn append_input(&mut self, prev_output: OutPoint, lock_script: Script, satoshis: i64) -> Result<usize> {
        let prev = TxOut { satoshis, lock_script };
        prev.validate()?;
        trace!("append input {}:{} ({} sat)", prev_output.hash, prev_output.index, satoshis);
        self.tx.inputs.push(TxIn {
            prev_output,
            unlock_script: Script::new(),
            sequence: DEFAULT_SEQUENCE,
        });
        self.prev_outputs.push(prev);
        Ok(self.tx.inputs.len() - 1)
    }

    /// Appends an output paying `satoshis` to `address`.
    ///
    /// # Errors
    /// Address decoding errors, or `Error::BadData` for an invalid value.
    pub fn append_p2pkh_output(&mut self, address: &str, satoshis: i64) -> Result<usize> {
        let hash = p2pkh_hash_from_address(address)?;
        self.append_output(p2pkh::create_lock_script(&hash), satoshis)
    }

    /// Appends an output with an arbitrary locking script.
    ///
    /// # Errors
    /// `Error::BadData` for a negative or oversized value.
    pub fn append_output(&mut self, lock_script: Script, satoshis: i64) -> Result<usize> {
        let output = TxOut { satoshis, lock_script };
        output.validate()?;
        trace!("append output {} ({} sat)", output.lock_script.to_hex(), satoshis);
        self.tx.outputs.push(output);
        Ok(self.tx.outputs.len() - 1)
    }

    /// Appends a zero-value `OP_FALSE OP_RETURN` data output.
    ///
    /// # Errors
    /// `Error::BadArgument` if a chunk is too long to push.
    pub fn append_op_return_output(&mut self, payload: &DataPayload) -> Result<usize> {
        let script = create_data_script(payload)?;
        self.append_output(script, 0)
    }

    /// Installs an unlocking script, typically a template with placeholder pushes.
    ///
    /// # Errors
    /// `Error::BadArgument` if the input does not exist.
    pub fn set_unlock_script(&mut self, input_index: usize, unlock_script: Script) -> Result<()> {
        let input = self
            .tx
            .inputs
            .get_mut(input_index)
            .ok_or_else(|| Error::BadArgument(format!("Input index out of range: {}", input_index)))?;
        input.unlock_script = unlock_script;
        Ok(())
    }

    /// Sum of input values minus sum of output values.
    #[must_use]
    pub fn unspent_value(&self) -> i64 {
        let total_in: i64 = self.prev_outputs.iter().map(|prev| prev.satoshis).sum();
        let total_out: i64 = self.tx.outputs.iter().map(|output| output.satoshis).sum();
        total_in - total_out
    }

    /// Fee paid per byte of the transaction as it stands.
    #[must_use]
    pub fn final_fee_rate(&self) -> f64 {
        self.unspent_value() as f64 / self.tx.size() as f64
    }

    /// Checks that the transaction pays at least the configured fee rate.
    ///
    /// Meant for the fully signed transaction; exact equality passes.
    ///
    /// # Errors
    /// `Error::InsufficientFee` with both rates otherwise.
    pub fn check_fee_rate(&self) -> Result<()> {
        let actual = self.final_fee_rate();
        let required = self.config.fee_rate();
        if actual < required {
            warn!("fee rate {} below required {}", actual, required);
            return Err(Error::InsufficientFee {
                required,
                actual,
            });
        }
        Ok(())
    }

    /// Settles change to `change_address`.
    ///
    /// Any previous change output is removed first, so settling twice gives the same
    /// transaction. The fee covers the transaction plus a change output plus an unlock
    /// budget for every P2PKH input; the change output is added only if what remains is
    /// at least [`P2PKH_DUST_AMOUNT`]. Returns the index of the change output, if any.
    ///
    /// # Errors
    /// Address decoding errors. The composer is unchanged on error.
    pub fn append_change_output(&mut self, change_address: &str) -> Result<Option<usize>> {
        let hash = p2pkh_hash_from_address(change_address)?;
        self.clear_change_output();

        let unlock_budget = fee::unlock_budget(&self.prev_outputs);
        let fee = self
            .config
            .fee_policy()
            .required_fee(self.tx.size() + CHANGE_OUTPUT_SIZE, unlock_budget);
        let change = self.unspent_value() - fee;
        if change >= P2PKH_DUST_AMOUNT {
            self.tx.outputs.push(TxOut {
                satoshis: change,
                lock_script: p2pkh::create_lock_script(&hash),
            });
            self.change_output_index = Some(self.tx.outputs.len() - 1);
        }
        self.change_address = change_address.to_string();
        debug!(
            "settled change to {}: fee {} sat, change {} sat, output {:?}",
            change_address, fee, change, self.change_output_index
        );
        Ok(self.change_output_index)
    }

    /// Removes the change output, if there is one.
    pub fn clear_change_output(&mut self) {
        if let Some(index) = self.change_output_index.take() {
            if index < self.tx.outputs.len() {
                self.tx.outputs.remove(index);
            }
        }
    }

    /// Index of the change output, if change was created.
    #[must_use]
    pub fn change_output_index(&self) -> Option<usize> {
        self.change_output_index
    }

    /// Address of the last change settlement, empty if change was never settled.
    #[must_use]
    pub fn change_address(&self) -> &str {
        &self.change_address
    }

    /// The change output as a spendable reference.
    ///
    /// The transaction id is only final once every input is unlocked.
    #[must_use]
    pub fn change_utxo(&self) -> Option<ChangeUtxo> {
        let index = self.change_output_index?;
        let output = self.tx.outputs.get(index)?;
        Some(ChangeUtxo {
            tx_id: self.tx_id(),
            output_index: index as u32,
            satoshis: output.satoshis,
            address: self.change_address.clone(),
        })
    }

    /// Sighash preimage of an input against its previous output.
    ///
    /// # Errors
    /// `Error::BadArgument` if the input does not exist.
    pub fn preimage(&self, input_index: usize, sighash_type: u8) -> Result<Vec<u8>> {
        let prev = self.checked_prev_output(input_index)?;
        let mut cache = SigHashCache::new();
        sighash_preimage(
            &self.tx,
            input_index,
            &prev.lock_script.0,
            prev.satoshis,
            sighash_type,
            &mut cache,
        )
    }

    /// Digest to sign for an input.
    ///
    /// # Errors
    /// `Error::BadArgument` if the input does not exist.
    pub fn sighash(&self, input_index: usize, sighash_type: u8) -> Result<Hash256> {
        let prev = self.checked_prev_output(input_index)?;
        let mut cache = SigHashCache::new();
        sighash(
            &self.tx,
            input_index,
            &prev.lock_script.0,
            prev.satoshis,
            sighash_type,
            &mut cache,
        )
    }

    /// Double SHA-256 over all input outpoints in order.
    #[must_use]
    pub fn prevouts_hash(&self) -> Hash256 {
        hash_prevouts(&self.tx)
    }

    /// Records that `input_index` must be signed, capturing its previous output now.
    ///
    /// # Errors
    /// `Error::BadArgument` if the input does not exist.
    pub fn add_input_info(&mut self, input_index: usize, sighash_type: u8, address: Option<AddressHint>) -> Result<()> {
        let prev = self.checked_prev_output(input_index)?;
        let requirement = SigningRequirement {
            input_index,
            script_hex: prev.lock_script.to_hex(),
            satoshis: prev.satoshis,
            sighash_type,
            address,
        };
        trace!("signing requirement for input {}", input_index);
        self.input_infos.push(requirement);
        Ok(())
    }

    /// Pending signing requirements, in the order signatures are expected.
    #[must_use]
    pub fn input_infos(&self) -> &[SigningRequirement] {
        &self.input_infos
    }

    /// Replaces the pending signing requirements.
    ///
    /// # Errors
    /// `Error::BadArgument` if a requirement names a missing input.
    pub fn set_input_infos(&mut self, input_infos: Vec<SigningRequirement>) -> Result<()> {
        if let Some(bad) = input_infos.iter().find(|info| info.input_index >= self.tx.inputs.len()) {
            return Err(Error::BadArgument(format!("Input index out of range: {}", bad.input_index)));
        }
        self.input_infos = input_infos;
        Ok(())
    }

    /// Builds one signing request per pending requirement.
    ///
    /// Preimages use the script and value captured in each requirement.
    ///
    /// # Errors
    /// `Error::BadArgument` for a missing input, hex errors for a corrupt script.
    pub fn signing_requests(&self) -> Result<Vec<SigningRequest>> {
        let mut cache = SigHashCache::new();
        self.input_infos
            .iter()
            .map(|requirement| {
                let script = requirement.script_bytes()?;
                let preimage = sighash_preimage(
                    &self.tx,
                    requirement.input_index,
                    &script,
                    requirement.satoshis,
                    requirement.sighash_type,
                    &mut cache,
                )?;
                let sighash = sha256d(&preimage);
                Ok(SigningRequest {
                    requirement: requirement.clone(),
                    preimage,
                    sighash,
                })
            })
            .collect()
    }

    /// Injects signatures, one per pending requirement in the same order.
    ///
    /// An input with an empty unlocking script gets `push(sig) push(pubkey)`. An input that
    /// already carries a script has its placeholder pushes replaced. Every signature is
    /// validated before anything changes; on success the requirements are consumed.
    ///
    /// # Errors
    /// `Error::BadArgument` on a count mismatch, `Error::PlaceholderNotFound` for a
    /// template without its placeholders, decoding errors for malformed results.
    pub fn unlock(&mut self, sig_results: &[SigResult]) -> Result<()> {
        if sig_results.len() != self.input_infos.len() {
            return Err(Error::BadArgument(format!(
                "Expected {} signatures, got {}",
                self.input_infos.len(),
                sig_results.len()
            )));
        }
        let mut scripts: Vec<Script> = self.tx.inputs.iter().map(|input| input.unlock_script.clone()).collect();
        for (requirement, sig_result) in self.input_infos.iter().zip(sig_results) {
            let script = scripts.get_mut(requirement.input_index).ok_or_else(|| {
                Error::BadArgument(format!("Input index out of range: {}", requirement.input_index))
            })?;
            let public_key = sig_result.public_key_bytes()?;
            let sig = to_tx_format(&sig_result.sig_bytes()?, requirement.sighash_type)?;
            *script = if script.0.is_empty() {
                p2pkh::create_unlock_script(&sig, &public_key)?
            } else {
                placeholder::fill_placeholders(script, &sig, &public_key)?
            };
        }
        for (input, script) in self.tx.inputs.iter_mut().zip(scripts) {
            input.unlock_script = script;
        }
        debug!("injected {} signatures, tx {}", sig_results.len(), self.tx_id());
        self.input_infos.clear();
        Ok(())
    }

    /// Signature in tx format for an input, using a local key.
    ///
    /// # Errors
    /// `Error::BadArgument` for a missing input, `Error::BadData` for an invalid key.
    pub fn tx_format_sig(&self, private_key: &[u8; 32], input_index: usize, sighash_type: u8) -> Result<Vec<u8>> {
        let digest = self.sighash(input_index, sighash_type)?;
        generate_signature(private_key, &digest, sighash_type)
    }

    /// Signs a P2PKH input with a local key and installs `push(sig) push(pubkey)`.
    ///
    /// # Errors
    /// `Error::BadArgument` for a missing input, `Error::BadData` for an invalid key.
    pub fn unlock_p2pkh_input(&mut self, private_key: &[u8; 32], input_index: usize, sighash_type: u8) -> Result<()> {
        let sig = self.tx_format_sig(private_key, input_index, sighash_type)?;
        let public_key = public_key(private_key)?;
        self.set_unlock_script(input_index, p2pkh::create_unlock_script(&sig, &public_key)?)
    }

    /// Checks the signature in a P2PKH input's unlocking script against its previous output.
    ///
    /// # Errors
    /// `Error::BadArgument` for a missing input, `Error::BadData` if either script is not P2PKH.
    pub fn verify_p2pkh_input(&self, input_index: usize) -> Result<bool> {
        let prev = self.checked_prev_output(input_index)?;
        let pubkey_hash = p2pkh::extract_pubkeyhash(&prev.lock_script.0)?;
        let unlock_script = &self.tx.inputs[input_index].unlock_script.0;
        let sig = p2pkh::extract_signature(unlock_script)?;
        let public_key = p2pkh::extract_pubkey(unlock_script)?;
        if hash160(&public_key) != pubkey_hash {
            debug!("input {} pubkey does not hash to {:?}", input_index, pubkey_hash);
            return Ok(false);
        }
        let sighash_type = match sig.last() {
            Some(sighash_type) => *sighash_type,
            None => return Ok(false),
        };
        let digest = self.sighash(input_index, sighash_type)?;
        verify_signature(&sig, &public_key, &digest)
    }

    fn checked_prev_output(&self, input_index: usize) -> Result<&TxOut> {
        self.prev_outputs
            .get(input_index)
            .ok_or_else(|| Error::BadArgument(format!("Input index out of range: {}", input_index)))
    }
}

#[cfg(test)]
mod tests {
    use super::placeholder::placeholder_unlock_script;
    use super::signing::{sign_requests, LocalSigner};
    use super::*;
    use crate::address::encode_p2pkh_address;
    use crate::network::Network;
    use crate::transaction::sighash::{DEFAULT_SIGHASH_TYPE, SIGHASH_ALL, SIGHASH_FORKID};
    use pretty_assertions::assert_eq;

    const KEY: [u8; 32] = [11; 32];

    fn address() -> String {
        encode_p2pkh_address(Network::Mainnet, &hash160(&public_key(&KEY).unwrap()).0).unwrap()
    }

    fn outpoint(n: u8) -> OutPoint {
        OutPoint {
            hash: Hash256([n; 32]),
            index: n as u32,
        }
    }

    #[test]
    fn append_returns_indices() -> Result<()> {
        let mut composer = TxComposer::default();
        assert_eq!(composer.append_p2pkh_input(outpoint(1), &address(), 1000)?, 0);
        assert_eq!(composer.append_input(outpoint(2), Script(vec![0x51]), 500)?, 1);
        assert_eq!(composer.append_p2pkh_output(&address(), 700)?, 0);
        assert_eq!(composer.append_op_return_output(&DataPayload::from("hi"))?, 1);
        assert_eq!(composer.unspent_value(), 800);
        assert_eq!(composer.prev_output(1).map(|p| p.satoshis), Some(500));
        assert_eq!(composer.input(0).map(|i| i.sequence), Some(DEFAULT_SEQUENCE));
        assert_eq!(composer.output(1).map(|o| o.satoshis), Some(0));
        assert!(composer.append_output(Script::new(), -1).is_err());
        assert!(composer.append_p2pkh_output("not an address", 1).is_err());
        assert_eq!(composer.tx().outputs.len(), 2);
        Ok(())
    }

    #[test]
    fn change_settlement() -> Result<()> {
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 100_000)?;
        composer.append_p2pkh_output(&address(), 50_000)?;
        assert_eq!(composer.size(), 85);
        assert_eq!(composer.append_change_output(&address())?, Some(1));
        let change = composer.change_utxo().unwrap();
        assert_eq!(change.satoshis, 49_887);
        assert_eq!(change.output_index, 1);
        assert_eq!(change.address, address());
        assert_eq!(change.tx_id, composer.tx_id());

        let before = composer.raw_hex();
        composer.append_change_output(&address())?;
        assert_eq!(composer.raw_hex(), before);

        composer.clear_change_output();
        assert_eq!(composer.change_output_index(), None);
        assert_eq!(composer.tx().outputs.len(), 1);
        assert_eq!(composer.change_utxo(), None);
        Ok(())
    }

    #[test]
    fn no_change_below_dust() -> Result<()> {
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 50_000 + 113 + 134)?;
        composer.append_p2pkh_output(&address(), 50_000)?;
        assert_eq!(composer.append_change_output(&address())?, None);
        assert_eq!(composer.tx().outputs.len(), 1);
        assert_eq!(composer.change_output_index(), None);
        assert_eq!(composer.change_utxo(), None);

        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 50_000 + 113 + 135)?;
        composer.append_p2pkh_output(&address(), 50_000)?;
        assert_eq!(composer.append_change_output(&address())?, Some(1));
        assert_eq!(composer.output(1).map(|o| o.satoshis), Some(135));
        Ok(())
    }

    #[test]
    fn bad_change_address_leaves_state() -> Result<()> {
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 100_000)?;
        composer.append_change_output(&address())?;
        let before = composer.raw_hex();
        assert!(composer.append_change_output("bogus").is_err());
        assert_eq!(composer.raw_hex(), before);
        assert_eq!(composer.change_output_index(), Some(0));
        Ok(())
    }

    #[test]
    fn local_unlock_and_fee_check() -> Result<()> {
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 100_000)?;
        composer.append_p2pkh_input(outpoint(2), &address(), 2_000)?;
        composer.append_p2pkh_output(&address(), 50_000)?;
        composer.append_change_output(&address())?;
        composer.unlock_p2pkh_input(&KEY, 0, DEFAULT_SIGHASH_TYPE)?;
        composer.unlock_p2pkh_input(&KEY, 1, SIGHASH_ALL | SIGHASH_FORKID)?;
        assert!(composer.verify_p2pkh_input(0)?);
        assert!(composer.verify_p2pkh_input(1)?);
        composer.check_fee_rate()?;
        assert!(composer.final_fee_rate() >= 0.5);
        assert!(composer.unlock_p2pkh_input(&KEY, 2, DEFAULT_SIGHASH_TYPE).is_err());
        Ok(())
    }

    #[test]
    fn insufficient_fee() -> Result<()> {
        let mut composer = TxComposer::new(ComposerConfig::new(1.0, 300)?);
        composer.append_input(outpoint(1), Script(vec![0x51]), 1_000)?;
        composer.append_output(Script(vec![0x51]), 1_000)?;
        match composer.check_fee_rate() {
            Err(Error::InsufficientFee { required, actual }) => {
                assert_eq!(required, 1.0);
                assert_eq!(actual, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn template_unlock() -> Result<()> {
        let signer = LocalSigner::new(KEY)?;
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 10_000)?;
        composer.append_p2pkh_input(outpoint(2), &address(), 10_000)?;
        composer.set_unlock_script(1, placeholder_unlock_script())?;
        composer.append_change_output(&address())?;
        composer.add_input_info(0, DEFAULT_SIGHASH_TYPE, None)?;
        composer.add_input_info(1, DEFAULT_SIGHASH_TYPE, Some(AddressHint::Index(3)))?;

        let requests = composer.signing_requests()?;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].preimage, composer.preimage(1, DEFAULT_SIGHASH_TYPE)?);
        assert_eq!(requests[1].sighash, composer.sighash(1, DEFAULT_SIGHASH_TYPE)?);

        let results = sign_requests(&requests, &signer)?;
        assert!(composer.unlock(&results[..1]).is_err());
        composer.unlock(&results)?;
        assert!(composer.input_infos().is_empty());
        assert!(composer.verify_p2pkh_input(0)?);
        assert!(composer.verify_p2pkh_input(1)?);
        Ok(())
    }

    #[test]
    fn unlock_is_all_or_nothing() -> Result<()> {
        let signer = LocalSigner::new(KEY)?;
        let mut composer = TxComposer::default();
        composer.append_p2pkh_input(outpoint(1), &address(), 10_000)?;
        composer.append_p2pkh_input(outpoint(2), &address(), 10_000)?;
        // A non-empty script without placeholders.
        composer.set_unlock_script(1, Script(vec![0x51]))?;
        composer.add_input_info(0, DEFAULT_SIGHASH_TYPE, None)?;
        composer.add_input_info(1, DEFAULT_SIGHASH_TYPE, None)?;
        let results = sign_requests(&composer.signing_requests()?, &signer)?;
        let before = composer.raw_hex();
        assert!(matches!(composer.unlock(&results), Err(Error::PlaceholderNotFound(_))));
        assert_eq!(composer.raw_hex(), before);
        assert_eq!(composer.input_infos().len(), 2);
        Ok(())
    }

    #[test]
    fn input_infos_bounds() -> Result<()> {
        let mut composer = TxComposer::default();
        assert!(composer.add_input_info(0, DEFAULT_SIGHASH_TYPE, None).is_err());
        composer.append_p2pkh_input(outpoint(1), &address(), 10_000)?;
        composer.add_input_info(0, DEFAULT_SIGHASH_TYPE, None)?;
        let mut infos = composer.input_infos().to_vec();
        assert_eq!(infos[0].satoshis, 10_000);
        assert_eq!(infos[0].script_hex, composer.prev_output(0).unwrap().lock_script.to_hex());
        infos[0].input_index = 4;
        assert!(composer.set_input_infos(infos).is_err());
        assert!(composer.preimage(1, DEFAULT_SIGHASH_TYPE).is_err());
        Ok(())
    }
}
