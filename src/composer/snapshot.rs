//! JSON snapshots of a composer, so a transaction can be handed to another process
//! (a remote signer, a later session) and resumed there.
use super::signing::SigningRequirement;
use super::{ComposerConfig, TxComposer};
use crate::messages::{OutPoint, Tx, TxIn, TxOut, DEFAULT_SEQUENCE};
use crate::script::Script;
use crate::util::{Error, Hash256, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Complete composer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerSnapshot {
    /// The transaction with the previous output of every input.
    pub tx: TxSnapshot,
    /// Pending signing requirements.
    #[serde(default)]
    pub input_infos: Vec<SigningRequirement>,
    /// Satoshis per byte.
    pub fee_rate: f64,
    /// Percentage applied to the relay dust fee.
    pub dust_limit_factor: u64,
    /// Index of the change output, `null` if there is none.
    #[serde(default)]
    pub change_output_index: Option<usize>,
    /// Address of the last change settlement.
    #[serde(default)]
    pub change_address: String,
}

/// Transaction fields. Hashes are in display order and scripts are hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSnapshot {
    /// Transaction version.
    pub version: u32,
    /// Inputs in order.
    pub inputs: Vec<InputSnapshot>,
    /// Outputs in order.
    pub outputs: Vec<OutputSnapshot>,
    /// Lock time.
    #[serde(rename = "nLockTime")]
    pub lock_time: u32,
}

/// One input and the output it spends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    /// Id of the spent transaction.
    pub prev_tx_id: String,
    /// Index of the spent output.
    pub output_index: u32,
    /// Sequence number.
    #[serde(default = "default_sequence")]
    pub sequence_number: u32,
    /// Unlocking script.
    pub script: String,
    /// The spent output.
    pub output: OutputSnapshot,
}

/// An output value and locking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    /// Value.
    pub satoshis: i64,
    /// Locking script.
    pub script: String,
}

fn default_sequence() -> u32 {
    DEFAULT_SEQUENCE
}

impl From<&TxOut> for OutputSnapshot {
    fn from(output: &TxOut) -> Self {
        OutputSnapshot {
            satoshis: output.satoshis,
            script: output.lock_script.to_hex(),
        }
    }
}

impl OutputSnapshot {
    fn to_tx_out(&self, what: &str) -> Result<TxOut> {
        let output = TxOut {
            satoshis: self.satoshis,
            lock_script: decode_script(&self.script, what)?,
        };
        output
            .validate()
            .map_err(|e| Error::MalformedSnapshot(format!("{}: {}", what, e)))?;
        Ok(output)
    }
}

fn decode_script(script_hex: &str, what: &str) -> Result<Script> {
    hex::decode(script_hex)
        .map(Script)
        .map_err(|e| Error::MalformedSnapshot(format!("{} script: {}", what, e)))
}

impl TxComposer {
    /// Captures the full state of the composer.
    #[must_use]
    pub fn snapshot(&self) -> ComposerSnapshot {
        let inputs = self
            .tx
            .inputs
            .iter()
            .zip(&self.prev_outputs)
            .map(|(input, prev)| InputSnapshot {
                prev_tx_id: input.prev_output.hash.encode(),
                output_index: input.prev_output.index,
                sequence_number: input.sequence,
                script: input.unlock_script.to_hex(),
                output: prev.into(),
            })
            .collect();
        ComposerSnapshot {
            tx: TxSnapshot {
                version: self.tx.version,
                inputs,
                outputs: self.tx.outputs.iter().map(OutputSnapshot::from).collect(),
                lock_time: self.tx.lock_time,
            },
            input_infos: self.input_infos.clone(),
            fee_rate: self.config.fee_rate(),
            dust_limit_factor: self.config.dust_limit_factor(),
            change_output_index: self.change_output_index,
            change_address: self.change_address.clone(),
        }
    }

    /// Rebuilds a composer from a snapshot.
    ///
    /// # Errors
    /// `Error::MalformedSnapshot` if any field does not describe a consistent composer.
    pub fn from_snapshot(snapshot: &ComposerSnapshot) -> Result<TxComposer> {
        let config = ComposerConfig::new(snapshot.fee_rate, snapshot.dust_limit_factor)
            .map_err(|e| Error::MalformedSnapshot(e.to_string()))?;

        let mut tx = Tx {
            version: snapshot.tx.version,
            inputs: Vec::with_capacity(snapshot.tx.inputs.len()),
            outputs: Vec::with_capacity(snapshot.tx.outputs.len()),
            lock_time: snapshot.tx.lock_time,
        };
        let mut prev_outputs = Vec::with_capacity(snapshot.tx.inputs.len());
        for (i, input) in snapshot.tx.inputs.iter().enumerate() {
            let hash = Hash256::decode(&input.prev_tx_id)
                .map_err(|e| Error::MalformedSnapshot(format!("input {} prevTxId: {}", i, e)))?;
            tx.inputs.push(TxIn {
                prev_output: OutPoint {
                    hash,
                    index: input.output_index,
                },
                unlock_script: decode_script(&input.script, &format!("input {}", i))?,
                sequence: input.sequence_number,
            });
            prev_outputs.push(input.output.to_tx_out(&format!("input {} output", i))?);
        }
        for (i, output) in snapshot.tx.outputs.iter().enumerate() {
            tx.outputs.push(output.to_tx_out(&format!("output {}", i))?);
        }

        if let Some(index) = snapshot.change_output_index {
            if index >= tx.outputs.len() {
                return Err(Error::MalformedSnapshot(format!(
                    "change output {} of {} outputs",
                    index,
                    tx.outputs.len()
                )));
            }
        }
        for requirement in &snapshot.input_infos {
            if requirement.input_index >= tx.inputs.len() {
                return Err(Error::MalformedSnapshot(format!(
                    "signing requirement for input {} of {} inputs",
                    requirement.input_index,
                    tx.inputs.len()
                )));
            }
            requirement
                .script_bytes()
                .map_err(|e| Error::MalformedSnapshot(format!("requirement script: {}", e)))?;
        }

        debug!(
            "restored composer: {} inputs, {} outputs, {} pending signatures",
            tx.inputs.len(),
            tx.outputs.len(),
            snapshot.input_infos.len()
        );
        Ok(TxComposer {
            tx,
            prev_outputs,
            input_infos: snapshot.input_infos.clone(),
            config,
            change_output_index: snapshot.change_output_index,
            change_address: snapshot.change_address.clone(),
        })
    }

    /// Serializes [`TxComposer::snapshot`] as JSON.
    ///
    /// # Errors
    /// `Error::BadData` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot()).map_err(|e| Error::BadData(e.to_string()))
    }

    /// Parses a JSON snapshot and rebuilds the composer.
    ///
    /// # Errors
    /// `Error::MalformedSnapshot` for invalid JSON or inconsistent state.
    pub fn from_json(s: &str) -> Result<TxComposer> {
        let snapshot: ComposerSnapshot =
            serde_json::from_str(s).map_err(|e| Error::MalformedSnapshot(e.to_string()))?;
        TxComposer::from_snapshot(&snapshot)
    }
}
