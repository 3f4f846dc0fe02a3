//! Bitcoin SV transaction and its binary encoding.

use crate::messages::{TxIn, TxOut};
use crate::util::{sha256d, to_bytes, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Cursor, Read, Write};

/// Maximum number of inputs/outputs (safety cap for large BSV txs).
const MAX_INPUTS: u64 = 100_000_000;
const MAX_OUTPUTS: u64 = 100_000_000;
// Counts come from untrusted input, so only this many entries are reserved up front.
const MAX_PREALLOC: u64 = 1024;

/// Version of newly composed transactions.
pub const DEFAULT_TX_VERSION: u32 = 1;

/// Bitcoin transaction.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version.
    pub version: u32,
    /// Transaction inputs.
    pub inputs: Vec<TxIn>,
    /// Transaction outputs.
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked.
    pub lock_time: u32,
}

impl Default for Tx {
    fn default() -> Tx {
        Tx {
            version: DEFAULT_TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }
}

impl Tx {
    /// Calculates the hash of the transaction (txid).
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        sha256d(&to_bytes(self))
    }

    /// Returns the serialized size of the transaction in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        8 + var_int::size(self.inputs.len() as u64)
            + self.inputs.iter().map(|tx_in| tx_in.size()).sum::<usize>()
            + var_int::size(self.outputs.len() as u64)
            + self.outputs.iter().map(|tx_out| tx_out.size()).sum::<usize>()
    }

    /// Returns the serialized transaction as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(to_bytes(self))
    }

    /// Parses a transaction from hex.
    ///
    /// # Errors
    /// Hex decoding errors, malformed transaction data, or trailing bytes.
    pub fn from_hex(s: &str) -> Result<Tx> {
        let bytes = hex::decode(s)?;
        let mut cursor = Cursor::new(&bytes);
        let tx = Tx::read(&mut cursor)?;
        if cursor.position() as usize != bytes.len() {
            return Err(Error::BadData("Trailing bytes after transaction".to_string()));
        }
        Ok(tx)
    }
}

impl Serializable<Tx> for Tx {
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>()?;
        let n_inputs = var_int::read(reader)?;
        if n_inputs > MAX_INPUTS {
            return Err(Error::BadData(format!("Too many inputs: {}", n_inputs)));
        }
        let mut inputs = Vec::with_capacity(n_inputs.min(MAX_PREALLOC) as usize);
        for _ in 0..n_inputs {
            inputs.push(TxIn::read(reader)?);
        }
        let n_outputs = var_int::read(reader)?;
        if n_outputs > MAX_OUTPUTS {
            return Err(Error::BadData(format!("Too many outputs: {}", n_outputs)));
        }
        let mut outputs = Vec::with_capacity(n_outputs.min(MAX_PREALLOC) as usize);
        for _ in 0..n_outputs {
            outputs.push(TxOut::read(reader)?);
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in &self.inputs {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in &self.outputs {
            tx_out.write(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());
        let mut d = f.debug_struct("Tx");
        d.field("version", &self.version);
        if self.inputs.len() <= 3 {
            d.field("inputs", &self.inputs);
        } else {
            d.field("inputs", &inputs_str);
        }
        if self.outputs.len() <= 3 {
            d.field("outputs", &self.outputs);
        } else {
            d.field("outputs", &outputs_str);
        }
        d.field("lock_time", &self.lock_time).finish()
    }
}
