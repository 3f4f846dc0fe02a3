//! Data-carrier (`OP_FALSE OP_RETURN`) output scripts.
//!
//! The leading `OP_FALSE` makes the output provably unspendable under both pre- and
//! post-Genesis rules.
use crate::script::op_codes::{OP_FALSE, OP_RETURN};
use crate::script::Script;
use crate::util::Result;

/// Payload of a data-carrier output, resolved into pushes when the output is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPayload {
    /// A single push of raw bytes.
    Bytes(Vec<u8>),
    /// A single push of UTF-8 text.
    Text(String),
    /// One push per chunk, in order.
    Chunks(Vec<Vec<u8>>),
}

impl DataPayload {
    /// Returns the byte strings that will be pushed, in order.
    #[must_use]
    pub fn chunks(&self) -> Vec<&[u8]> {
        match self {
            DataPayload::Bytes(bytes) => vec![bytes.as_slice()],
            DataPayload::Text(text) => vec![text.as_bytes()],
            DataPayload::Chunks(chunks) => chunks.iter().map(|c| c.as_slice()).collect(),
        }
    }
}

impl From<&str> for DataPayload {
    fn from(text: &str) -> Self {
        DataPayload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for DataPayload {
    fn from(bytes: Vec<u8>) -> Self {
        DataPayload::Bytes(bytes)
    }
}

/// Creates `OP_FALSE OP_RETURN <push>...` for the payload.
///
/// Empty payloads (no bytes, empty text or no chunks) produce no pushes at all.
///
/// # Errors
/// `Error::BadArgument` if a chunk is too long to push.
pub fn create_data_script(payload: &DataPayload) -> Result<Script> {
    let mut script = Script::new();
    script.append(OP_FALSE);
    script.append(OP_RETURN);
    for chunk in payload.chunks() {
        if chunk.is_empty() && !matches!(payload, DataPayload::Chunks(_)) {
            continue;
        }
        script.append_data(chunk)?;
    }
    Ok(script)
}
