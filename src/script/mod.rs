//! Script construction and parsing for Bitcoin SV.
//!
//! Scripts are kept as raw bytes. [`Script::elements`] gives a parsed view of pushes and
//! opcodes which re-encodes byte for byte with [`Script::from_elements`], so single pushes
//! can be edited without disturbing the rest of a script.
//!
//! # Examples
//! ```
//! use txcomposer::script::{Script, ScriptElement, op_codes::OP_RETURN};
//! let mut script = Script::new();
//! script.append(OP_RETURN);
//! script.append_data(b"hello").unwrap();
//! let elements = script.elements().unwrap();
//! assert_eq!(elements[1].data(), Some(&b"hello"[..]));
//! assert_eq!(Script::from_elements(&elements), script);
//! ```
use crate::util::{Error, Result};
use std::fmt;

pub mod op_codes;

use self::op_codes::{OP_0, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

/// Transaction script.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Creates a new empty script.
    #[must_use]
    #[inline]
    pub fn new() -> Script {
        Script(vec![])
    }

    /// Appends a single opcode or data byte.
    #[inline]
    pub fn append(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Appends raw bytes without a length prefix.
    #[inline]
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.0.extend_from_slice(slice);
    }

    /// Appends a data push using the smallest push encoding for its length.
    ///
    /// # Errors
    /// `Error::BadArgument` if the data is longer than a push can describe.
    pub fn append_data(&mut self, data: &[u8]) -> Result<()> {
        let element = ScriptElement::push(data)?;
        element.write(&mut self.0);
        Ok(())
    }

    /// Returns the script bytes as lowercase hex.
    #[must_use]
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parses the script into pushes and opcodes.
    ///
    /// # Errors
    /// `Error::BadData` if a push runs past the end of the script.
    pub fn elements(&self) -> Result<Vec<ScriptElement>> {
        let script = &self.0;
        let mut elements = Vec::new();
        let mut i = 0;
        while i < script.len() {
            let op = script[i];
            let (header, len) = match op {
                len @ 1..=75 => (1, len as usize),
                OP_PUSHDATA1 => {
                    check_remaining(script, i, 2)?;
                    (2, script[i + 1] as usize)
                }
                OP_PUSHDATA2 => {
                    check_remaining(script, i, 3)?;
                    (3, u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize)
                }
                OP_PUSHDATA4 => {
                    check_remaining(script, i, 5)?;
                    let n = u32::from_le_bytes([script[i + 1], script[i + 2], script[i + 3], script[i + 4]]);
                    (5, n as usize)
                }
                _ => {
                    elements.push(ScriptElement::Op(op));
                    i += 1;
                    continue;
                }
            };
            check_remaining(script, i, header + len)?;
            let data = script[i + header..i + header + len].to_vec();
            elements.push(ScriptElement::Push { op, data });
            i += header + len;
        }
        Ok(elements)
    }

    /// Encodes parsed elements back into a script.
    #[must_use]
    pub fn from_elements(elements: &[ScriptElement]) -> Script {
        let mut v = Vec::new();
        for element in elements {
            element.write(&mut v);
        }
        Script(v)
    }
}

fn check_remaining(script: &[u8], i: usize, len: usize) -> Result<()> {
    if i + len > script.len() {
        Err(Error::BadData(format!("Push at index {} runs past end of script", i)))
    } else {
        Ok(())
    }
}

/// A single parsed script element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptElement {
    /// Any opcode that does not carry data, including `OP_0`.
    Op(u8),
    /// A data push and the opcode it was encoded with.
    Push {
        /// Direct push length (1-75) or one of the `OP_PUSHDATA` opcodes.
        op: u8,
        /// Pushed bytes.
        data: Vec<u8>,
    },
}

impl ScriptElement {
    /// Creates a minimally encoded push of `data`.
    ///
    /// # Errors
    /// `Error::BadArgument` if the data is longer than `u32::MAX` bytes.
    pub fn push(data: &[u8]) -> Result<ScriptElement> {
        let op = match data.len() {
            0 => return Ok(ScriptElement::Op(OP_0)),
            len @ 1..=75 => len as u8,
            76..=0xff => OP_PUSHDATA1,
            0x100..=0xffff => OP_PUSHDATA2,
            len if len <= u32::MAX as usize => OP_PUSHDATA4,
            len => return Err(Error::BadArgument(format!("Data too long to push: {}", len))),
        };
        Ok(ScriptElement::Push {
            op,
            data: data.to_vec(),
        })
    }

    /// Returns the pushed bytes, if this is a push.
    #[must_use]
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            ScriptElement::Push { data, .. } => Some(data),
            ScriptElement::Op(_) => None,
        }
    }

    fn write(&self, v: &mut Vec<u8>) {
        match self {
            ScriptElement::Op(op) => v.push(*op),
            ScriptElement::Push { op, data } => {
                v.push(*op);
                match *op {
                    OP_PUSHDATA1 => v.push(data.len() as u8),
                    OP_PUSHDATA2 => v.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                    OP_PUSHDATA4 => v.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                    _ => {}
                }
                v.extend_from_slice(data);
            }
        }
    }
}

/// Gets the next operation index in the script, or the script length if at the end.
#[must_use]
pub fn next_op(i: usize, script: &[u8]) -> usize {
    if i >= script.len() {
        return script.len();
    }
    let next = match script[i] {
        len @ 1..=75 => i + 1 + len as usize,
        OP_PUSHDATA1 => {
            if i + 2 > script.len() {
                return script.len();
            }
            i + 2 + script[i + 1] as usize
        }
        OP_PUSHDATA2 => {
            if i + 3 > script.len() {
                return script.len();
            }
            i + 3 + u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize
        }
        OP_PUSHDATA4 => {
            if i + 5 > script.len() {
                return script.len();
            }
            i + 5 + u32::from_le_bytes([script[i + 1], script[i + 2], script[i + 3], script[i + 4]]) as usize
        }
        _ => i + 1,
    };
    next.min(script.len())
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::op_codes::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_data_picks_minimal_push() {
        let mut s = Script::new();
        s.append_data(&[]).unwrap();
        assert_eq!(s.0, vec![OP_0]);

        let mut s = Script::new();
        s.append_data(&[9; 75]).unwrap();
        assert_eq!(s.0[0], 75);
        assert_eq!(s.0.len(), 76);

        let mut s = Script::new();
        s.append_data(&[9; 76]).unwrap();
        assert_eq!(&s.0[..2], &[OP_PUSHDATA1, 76]);

        let mut s = Script::new();
        s.append_data(&[9; 256]).unwrap();
        assert_eq!(&s.0[..3], &[OP_PUSHDATA2, 0, 1]);

        let mut s = Script::new();
        s.append_data(&[9; 0x10000]).unwrap();
        assert_eq!(&s.0[..5], &[OP_PUSHDATA4, 0, 0, 1, 0]);
    }

    #[test]
    fn elements_round_trip() {
        let mut s = Script::new();
        s.append(OP_DUP);
        s.append(OP_HASH160);
        s.append_data(&[1; 20]).unwrap();
        s.append(OP_EQUALVERIFY);
        // Non-minimal encodings survive re-encoding unchanged.
        s.append(OP_PUSHDATA1);
        s.append(2);
        s.append_slice(&[7, 8]);
        s.append(OP_PUSHDATA2);
        s.append_slice(&[1, 0, 5]);
        s.append(OP_CHECKSIG);
        let elements = s.elements().unwrap();
        assert_eq!(elements.len(), 7);
        assert_eq!(elements[2].data(), Some(&[1; 20][..]));
        assert_eq!(elements[4], ScriptElement::Push { op: OP_PUSHDATA1, data: vec![7, 8] });
        assert_eq!(elements[6], ScriptElement::Op(OP_CHECKSIG));
        assert_eq!(Script::from_elements(&elements), s);
    }

    #[test]
    fn truncated_push() {
        assert!(Script(vec![5, 1, 2]).elements().is_err());
        assert!(Script(vec![OP_PUSHDATA1]).elements().is_err());
        assert!(Script(vec![OP_PUSHDATA2, 1]).elements().is_err());
        assert!(Script(vec![OP_PUSHDATA4, 1, 0, 0, 0]).elements().is_err());
    }

    #[test]
    fn next_op_test() {
        let s = [OP_DUP, 2, 9, 9, OP_PUSHDATA1, 1, 4, OP_1];
        assert_eq!(next_op(0, &s), 1);
        assert_eq!(next_op(1, &s), 4);
        assert_eq!(next_op(4, &s), 7);
        assert_eq!(next_op(7, &s), 8);
        assert_eq!(next_op(8, &s), 8);
        assert_eq!(next_op(0, &[10, 1]), 2);
    }
}
