//! Binary serialization/deserialization trait for Bitcoin SV objects.
use crate::util::Result;
use std::io;
use std::io::{Read, Write};

/// An object that may be serialized and deserialized.
pub trait Serializable<T> {
    /// Reads the object from serialized form.
    ///
    /// # Errors
    /// Propagates IO errors or invalid data.
    fn read(reader: &mut dyn Read) -> Result<T>
    where
        Self: Sized;
    /// Writes the object to serialized form.
    ///
    /// # Errors
    /// IO errors.
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;
}

/// Serializes an object into a freshly allocated buffer.
#[must_use]
pub fn to_bytes<T>(value: &impl Serializable<T>) -> Vec<u8> {
    let mut v = Vec::new();
    // Writes into a Vec cannot fail.
    let _ = value.write(&mut v);
    v
}
