//! Miscellaneous helpers for the composer: hashes, varints, binary serialization and errors.

pub mod hash160;
mod hash256;
mod result;
mod serdes;
pub(crate) mod var_int;

pub use self::hash160::{Hash160, hash160};
pub use self::hash256::{Hash256, sha256d};
pub use self::result::{Error, Result};
pub use self::serdes::{Serializable, to_bytes};
