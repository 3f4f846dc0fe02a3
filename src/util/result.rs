//! Standard error and result types for the library.
use base58::FromBase58Error;
use hex::FromHexError;
use secp256k1::Error as Secp256k1Error;
use std::io;
use std::string::FromUtf8Error;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data given is not valid
    BadData(String),
    /// Base58 string could not be decoded
    FromBase58Error(FromBase58Error),
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// UTF8 parsing error
    FromUtf8Error(FromUtf8Error),
    /// The final fee rate of a signed transaction is below the configured rate
    InsufficientFee {
        /// Configured minimum fee rate in satoshis per byte
        required: f64,
        /// Fee rate the transaction actually pays
        actual: f64,
    },
    /// Standard library IO error
    IOError(io::Error),
    /// A snapshot could not be turned back into a composer
    MalformedSnapshot(String),
    /// A placeholder push is missing from, or repeated in, a templated script
    PlaceholderNotFound(String),
    /// Error in the Secp256k1 library
    Secp256k1Error(Secp256k1Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => write!(f, "Bad argument: {}", s),
            Error::BadData(s) => write!(f, "Bad data: {}", s),
            Error::FromBase58Error(e) => write!(f, "Base58 decoding error: {:?}", e),
            Error::FromHexError(e) => write!(f, "Hex decoding error: {}", e),
            Error::FromUtf8Error(e) => write!(f, "Utf8 parsing error: {}", e),
            Error::InsufficientFee { required, actual } => write!(
                f,
                "Insufficient fee: the fee rate should not be less than {}, but in the end it is {}",
                required, actual
            ),
            Error::IOError(e) => write!(f, "IO error: {}", e),
            Error::MalformedSnapshot(s) => write!(f, "Malformed snapshot: {}", s),
            Error::PlaceholderNotFound(s) => write!(f, "Placeholder not found: {}", s),
            Error::Secp256k1Error(e) => write!(f, "Secp256k1 error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FromHexError(e) => Some(e),
            Error::FromUtf8Error(e) => Some(e),
            Error::IOError(e) => Some(e),
            Error::Secp256k1Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromBase58Error> for Error {
    fn from(e: FromBase58Error) -> Self {
        Error::FromBase58Error(e)
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Error::FromUtf8Error(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IOError(e)
    }
}

impl From<Secp256k1Error> for Error {
    fn from(e: Secp256k1Error) -> Self {
        Error::Secp256k1Error(e)
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_composer_errors() {
        let e = Error::InsufficientFee {
            required: 0.5,
            actual: 0.25,
        };
        assert_eq!(
            e.to_string(),
            "Insufficient fee: the fee rate should not be less than 0.5, but in the end it is 0.25"
        );
        let e = Error::PlaceholderNotFound("signature".to_string());
        assert_eq!(e.to_string(), "Placeholder not found: signature");
        let e = Error::MalformedSnapshot("missing tx".to_string());
        assert_eq!(e.to_string(), "Malformed snapshot: missing tx");
    }

    #[test]
    fn source_is_kept_for_wrapped_errors() {
        use std::error::Error as StdError;
        let e: Error = hex::decode("zz").unwrap_err().into();
        assert!(e.source().is_some());
        assert!(Error::BadData("x".to_string()).source().is_none());
    }
}
