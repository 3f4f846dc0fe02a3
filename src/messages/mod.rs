//! Transaction data structures: outpoints, inputs, outputs and transactions.

mod out_point;
mod tx;
mod tx_in;
mod tx_out;

pub use self::out_point::OutPoint;
pub use self::tx::{Tx, DEFAULT_TX_VERSION};
pub use self::tx_in::{TxIn, DEFAULT_SEQUENCE};
pub use self::tx_out::{TxOut, MAX_SATOSHIS};
