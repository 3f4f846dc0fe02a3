//! Fee and dust arithmetic used by change settlement.
//!
//! All values are integral satoshis except the fee rate, which is satoshis per byte.
use crate::messages::TxOut;
use crate::transaction::p2pkh;

/// Byte budget reserved for a P2PKH unlocking script that has not been produced yet:
/// push(72-byte signature) + push(33-byte compressed public key).
pub const P2PKH_UNLOCK_SIZE: usize = 1 + 1 + 71 + 1 + 33;

/// Smallest change value worth creating.
pub const P2PKH_DUST_AMOUNT: i64 = 135;

/// Serialized size of a P2PKH change output: value, script length and 25-byte script.
pub const CHANGE_OUTPUT_SIZE: usize = 8 + 1 + p2pkh::LOCK_SCRIPT_SIZE;

// Size of the input that would later spend an output, as assumed by the relay policy.
const SPEND_INPUT_SIZE: usize = 32 + 4 + 1 + 107 + 4 + 9;

/// Minimum value an output with a locking script of `script_size` bytes must carry.
///
/// `ceil(ceil(250 * (script_size + 157) / 1000) * dust_limit_factor / 100)`, saturating
/// at `i64::MAX`.
#[must_use]
pub fn dust_threshold(script_size: usize, dust_limit_factor: u64) -> i64 {
    let spend_size = (script_size as u64).saturating_add(SPEND_INPUT_SIZE as u64);
    let relay_fee = spend_size.saturating_mul(250).div_ceil(1000);
    let dust = relay_fee.saturating_mul(dust_limit_factor).div_ceil(100);
    i64::try_from(dust).unwrap_or(i64::MAX)
}

/// Fee for a transaction of `serialized_size` bytes once `unlock_budget` bytes of
/// unlocking scripts are added: `ceil((serialized_size + unlock_budget) * fee_rate)`.
#[must_use]
pub fn required_fee(serialized_size: usize, unlock_budget: usize, fee_rate: f64) -> i64 {
    ((serialized_size + unlock_budget) as f64 * fee_rate).ceil() as i64
}

/// Bytes still to be added to the transaction when every P2PKH input is unlocked.
///
/// Inputs spending other script types are expected to carry their final unlocking
/// script already and contribute nothing.
#[must_use]
pub fn unlock_budget(prev_outputs: &[TxOut]) -> usize {
    prev_outputs
        .iter()
        .filter(|prev| p2pkh::check_lock_script(&prev.lock_script.0))
        .count()
        * P2PKH_UNLOCK_SIZE
}

/// Fee rate and dust factor of one composer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeePolicy {
    /// Satoshis per byte.
    pub fee_rate: f64,
    /// Percentage applied to the relay dust fee.
    pub dust_limit_factor: u64,
}

impl FeePolicy {
    /// See [`dust_threshold`].
    #[must_use]
    #[inline]
    pub fn dust_threshold(&self, script_size: usize) -> i64 {
        dust_threshold(script_size, self.dust_limit_factor)
    }

    /// See [`required_fee`].
    #[must_use]
    #[inline]
    pub fn required_fee(&self, serialized_size: usize, unlock_budget: usize) -> i64 {
        required_fee(serialized_size, unlock_budget, self.fee_rate)
    }
}
