//! Composer settings.
use crate::composer::fee::FeePolicy;
use crate::util::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default fee rate in satoshis per byte.
pub const DEFAULT_FEE_RATE: f64 = 0.5;
/// Default dust limit factor, in percent of the relay dust fee.
pub const DEFAULT_DUST_LIMIT_FACTOR: u64 = 300;

/// Settings of a [`TxComposer`](crate::composer::TxComposer).
///
/// Only valid configs can be built: through [`ComposerConfig::new`], [`Default`] or
/// deserialization, which validates too. Missing JSON fields take their default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConfigFields")]
pub struct ComposerConfig {
    fee_rate: f64,
    dust_limit_factor: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFields {
    fee_rate: f64,
    dust_limit_factor: u64,
}

impl Default for ConfigFields {
    fn default() -> Self {
        ConfigFields {
            fee_rate: DEFAULT_FEE_RATE,
            dust_limit_factor: DEFAULT_DUST_LIMIT_FACTOR,
        }
    }
}

impl TryFrom<ConfigFields> for ComposerConfig {
    type Error = Error;

    fn try_from(fields: ConfigFields) -> Result<Self> {
        ComposerConfig::new(fields.fee_rate, fields.dust_limit_factor)
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            fee_rate: DEFAULT_FEE_RATE,
            dust_limit_factor: DEFAULT_DUST_LIMIT_FACTOR,
        }
    }
}

impl ComposerConfig {
    /// Creates a validated config.
    ///
    /// # Errors
    /// `Error::BadArgument` if `fee_rate` is not a positive finite number.
    pub fn new(fee_rate: f64, dust_limit_factor: u64) -> Result<Self> {
        if !fee_rate.is_finite() || fee_rate <= 0.0 {
            return Err(Error::BadArgument(format!("Fee rate must be positive: {}", fee_rate)));
        }
        Ok(ComposerConfig {
            fee_rate,
            dust_limit_factor,
        })
    }

    /// Satoshis per byte, strictly positive.
    #[must_use]
    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    /// Percentage applied to the relay dust fee.
    #[must_use]
    pub fn dust_limit_factor(&self) -> u64 {
        self.dust_limit_factor
    }

    /// Parses and validates a config from JSON.
    ///
    /// # Errors
    /// `Error::BadData` on malformed JSON, `Error::BadArgument` on an invalid fee rate.
    pub fn from_json(s: &str) -> Result<Self> {
        let fields: ConfigFields =
            serde_json::from_str(s).map_err(|e| Error::BadData(format!("Invalid config: {}", e)))?;
        fields.try_into()
    }

    pub(crate) fn fee_policy(&self) -> FeePolicy {
        FeePolicy {
            fee_rate: self.fee_rate,
            dust_limit_factor: self.dust_limit_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ComposerConfig::default();
        assert_eq!(config.fee_rate(), 0.5);
        assert_eq!(config.dust_limit_factor(), 300);
    }

    #[test]
    fn rejects_bad_fee_rate() {
        assert!(ComposerConfig::new(0.0, 300).is_err());
        assert!(ComposerConfig::new(-1.0, 300).is_err());
        assert!(ComposerConfig::new(f64::NAN, 300).is_err());
        assert!(ComposerConfig::new(f64::INFINITY, 300).is_err());
        assert!(ComposerConfig::new(0.05, 0).is_ok());
        assert!(ComposerConfig::new(0.05, u64::MAX).is_ok());
    }

    #[test]
    fn json() -> Result<()> {
        let config = ComposerConfig::from_json(r#"{"feeRate": 0.05}"#)?;
        assert_eq!(config, ComposerConfig::new(0.05, 300)?);
        let config = ComposerConfig::from_json(r#"{"feeRate": 1, "dustLimitFactor": 100}"#)?;
        assert_eq!(config.dust_limit_factor(), 100);
        assert_eq!(ComposerConfig::from_json("{}")?, ComposerConfig::default());
        assert!(matches!(ComposerConfig::from_json("{"), Err(Error::BadData(_))));
        assert!(matches!(ComposerConfig::from_json(r#"{"feeRate": 0}"#), Err(Error::BadArgument(_))));
        Ok(())
    }

    #[test]
    fn serde_validates() -> Result<()> {
        assert!(serde_json::from_str::<ComposerConfig>(r#"{"feeRate": 0}"#).is_err());
        assert!(serde_json::from_str::<ComposerConfig>(r#"{"feeRate": -2.5}"#).is_err());
        let config = ComposerConfig::new(0.25, 150)?;
        let json = serde_json::to_string(&config).map_err(|e| Error::BadData(e.to_string()))?;
        assert_eq!(json, r#"{"feeRate":0.25,"dustLimitFactor":150}"#);
        let parsed: ComposerConfig = serde_json::from_str(&json).map_err(|e| Error::BadData(e.to_string()))?;
        assert_eq!(parsed, config);
        Ok(())
    }
}
