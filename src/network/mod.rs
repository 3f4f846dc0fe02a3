//! Bitcoin SV networks an address may belong to.

/// Network type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
    /// Scaling test network.
    STN,
}

impl Network {
    /// Version byte of P2PKH addresses on this network.
    #[must_use]
    #[inline]
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::STN => 0x6f,
        }
    }
}
