//! Bech32 account addresses.
//!
//! A Cosmos account address is `bech32(prefix, ripemd160(sha256(pubkey)))`
//! over the 33-byte compressed secp256k1 public key. Contract addresses use
//! the same encoding with a 20-byte (legacy) or 32-byte payload.

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::blockchain::types::{ChainError, ChainResult};

/// A validated bech32 account or contract address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccAddress {
    bytes: Vec<u8>,
    encoded: String,
}

impl AccAddress {
    /// Encode raw address bytes under the given human-readable prefix.
    pub fn from_bytes(prefix: &str, bytes: &[u8]) -> ChainResult<Self> {
        if bytes.len() != 20 && bytes.len() != 32 {
            return Err(ChainError::Address(format!(
                "address payload must be 20 or 32 bytes, got {}",
                bytes.len()
            )));
        }
        let hrp = Hrp::parse(prefix)
            .map_err(|e| ChainError::Address(format!("invalid prefix '{}': {}", prefix, e)))?;
        let encoded = bech32::encode::<Bech32>(hrp, bytes)
            .map_err(|e| ChainError::Address(format!("bech32 encoding failed: {}", e)))?;
        Ok(Self {
            bytes: bytes.to_vec(),
            encoded,
        })
    }

    /// Derive the account address for a compressed secp256k1 public key.
    pub fn from_public_key(prefix: &str, public_key: &[u8; 33]) -> ChainResult<Self> {
        Self::from_bytes(prefix, &hash160(public_key))
    }

    /// Parse an address and require a specific prefix.
    pub fn parse_with_prefix(s: &str, prefix: &str) -> ChainResult<Self> {
        let address: AccAddress = s.parse()?;
        if address.prefix() != prefix {
            return Err(ChainError::Address(format!(
                "expected prefix '{}' in '{}'",
                prefix, s
            )));
        }
        Ok(address)
    }

    pub fn prefix(&self) -> &str {
        // `encoded` is always "<hrp>1<data>" and the data part never contains '1'
        self.encoded
            .rsplit_once('1')
            .map(|(hrp, _)| hrp)
            .unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl FromStr for AccAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, bytes) = bech32::decode(s)
            .map_err(|e| ChainError::Address(format!("invalid bech32 '{}': {}", s, e)))?;
        Self::from_bytes(hrp.as_str(), &bytes)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// `ripemd160(sha256(data))`
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORACLE_CONTRACT: &str = "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs";

    // Compressed public key of the secret scalar 1 (the generator point)
    fn generator_pubkey() -> [u8; 33] {
        hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[test]
    fn test_hash160_of_generator() {
        assert_eq!(
            hex::encode(hash160(&generator_pubkey())),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_address_from_public_key() {
        let terra = AccAddress::from_public_key("terra", &generator_pubkey()).unwrap();
        assert_eq!(terra.as_str(), "terra1w508d6qejxtdg4y5r3zarvary0c5xw7kued6dc");
        assert_eq!(terra.prefix(), "terra");

        let cosmos = AccAddress::from_public_key("cosmos", &generator_pubkey()).unwrap();
        assert_eq!(cosmos.as_str(), "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c");
    }

    #[test]
    fn test_parse_contract_address() {
        let addr: AccAddress = ORACLE_CONTRACT.parse().unwrap();
        assert_eq!(
            hex::encode(addr.as_bytes()),
            "f93fdaaef46acc7a62e0a00175fbd64b88e44eaa"
        );
        assert_eq!(addr.to_string(), ORACLE_CONTRACT);
    }

    #[test]
    fn test_parse_32_byte_payload() {
        let bytes: Vec<u8> = (0u8..32).collect();
        let addr = AccAddress::from_bytes("terra", &bytes).unwrap();
        assert_eq!(
            addr.as_str(),
            "terra1qqqsyqcyq5rqwzqfpg9scrgwpugpzysnzs23v9ccrydpk8qarc0srftjj3"
        );
        let parsed: AccAddress = addr.as_str().parse().unwrap();
        assert_eq!(parsed.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        let err = AccAddress::parse_with_prefix(ORACLE_CONTRACT, "cosmos").unwrap_err();
        assert!(err.to_string().contains("expected prefix 'cosmos'"));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        assert!("terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgq"
            .parse::<AccAddress>()
            .is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(AccAddress::from_bytes("terra", &[0u8; 19]).is_err());
    }
}
