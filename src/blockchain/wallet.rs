//! Wallet management and transaction signing.
//!
//! # Security
//! - Key material is loaded ONLY from environment variables
//! - Keys and mnemonics are never logged or serialized
//! - Intermediate seed bytes are zeroized after derivation

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::blockchain::address::AccAddress;
use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::schema::WalletConfig;

/// Environment variable holding a BIP-39 mnemonic.
pub const MNEMONIC_ENV_VAR: &str = "ORACLE_MNEMONIC";

/// Environment variable holding a hex-encoded secp256k1 private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ORACLE_PRIVATE_KEY";

/// A secp256k1 signing key together with its bech32 account address.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    public_key: [u8; 33],
    address: AccAddress,
}

impl Wallet {
    /// Derive a wallet from a BIP-39 mnemonic along
    /// `m/44'/<coin_type>'/<account>'/0/<index>`.
    pub fn from_mnemonic(
        phrase: &SecretString,
        prefix: &str,
        coin_type: u32,
        account: u32,
        index: u32,
    ) -> ChainResult<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.expose_secret())
            .map_err(|e| ChainError::Wallet(format!("Invalid mnemonic: {}", e)))?;
        let mut seed = mnemonic.to_seed("");

        let path_str = format!("m/44'/{}'/{}'/0/{}", coin_type, account, index);
        let path: DerivationPath = path_str
            .parse()
            .map_err(|e: bip32::Error| ChainError::Wallet(format!("Invalid HD path: {}", e)))?;
        let derived = XPrv::derive_from_path(seed, &path);
        seed.zeroize();
        let xprv = derived.map_err(|e| ChainError::Wallet(format!("Derivation failed: {}", e)))?;

        let mut key_bytes: [u8; 32] = xprv.to_bytes();
        let wallet = Self::from_key_bytes(&key_bytes, prefix);
        key_bytes.zeroize();
        let wallet = wallet?;

        tracing::info!(
            address = %wallet.address,
            derivation_path = %path_str,
            "Wallet derived from mnemonic"
        );
        Ok(wallet)
    }

    /// Create a wallet from a hex-encoded private key (with or without 0x).
    pub fn from_private_key(private_key_hex: &str, prefix: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let mut key_bytes: [u8; 32] = hex::decode(key_hex)
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?
            .try_into()
            .map_err(|_| ChainError::Wallet("Invalid private key format: expected 32 bytes".into()))?;
        let wallet = Self::from_key_bytes(&key_bytes, prefix);
        key_bytes.zeroize();
        let wallet = wallet?;

        tracing::info!(address = %wallet.address, "Wallet initialized from private key");
        Ok(wallet)
    }

    fn from_key_bytes(key_bytes: &[u8; 32], prefix: &str) -> ChainResult<Self> {
        let signing_key = SigningKey::from_slice(key_bytes)
            .map_err(|e| ChainError::Wallet(format!("Invalid private key: {}", e)))?;
        let public_key: [u8; 33] = signing_key
            .verifying_key()
            .to_sec1_bytes()
            .as_ref()
            .try_into()
            .map_err(|_| ChainError::Wallet("Invalid public key length".into()))?;
        let address = AccAddress::from_public_key(prefix, &public_key)?;

        Ok(Self {
            signing_key,
            public_key,
            address,
        })
    }

    /// Load wallet from the environment.
    ///
    /// `ORACLE_MNEMONIC` takes precedence over `ORACLE_PRIVATE_KEY`.
    pub fn from_env(config: &WalletConfig, prefix: &str) -> ChainResult<Self> {
        Self::from_env_if_set(config, prefix)?.ok_or_else(|| {
            ChainError::Wallet(format!(
                "Neither {} nor {} is set",
                MNEMONIC_ENV_VAR, PRIVATE_KEY_ENV_VAR
            ))
        })
    }

    /// Like [`Wallet::from_env`], but `Ok(None)` when neither variable is
    /// set. A set but malformed secret is still an error.
    pub fn from_env_if_set(config: &WalletConfig, prefix: &str) -> ChainResult<Option<Self>> {
        if let Ok(phrase) = std::env::var(MNEMONIC_ENV_VAR) {
            let phrase = SecretString::from(phrase);
            return Self::from_mnemonic(
                &phrase,
                prefix,
                config.coin_type,
                config.account,
                config.index,
            )
            .map(Some);
        }

        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(private_key) => {
                let private_key = SecretString::from(private_key);
                Self::from_private_key(private_key.expose_secret(), prefix).map(Some)
            }
            Err(_) => Ok(None),
        }
    }

    /// Get the wallet's account address.
    pub fn address(&self) -> &AccAddress {
        &self.address
    }

    /// Compressed SEC1 public key.
    pub fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }

    /// Sign `message` (SHA-256 prehashed) and return the 64-byte `r || s`
    /// signature with low-S normalization.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.as_str())
            .finish_non_exhaustive()
    }
}

/// Serializes tests that touch the wallet environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
